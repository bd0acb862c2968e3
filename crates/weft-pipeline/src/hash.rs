//! Content hashes used in `[hash]`, `[contenthash]` and `[chunkhash]`.

use sha2::{Digest, Sha256};

use crate::graph::ModuleInfo;

/// Hex SHA-256 of `data`.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Identity of a module when the engine did not supply a hash.
pub fn module_digest(module: &ModuleInfo) -> String {
    match &module.hash {
        Some(hash) => hash.clone(),
        None => {
            let mut hasher = Sha256::new();
            hasher.update(module.path.to_string_lossy().as_bytes());
            hasher.update([0]);
            hasher.update(module.size.to_le_bytes());
            format!("{:x}", hasher.finalize())
        }
    }
}

/// Digest of a chunk's members; order-independent.
pub fn chunk_digest<'a>(modules: impl IntoIterator<Item = &'a ModuleInfo>) -> String {
    let mut members: Vec<(String, String)> = modules
        .into_iter()
        .map(|module| (module.path.to_string_lossy().into_owned(), module_digest(module)))
        .collect();
    members.sort();

    let mut hasher = Sha256::new();
    for (path, digest) in &members {
        hasher.update(path.as_bytes());
        hasher.update([0]);
        hasher.update(digest.as_bytes());
        hasher.update([0]);
    }
    format!("{:x}", hasher.finalize())
}
