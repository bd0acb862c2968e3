//! Static assets copied verbatim into the destination directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;
use weft_config::CopyPattern;

use crate::error::{BuildError, Result};

/// One file to copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticCopy {
    /// Source file, relative to the project root
    pub source: PathBuf,
    /// Path relative to the destination directory
    pub filename: PathBuf,
    pub size: u64,
}

/// Expand copy patterns into individual files, sorted by source path.
///
/// A directory source copies its whole tree below `to` (or the destination
/// root); a file source lands at `to` (or its own file name).
pub fn expand_copies(patterns: &[CopyPattern], root: &Path) -> Result<Vec<StaticCopy>> {
    let mut copies = Vec::new();

    for pattern in patterns {
        let from = root.join(&pattern.from);
        let metadata = from.metadata().map_err(|e| BuildError::io(&from, e))?;

        if metadata.is_file() {
            let filename = match &pattern.to {
                Some(to) => to.clone(),
                None => PathBuf::from(from.file_name().unwrap_or_default()),
            };
            copies.push(StaticCopy {
                source: pattern.from.clone(),
                filename,
                size: metadata.len(),
            });
            continue;
        }

        for entry in WalkDir::new(&from).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| from.clone());
                BuildError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&from).unwrap_or(entry.path());
            let filename = match &pattern.to {
                Some(to) => to.join(relative),
                None => relative.to_path_buf(),
            };
            let size = entry
                .metadata()
                .map_err(|e| BuildError::io(entry.path(), e.into()))?
                .len();

            copies.push(StaticCopy {
                source: pattern.from.join(relative),
                filename,
                size,
            });
        }
    }

    copies.sort_by(|a, b| a.source.cmp(&b.source));
    tracing::debug!(files = copies.len(), "expanded static copies");
    Ok(copies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn copies_directory_tree() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("public/assets/dockerAssets");
        fs::create_dir_all(assets.join("nested")).unwrap();
        fs::write(assets.join("nginx.conf"), "server {}").unwrap();
        fs::write(assets.join("nested/env.sh"), "#!/bin/sh").unwrap();

        let patterns = vec![CopyPattern {
            from: "public/assets/dockerAssets".into(),
            to: None,
        }];
        let copies = expand_copies(&patterns, dir.path()).unwrap();

        let filenames: Vec<_> = copies.iter().map(|c| c.filename.clone()).collect();
        assert_eq!(
            filenames,
            [PathBuf::from("nested/env.sh"), PathBuf::from("nginx.conf")]
        );
        assert_eq!(copies[1].size, 9);
        assert_eq!(
            copies[1].source,
            PathBuf::from("public/assets/dockerAssets/nginx.conf")
        );
    }

    #[test]
    fn copies_single_file_to_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();

        let patterns = vec![CopyPattern {
            from: "robots.txt".into(),
            to: Some("meta/robots.txt".into()),
        }];
        let copies = expand_copies(&patterns, dir.path()).unwrap();
        assert_eq!(copies[0].filename, PathBuf::from("meta/robots.txt"));
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let patterns = vec![CopyPattern {
            from: "missing".into(),
            to: None,
        }];
        assert!(matches!(
            expand_copies(&patterns, dir.path()),
            Err(BuildError::Io { .. })
        ));
    }
}
