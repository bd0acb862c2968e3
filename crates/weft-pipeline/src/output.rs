//! Output policy: filenames, write paths and public URLs.
//!
//! The write path depends only on the filename template and the destination
//! directory, so it is the same in every mode. The public URL is the mode's
//! public path followed by the same filename.

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;
use serde::Serialize;
use weft_config::{
    ConfigError, CssOptions, FilenameTemplate, Interpolation, Mode, OutputOptions,
    ResolvedDescriptor, ResolvedOutputOptions,
};

use crate::rules::split_query;

/// A named output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFile {
    /// Rendered filename, relative to the destination directory
    pub filename: String,
    /// Destination directory joined with the filename
    pub write_path: PathBuf,
    /// Public path prefix followed by the filename
    pub public_url: String,
}

/// Which template names a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Chunks created from an entry (`output.filename`)
    Entry,
    /// Async and shared chunks (`output.chunk_filename`)
    Chunk,
}

pub struct OutputResolver<'a> {
    output: &'a ResolvedOutputOptions,
    css: &'a CssOptions,
}

impl<'a> OutputResolver<'a> {
    pub fn new(output: &'a ResolvedOutputOptions, css: &'a CssOptions) -> Self {
        Self { output, css }
    }

    pub fn from_descriptor(descriptor: &'a ResolvedDescriptor) -> Self {
        Self::new(&descriptor.output, &descriptor.css)
    }

    /// Render `template` and place the result under the destination directory.
    pub fn resolve(
        &self,
        template: &FilenameTemplate,
        values: &Interpolation<'_>,
    ) -> Result<ResolvedFile, ConfigError> {
        let filename = template.render(values)?;
        self.place(filename)
    }

    /// Place an already-rendered filename.
    pub fn place(&self, filename: impl Into<String>) -> Result<ResolvedFile, ConfigError> {
        let filename = filename.into();
        let relative = Path::new(&filename).clean();
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(ConfigError::OutputOutsideDestination { filename });
        }

        Ok(ResolvedFile {
            write_path: self.output.path.join(&relative),
            public_url: join_public_path(&self.output.public_path, &filename),
            filename,
        })
    }

    pub fn chunk(
        &self,
        name: &str,
        kind: OutputKind,
        hash: Option<&str>,
    ) -> Result<ResolvedFile, ConfigError> {
        let template = match kind {
            OutputKind::Entry => &self.output.filename,
            OutputKind::Chunk => &self.output.chunk_filename,
        };
        self.resolve(template, &Interpolation::chunk(name).with_hash(hash))
    }

    /// Extracted stylesheet for a chunk.
    pub fn stylesheet(
        &self,
        name: &str,
        kind: OutputKind,
        hash: Option<&str>,
    ) -> Result<ResolvedFile, ConfigError> {
        let template = match kind {
            OutputKind::Entry => &self.css.filename,
            OutputKind::Chunk => &self.css.chunk_filename,
        };
        self.resolve(template, &Interpolation::chunk(name).with_hash(hash))
    }

    /// File emitted for a single module (`emit-file`).
    pub fn asset(
        &self,
        template: &FilenameTemplate,
        source: &Path,
        hash: Option<&str>,
    ) -> Result<ResolvedFile, ConfigError> {
        let text = source.to_string_lossy();
        let (base, query) = split_query(&text);
        let base = Path::new(base);

        let file_name = base.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let (name, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, ext),
            _ => (file_name.as_ref(), ""),
        };

        let dir = match base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                format!("{}/", parent.to_string_lossy().replace('\\', "/"))
            }
            _ => String::new(),
        };

        let values = Interpolation {
            name: Some(name),
            id: Some(name),
            ext: Some(ext),
            path: Some(dir.as_str()),
            query: Some(query.unwrap_or("")),
            hash,
        };
        self.resolve(template, &values)
    }
}

/// Resolve a chunk against unbound output options.
///
/// The write path is independent of `mode`; the public URL differs only in
/// its prefix.
pub fn resolve_output(
    options: &OutputOptions,
    css: &CssOptions,
    mode: Mode,
    chunk: &str,
    kind: OutputKind,
    hash: Option<&str>,
) -> Result<ResolvedFile, ConfigError> {
    let bound = options.resolve(mode);
    OutputResolver::new(&bound, css).chunk(chunk, kind, hash)
}

/// Join a public path prefix and a filename with exactly one `/` between them.
pub fn join_public_path(prefix: &str, filename: &str) -> String {
    let filename = filename.replace('\\', "/");
    if prefix.is_empty() {
        filename
    } else if prefix.ends_with('/') {
        format!("{prefix}{}", filename.trim_start_matches('/'))
    } else {
        format!("{prefix}/{}", filename.trim_start_matches('/'))
    }
}
