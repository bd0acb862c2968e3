//! Filename templates such as `[name].bundle.js` or `[path][name].[ext]`.
//!
//! Templates are parsed once at load time so unknown placeholders surface as
//! configuration errors before any file is processed. Rendering fails when a
//! placeholder has no value for the artifact being named.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Name,
    Id,
    Ext,
    Path,
    Query,
    Hash,
    ContentHash,
    ChunkHash,
}

impl Placeholder {
    fn parse(token: &str) -> Option<Self> {
        Some(match token {
            "name" => Placeholder::Name,
            "id" => Placeholder::Id,
            "ext" => Placeholder::Ext,
            "path" => Placeholder::Path,
            "query" => Placeholder::Query,
            "hash" => Placeholder::Hash,
            "contenthash" => Placeholder::ContentHash,
            "chunkhash" => Placeholder::ChunkHash,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Placeholder::Name => "name",
            Placeholder::Id => "id",
            Placeholder::Ext => "ext",
            Placeholder::Path => "path",
            Placeholder::Query => "query",
            Placeholder::Hash => "hash",
            Placeholder::ContentHash => "contenthash",
            Placeholder::ChunkHash => "chunkhash",
        }
    }

    pub fn is_hash(&self) -> bool {
        matches!(
            self,
            Placeholder::Hash | Placeholder::ContentHash | Placeholder::ChunkHash
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot {
        placeholder: Placeholder,
        len: Option<usize>,
    },
}

/// A parsed filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Values available when rendering a template.
#[derive(Debug, Clone, Default)]
pub struct Interpolation<'a> {
    pub name: Option<&'a str>,
    pub id: Option<&'a str>,
    pub ext: Option<&'a str>,
    pub path: Option<&'a str>,
    pub query: Option<&'a str>,
    pub hash: Option<&'a str>,
}

impl<'a> Interpolation<'a> {
    pub fn chunk(name: &'a str) -> Self {
        Self {
            name: Some(name),
            id: Some(name),
            ..Self::default()
        }
    }

    pub fn with_hash(mut self, hash: Option<&'a str>) -> Self {
        self.hash = hash;
        self
    }

    fn value(&self, placeholder: Placeholder) -> Option<&'a str> {
        match placeholder {
            Placeholder::Name => self.name,
            Placeholder::Id => self.id,
            Placeholder::Ext => self.ext,
            Placeholder::Path => self.path,
            Placeholder::Query => self.query,
            Placeholder::Hash | Placeholder::ContentHash | Placeholder::ChunkHash => self.hash,
        }
    }
}

impl FilenameTemplate {
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let invalid = |reason: String| ConfigError::InvalidTemplate {
            template: source.clone(),
            reason,
        };

        if source.trim().is_empty() {
            return Err(invalid("template is empty".to_string()));
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source.as_str();

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or_else(|| invalid("unclosed '['".to_string()))?;
            let token = &after[..close];

            let (name, len) = match token.split_once(':') {
                Some((name, len)) => {
                    let len = len
                        .parse::<usize>()
                        .ok()
                        .filter(|len| *len > 0)
                        .ok_or_else(|| invalid(format!("invalid length in [{token}]")))?;
                    (name, Some(len))
                }
                None => (token, None),
            };

            let placeholder = Placeholder::parse(name)
                .ok_or_else(|| invalid(format!("unknown placeholder [{name}]")))?;
            if len.is_some() && !placeholder.is_hash() {
                return Err(invalid(format!(
                    "only hash placeholders accept a length, found [{token}]"
                )));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Slot { placeholder, len });
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source, segments })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot { placeholder, .. } => Some(*placeholder),
            Segment::Literal(_) => None,
        })
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }

    pub fn is_content_addressed(&self) -> bool {
        self.placeholders().any(|p| p.is_hash())
    }

    pub fn render(&self, values: &Interpolation<'_>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot { placeholder, len } => {
                    let value =
                        values
                            .value(*placeholder)
                            .ok_or_else(|| ConfigError::MissingInterpolation {
                                template: self.source.clone(),
                                placeholder: placeholder.as_str().to_string(),
                            })?;
                    match len {
                        Some(len) => out.extend(value.chars().take(*len)),
                        None => out.push_str(value),
                    }
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for FilenameTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for FilenameTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        FilenameTemplate::parse(source).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_name_and_truncated_hash() {
        let template = FilenameTemplate::parse("[name].[contenthash:8].chunk.js").unwrap();
        let rendered = template
            .render(&Interpolation::chunk("vendors").with_hash(Some("0123456789abcdef")))
            .unwrap();
        assert_eq!(rendered, "vendors.01234567.chunk.js");
        assert!(template.is_content_addressed());
    }

    #[test]
    fn renders_asset_path_template() {
        let template = FilenameTemplate::parse("[path][name].[ext]").unwrap();
        let values = Interpolation {
            name: Some("logo"),
            ext: Some("svg"),
            path: Some("src/images/"),
            ..Interpolation::default()
        };
        assert_eq!(template.render(&values).unwrap(), "src/images/logo.svg");
    }

    #[test]
    fn missing_hash_is_an_error() {
        let template = FilenameTemplate::parse("[name].[hash].js").unwrap();
        let err = template.render(&Interpolation::chunk("main")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingInterpolation { ref placeholder, .. } if placeholder == "hash"
        ));
    }

    #[test]
    fn rejects_unknown_placeholder() {
        assert!(matches!(
            FilenameTemplate::parse("[name].[flavor].js"),
            Err(ConfigError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn rejects_length_on_non_hash() {
        assert!(FilenameTemplate::parse("[name:4].js").is_err());
        assert!(FilenameTemplate::parse("[hash:0].js").is_err());
        assert!(FilenameTemplate::parse("[name.js").is_err());
    }

    #[test]
    fn plain_template_has_no_placeholders() {
        let template = FilenameTemplate::parse("index.html").unwrap();
        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(
            template.render(&Interpolation::default()).unwrap(),
            "index.html"
        );
    }
}
