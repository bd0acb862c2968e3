//! Performance budget.

use std::fmt;

use serde::Serialize;
use weft_config::{PerformanceHints, PerformanceOptions};

use crate::error::{BuildError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryKind {
    /// Combined initial files of an entry point
    Entrypoint,
    /// A single emitted file
    Asset,
}

/// A file or entry point over its size ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub name: String,
    pub size: u64,
    pub limit: u64,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AdvisoryKind::Entrypoint => "entrypoint",
            AdvisoryKind::Asset => "asset",
        };
        write!(
            f,
            "{kind} '{}' is {} bytes (limit {} bytes)",
            self.name, self.size, self.limit
        )
    }
}

/// Compare sizes against the budget and report according to `hints`.
///
/// Advisories are always returned; `hints = "error"` turns a non-empty list
/// into [`BuildError::BudgetExceeded`].
pub fn check_budget<'a>(
    options: &PerformanceOptions,
    entrypoints: impl IntoIterator<Item = (&'a str, u64)>,
    assets: impl IntoIterator<Item = (&'a str, u64)>,
) -> Result<Vec<Advisory>> {
    let over = |kind, limit: u64| {
        move |(name, size): (&str, u64)| {
            (size > limit).then(|| Advisory {
                kind,
                name: name.to_string(),
                size,
                limit,
            })
        }
    };

    let advisories: Vec<Advisory> = entrypoints
        .into_iter()
        .filter_map(over(AdvisoryKind::Entrypoint, options.max_entrypoint_size))
        .chain(
            assets
                .into_iter()
                .filter_map(over(AdvisoryKind::Asset, options.max_asset_size)),
        )
        .collect();

    for advisory in &advisories {
        match options.hints {
            PerformanceHints::Off => tracing::debug!(%advisory, "performance budget exceeded"),
            PerformanceHints::Warning => tracing::warn!("{advisory}"),
            PerformanceHints::Error => tracing::error!("{advisory}"),
        }
    }

    if options.hints == PerformanceHints::Error && !advisories.is_empty() {
        return Err(BuildError::BudgetExceeded { advisories });
    }

    Ok(advisories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(hints: PerformanceHints) -> PerformanceOptions {
        PerformanceOptions {
            hints,
            ..PerformanceOptions::default()
        }
    }

    #[test]
    fn within_budget_reports_nothing() {
        let advisories = check_budget(
            &options(PerformanceHints::Error),
            [("vanilla", 512_000)],
            [("vanilla.bundle.js", 100)],
        )
        .unwrap();
        assert!(advisories.is_empty());
    }

    #[test]
    fn hints_off_still_records_advisories() {
        let advisories = check_budget(
            &options(PerformanceHints::Off),
            [("react", 700_000)],
            [("react.bundle.js", 600_000)],
        )
        .unwrap();

        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].kind, AdvisoryKind::Entrypoint);
        assert_eq!(
            advisories[1].to_string(),
            "asset 'react.bundle.js' is 600000 bytes (limit 512000 bytes)"
        );
    }

    #[test]
    fn hints_error_fails_the_build() {
        let result = check_budget(
            &options(PerformanceHints::Error),
            [("react", 700_000)],
            std::iter::empty(),
        );
        assert!(matches!(
            result,
            Err(BuildError::BudgetExceeded { advisories }) if advisories.len() == 1
        ));
    }
}
