//! Golden event fixtures stored as TOML.
//!
//! ```toml
//! format = "sanitizer-events-v1"
//!
//! [[cases]]
//! name = "entity-in-attribute"
//! input = '<a href="x&amp;y">t&lt;1</a>'
//! events = ['#document', '<a href="x&y">', '"t<1"', '</a>', '#/document']
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

pub const GOLDEN_FORMAT_V1: &str = "sanitizer-events-v1";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoldenStatus {
    #[default]
    Active,
    Skip,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GoldenCase {
    pub name: String,
    pub input: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub status: GoldenStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoldenManifest {
    format: String,
    cases: Vec<GoldenCase>,
}

/// Load and validate a fixture file. Panics with the offending path on any
/// problem, since fixtures are test inputs.
pub fn load_golden_cases(path: &Path) -> Vec<GoldenCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read golden fixtures {path:?}: {err}"));
    let manifest: GoldenManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse golden fixtures {path:?}: {err}"));
    assert_eq!(
        manifest.format, GOLDEN_FORMAT_V1,
        "unsupported format in {path:?}"
    );

    let mut seen = BTreeSet::new();
    for case in &manifest.cases {
        assert!(
            seen.insert(case.name.as_str()),
            "duplicate golden case '{}' in {path:?}",
            case.name
        );
        if case.status == GoldenStatus::Skip {
            assert!(
                case.reason.as_deref().is_some_and(|r| !r.trim().is_empty()),
                "skipped case '{}' in {path:?} needs a reason",
                case.name
            );
            continue;
        }
        assert_eq!(
            case.events.first().map(String::as_str),
            Some("#document"),
            "case '{}' in {path:?} must start with #document",
            case.name
        );
        assert_eq!(
            case.events.last().map(String::as_str),
            Some("#/document"),
            "case '{}' in {path:?} must end with #/document",
            case.name
        );
    }
    manifest.cases
}
