use serde::{Deserialize, Serialize};
use std::path::{Path, MAIN_SEPARATOR};
use std::str::FromStr;

/// Final separator-delimited segment of `path`.
///
/// A path ending in a separator yields an empty segment, as does empty input.
pub fn base_name(path: &str) -> &str {
    path.rsplit(MAIN_SEPARATOR).next().unwrap_or("")
}

/// Removes exactly one trailing separator, if present.
pub fn strip_trailing_separator(path: &str) -> &str {
    path.strip_suffix(MAIN_SEPARATOR).unwrap_or(path)
}

/// How a source path is judged to be the backup target or inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainmentCheck {
    /// Target text occurring anywhere in the candidate counts as containment.
    /// `/data/foo` is "within" `/data/fo`.
    #[default]
    Substring,
    /// Component-wise prefix: `/data/foo` is within `/data` but not `/data/fo`.
    PathPrefix,
}

impl FromStr for ContainmentCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(ContainmentCheck::Substring),
            "prefix" | "path-prefix" | "path_prefix" => Ok(ContainmentCheck::PathPrefix),
            other => Err(format!("unknown containment check '{}'", other)),
        }
    }
}

impl ContainmentCheck {
    /// True if `candidate` is `target` or lies within it.
    pub fn is_same_or_within(self, candidate: &str, target: &str) -> bool {
        let candidate = strip_trailing_separator(candidate);
        let target = strip_trailing_separator(target);
        if candidate == target {
            return true;
        }
        match self {
            ContainmentCheck::Substring => candidate.contains(target),
            ContainmentCheck::PathPrefix => Path::new(candidate).starts_with(Path::new(target)),
        }
    }
}

/// Textual containment check kept for compatibility with existing manifests.
pub fn is_same_or_within(candidate: &str, target: &str) -> bool {
    ContainmentCheck::Substring.is_same_or_within(candidate, target)
}
