//! Release tags: the audience an API is intended for.

use serde::{Deserialize, Serialize};

/// Visibility tier, ordered from least to most public.
///
/// `Internal < Alpha < Beta < Public`. A rollup for tier `T` keeps every
/// declaration whose effective tag is `>= T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseTag {
    Internal,
    Alpha,
    Beta,
    Public,
}

impl ReleaseTag {
    /// All tags from most to least public.
    pub const ALL: [ReleaseTag; 4] = [Self::Public, Self::Beta, Self::Alpha, Self::Internal];

    /// Parse a doc block tag such as `@beta`.
    pub fn from_doc_tag(tag: &str) -> Option<Self> {
        match tag {
            "@public" => Some(Self::Public),
            "@beta" => Some(Self::Beta),
            "@alpha" => Some(Self::Alpha),
            "@internal" => Some(Self::Internal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Public => "public",
        }
    }

    pub fn doc_tag(self) -> &'static str {
        match self {
            Self::Internal => "@internal",
            Self::Alpha => "@alpha",
            Self::Beta => "@beta",
            Self::Public => "@public",
        }
    }

    /// Whether a declaration tagged `self` belongs in a rollup for `tier`.
    #[inline]
    pub fn is_visible_at(self, tier: ReleaseTag) -> bool {
        self >= tier
    }
}

impl std::fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReleaseTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "beta" => Ok(Self::Beta),
            "alpha" => Ok(Self::Alpha),
            "internal" => Ok(Self::Internal),
            other => Err(format!(
                "unknown release tag '{other}' (expected public, beta, alpha or internal)"
            )),
        }
    }
}
