//! Region labels.
//!
//! Graph files tag nodes with either a postal-code-like string (`"51000"`)
//! or a plain integer (`3`).  Both are kept verbatim; two tags are equal only
//! if they have the same kind and value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The region a node belongs to, as written in the source data.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionTag {
    Number(i64),
    Name(String),
}

impl From<&str> for RegionTag {
    fn from(s: &str) -> Self {
        RegionTag::Name(s.to_owned())
    }
}

impl From<String> for RegionTag {
    fn from(s: String) -> Self {
        RegionTag::Name(s)
    }
}

impl From<i64> for RegionTag {
    fn from(n: i64) -> Self {
        RegionTag::Number(n)
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionTag::Number(n) => write!(f, "{n}"),
            RegionTag::Name(s) => f.write_str(s),
        }
    }
}
