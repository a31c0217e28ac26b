// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The job's primary identifier: a filesystem-safe stem derived from the
//! original media filename.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// A filesystem-safe, normalized identifier derived from an inbox filename.
///
/// Backed by [`SmolStr`] because most stems are short (a few dozen bytes at
/// most) and this avoids a heap allocation for the common case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileStem(SmolStr);

impl FileStem {
    /// Derive a stem from an original filename: strip the extension, then
    /// replace any byte that isn't `[A-Za-z0-9_-]` with `_`.
    pub fn from_filename(filename: &str) -> Self {
        let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
        let normalized: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        let normalized = if normalized.is_empty() { "_".to_string() } else { normalized };
        Self(SmolStr::new(normalized))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FileStem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for FileStem {
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for FileStem {
    fn from(s: String) -> Self {
        Self(SmolStr::new(s))
    }
}

impl Borrow<str> for FileStem {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
#[path = "file_stem_tests.rs"]
mod tests;
