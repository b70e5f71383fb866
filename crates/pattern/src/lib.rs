#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `pattern` compiles the shell-glob patterns accepted by the enumeration
//! engine and matches them against entry leaf names. The supported surface is
//! the portable core of shell globbing: `*` matches any run of characters
//! (including the empty run), `?` matches exactly one character, and literal
//! characters match themselves. Character classes (`[...]`) are accepted by
//! the underlying matcher but are not a portable guarantee; the native search
//! primitive on Windows does not honour them.
//!
//! Matching is applied to the bare leaf name only, never to a full path, and
//! is case-sensitive except on Windows, where the native directory search is
//! case-insensitive by construction and the compiled matcher mirrors that.
//!
//! # Examples
//!
//! ```
//! use pattern::Pattern;
//! use std::ffi::OsStr;
//!
//! let pattern = Pattern::new("*.txt").expect("pattern compiles");
//! assert!(pattern.matches(OsStr::new("notes.txt")));
//! assert!(!pattern.matches(OsStr::new("notes.txt.bak")));
//! ```

use std::ffi::OsStr;

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

/// A compiled glob pattern matched against entry leaf names.
#[derive(Clone, Debug)]
pub struct Pattern {
    matcher: GlobMatcher,
    text: String,
}

impl Pattern {
    /// Compiles `pattern` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the pattern is not a valid glob
    /// expression.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(cfg!(windows))
            .build()
            .map_err(|source| PatternError {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self {
            matcher: glob.compile_matcher(),
            text: pattern.to_owned(),
        })
    }

    /// Returns the original pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Reports whether `name` matches the pattern. `name` must be a bare
    /// leaf name without any path prefix.
    #[must_use]
    pub fn matches(&self, name: &OsStr) -> bool {
        self.matcher.is_match(name)
    }
}

/// Error produced when a pattern cannot be compiled into a matcher.
#[derive(Debug, Error)]
#[error("failed to compile glob pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    source: globset::Error,
}

impl PatternError {
    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
