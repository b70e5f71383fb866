use std::path::PathBuf;

use pattern::{Pattern, PatternError};
use thiserror::Error;

use crate::enumerator::FileEnumerator;
use crate::options::{ErrorPolicy, FileTypes, FolderSearchPolicy};

/// Configures an enumeration rooted at a specific directory.
///
/// The defaults match the common case: non-recursive, files and directories,
/// no pattern, descent gated by the pattern under recursion, errors ignored.
#[derive(Clone, Debug)]
pub struct EnumeratorBuilder {
    root: PathBuf,
    recursive: bool,
    file_types: FileTypes,
    pattern: Option<String>,
    folder_search_policy: FolderSearchPolicy,
    error_policy: ErrorPolicy,
}

impl EnumeratorBuilder {
    /// Creates a new builder that will enumerate the provided root directory.
    /// The root may be absolute or relative; produced paths incorporate it
    /// either way.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            file_types: FileTypes::FILES.union(FileTypes::DIRECTORIES),
            pattern: None,
            folder_search_policy: FolderSearchPolicy::default(),
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Configures breadth-first descent into subdirectories. All entries of
    /// one directory are produced before any entry of a subdirectory.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Selects which entry kinds are reported. See [`FileTypes`] for the
    /// combination rules around [`FileTypes::NAMES_ONLY`].
    #[must_use]
    pub const fn file_types(mut self, file_types: FileTypes) -> Self {
        self.file_types = file_types;
        self
    }

    /// Sets the glob pattern matched against each entry's leaf name. Entries
    /// whose leaf name does not match are not reported. Without a pattern,
    /// every name matches.
    #[must_use]
    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Chooses whether the pattern also gates descent into subdirectories
    /// during recursion.
    #[must_use]
    pub const fn folder_search_policy(mut self, policy: FolderSearchPolicy) -> Self {
        self.folder_search_policy = policy;
        self
    }

    /// Chooses how the enumeration reacts to filesystem failures.
    #[must_use]
    pub const fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Validates the configuration, compiles the pattern, and builds a
    /// [`FileEnumerator`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when the file type mask requests nothing, when
    /// [`FileTypes::NAMES_ONLY`] is combined with recursion or explicit type
    /// bits, or when the pattern does not compile.
    pub fn build(self) -> Result<FileEnumerator, BuildError> {
        let reportable = FileTypes::FILES
            .union(FileTypes::DIRECTORIES)
            .union(FileTypes::NAMES_ONLY);
        if !self.file_types.intersects(reportable) {
            return Err(BuildError::MissingTypes);
        }
        if self.file_types.contains(FileTypes::NAMES_ONLY) {
            if self.recursive {
                return Err(BuildError::RecursiveNamesOnly);
            }
            if self
                .file_types
                .intersects(FileTypes::FILES.union(FileTypes::DIRECTORIES))
            {
                return Err(BuildError::NamesOnlyWithTypes);
            }
        }

        let pattern = self.pattern.as_deref().map(Pattern::new).transpose()?;
        Ok(FileEnumerator::new(Request {
            root: self.root,
            recursive: self.recursive,
            file_types: self.file_types,
            pattern,
            folder_search_policy: self.folder_search_policy,
            error_policy: self.error_policy,
        }))
    }
}

/// Validated enumeration request handed to the engine.
pub(crate) struct Request {
    pub(crate) root: PathBuf,
    pub(crate) recursive: bool,
    pub(crate) file_types: FileTypes,
    pub(crate) pattern: Option<Pattern>,
    pub(crate) folder_search_policy: FolderSearchPolicy,
    pub(crate) error_policy: ErrorPolicy,
}

/// Error returned when an [`EnumeratorBuilder`] configuration is rejected.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The file type mask requests neither files, directories, nor names.
    #[error("file type mask must request files, directories, or names only")]
    MissingTypes,
    /// [`FileTypes::NAMES_ONLY`] was combined with recursion.
    #[error("names-only enumeration cannot recurse into subdirectories")]
    RecursiveNamesOnly,
    /// [`FileTypes::NAMES_ONLY`] was combined with explicit type bits.
    #[error("names-only enumeration already implies both files and directories")]
    NamesOnlyWithTypes,
    /// The configured pattern is not a valid glob expression.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}
