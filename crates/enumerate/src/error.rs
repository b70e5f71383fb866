use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure that terminated an enumeration early under
/// [`ErrorPolicy::StopEnumeration`](crate::ErrorPolicy::StopEnumeration).
///
/// Never produced through iteration itself; observed only through
/// [`FileEnumerator::error`](crate::FileEnumerator::error) once the
/// enumeration has signalled termination.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// A directory could not be opened for listing.
    #[error("failed to open directory '{path}': {source}")]
    Open {
        /// Directory that could not be opened.
        path: PathBuf,
        /// Underlying error reported by the operating system.
        source: io::Error,
    },
    /// Reading the next entry of an open directory failed.
    #[error("failed to read entry in '{path}': {source}")]
    Read {
        /// Directory whose listing failed mid-iteration.
        path: PathBuf,
        /// Underlying error reported by the operating system.
        source: io::Error,
    },
    /// Metadata for an individual entry could not be retrieved.
    #[error("failed to inspect metadata for '{path}': {source}")]
    Metadata {
        /// Entry whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error reported by the operating system.
        source: io::Error,
    },
}

impl EnumerationError {
    pub(crate) fn open(path: PathBuf, source: io::Error) -> Self {
        Self::Open { path, source }
    }

    pub(crate) fn read(path: PathBuf, source: io::Error) -> Self {
        Self::Read { path, source }
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::Metadata { path, source }
    }

    /// Returns the filesystem path associated with the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Metadata { path, .. } => path,
        }
    }

    /// Returns the class of the underlying operating-system failure, such as
    /// [`io::ErrorKind::PermissionDenied`] or [`io::ErrorKind::NotFound`].
    #[must_use]
    pub fn io_error_kind(&self) -> io::ErrorKind {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Metadata { source, .. } => source.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error(kind: io::ErrorKind) -> io::Error {
        io::Error::new(kind, "boom")
    }

    #[test]
    fn error_path_matches_variant_path() {
        let open = EnumerationError::open(PathBuf::from("dir"), io_error(io::ErrorKind::NotFound));
        assert_eq!(open.path(), Path::new("dir"));

        let read = EnumerationError::read(PathBuf::from("dir"), io_error(io::ErrorKind::NotFound));
        assert_eq!(read.path(), Path::new("dir"));

        let metadata = EnumerationError::metadata(
            PathBuf::from("dir/entry"),
            io_error(io::ErrorKind::NotFound),
        );
        assert_eq!(metadata.path(), Path::new("dir/entry"));
    }

    #[test]
    fn error_exposes_underlying_kind() {
        let error = EnumerationError::open(
            PathBuf::from("locked"),
            io_error(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(error.io_error_kind(), io::ErrorKind::PermissionDenied);
        assert!(error.to_string().contains("failed to open directory"));
    }
}
