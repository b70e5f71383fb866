use std::ffi::{OsStr, OsString};
use std::time::SystemTime;

use platform::RawMetadata;

/// Metadata snapshot for one enumerated entry.
///
/// Constructed fresh for each entry and handed out by
/// [`FileEnumerator::info`](crate::FileEnumerator::info); it describes the
/// entry most recently produced by the enumeration.
#[derive(Clone, Debug)]
pub struct FileInfo {
    name: OsString,
    raw: RawMetadata,
}

impl FileInfo {
    pub(crate) fn new(name: OsString, raw: RawMetadata) -> Self {
        Self { name, raw }
    }

    /// Returns the entry's leaf name, without any path prefix. This is in
    /// contrast to the paths produced by the enumeration itself, which
    /// incorporate the configured root.
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Reports whether the entry is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.raw.is_directory()
    }

    /// Returns the entry's size in bytes. Only meaningful for files.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.raw.size()
    }

    /// Returns the entry's last modification time.
    ///
    /// Resolution is platform dependent but at least one second. For a
    /// parent-reference entry the reported time is best-effort and platform
    /// defined; the platforms disagree on what `..` should report and no
    /// particular value is guaranteed.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        self.raw.modified()
    }

    /// Returns the raw platform metadata backing this snapshot.
    #[must_use]
    pub fn raw(&self) -> &RawMetadata {
        &self.raw
    }
}
