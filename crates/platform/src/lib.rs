#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(unix, deny(unsafe_code))]

//! # Overview
//!
//! `platform` isolates the operating-system directory listing primitives
//! consumed by the enumeration engine. Each supported platform provides one
//! realization of the [`DirectoryReader`] trait: the POSIX realization opens a
//! directory descriptor and iterates it with the `readdir` family, fetching
//! per-entry metadata through a secondary `statat` call; the Windows
//! realization drives the native `FindFirstFileExW`/`FindNextFileW` search,
//! where listing and metadata retrieval are fused into a single call.
//!
//! # Design
//!
//! - [`DirectoryReader::open`] produces a [`DirectoryHandle`], an iterator
//!   over [`RawEntry`] values in whatever order the platform returns them.
//!   Dropping the handle releases the underlying descriptor or search handle
//!   on every exit path.
//! - [`RawEntry`] carries the leaf name and a cheap directory hint taken from
//!   the listing itself. Full metadata is obtained through
//!   [`DirectoryHandle::metadata`], which either reuses fused find data or
//!   issues the per-entry stat call.
//! - [`RawMetadata`] is a tagged variant over the platform's raw metadata
//!   (`stat` result or find data) exposing only the fields the engine needs:
//!   directory flag, size, modification time, and filesystem identity.
//! - [`FileIdentity`] is the (device, inode) pair used for revisit detection.
//!   The Windows realization returns `None` for identities: the native search
//!   API offers no cheap equivalent, so loop suppression is left to the
//!   operating system there.
//!
//! # Invariants
//!
//! - Both realizations surface the `.` and `..` entries; filtering them is the
//!   engine's decision, not the reader's.
//! - `metadata` follows symlinks, so a symlink to a directory reports as a
//!   directory.
//! - A handle never performs further syscalls after its iterator returns
//!   `None` or the handle is dropped.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::Path;
use std::time::SystemTime;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod win;

#[cfg(unix)]
pub use posix::{PosixDirectoryReader, PosixHandle};
#[cfg(windows)]
pub use win::{WindowsDirectoryReader, WindowsHandle};

/// The realization backing the current platform.
#[cfg(unix)]
pub type NativeReader = PosixDirectoryReader;
/// The realization backing the current platform.
#[cfg(windows)]
pub type NativeReader = WindowsDirectoryReader;

/// Opens directories for listing.
pub trait DirectoryReader {
    /// The handle type produced by [`open`](Self::open).
    type Handle: DirectoryHandle;

    /// Opens `path` for listing.
    fn open(path: &Path) -> io::Result<Self::Handle>;
}

/// An open directory. Iteration yields the raw entries of the directory; the
/// end of the directory is the end of the iterator. The handle is closed when
/// dropped.
pub trait DirectoryHandle: Iterator<Item = io::Result<RawEntry>> {
    /// Returns the opened directory's own filesystem identity, when the
    /// platform can supply one without an extra path lookup.
    fn identity(&self) -> Option<FileIdentity>;

    /// Obtains the full metadata for `entry`, either from data fused into the
    /// listing or through a secondary per-entry stat call.
    fn metadata(&self, entry: &RawEntry) -> io::Result<RawMetadata>;
}

/// Unique filesystem identity of a directory, used to detect revisits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    /// Identifier of the device holding the entry.
    pub device: u64,
    /// Inode (or platform equivalent) of the entry on that device.
    pub inode: u64,
}

/// Directory hint reported by the listing primitive without a stat call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryHint {
    /// The listing reported the entry as a directory.
    Directory,
    /// The listing reported the entry as something other than a directory.
    NotDirectory,
    /// The listing could not tell without a stat call.
    Unknown,
}

/// One raw directory entry as returned by the platform listing primitive.
#[derive(Clone, Debug)]
pub struct RawEntry {
    name: OsString,
    hint: EntryHint,
    fused: Option<RawMetadata>,
}

impl RawEntry {
    #[cfg(unix)]
    pub(crate) fn new(name: OsString, hint: EntryHint) -> Self {
        Self {
            name,
            hint,
            fused: None,
        }
    }

    #[cfg(windows)]
    pub(crate) fn with_metadata(name: OsString, hint: EntryHint, metadata: RawMetadata) -> Self {
        Self {
            name,
            hint,
            fused: Some(metadata),
        }
    }

    /// Returns the entry's leaf name, without any path prefix.
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Consumes the entry, returning its leaf name.
    #[must_use]
    pub fn into_name(self) -> OsString {
        self.name
    }

    /// Returns the cheap directory hint reported by the listing.
    #[must_use]
    pub const fn hint(&self) -> EntryHint {
        self.hint
    }

    /// Returns the metadata fused into the listing, when the platform
    /// provides it without a separate stat call. `None` on platforms with a
    /// split listing, where [`DirectoryHandle::metadata`] performs the stat.
    #[must_use]
    pub const fn fused(&self) -> Option<&RawMetadata> {
        self.fused.as_ref()
    }
}

/// Raw per-entry metadata, tagged by the platform that produced it.
#[derive(Clone, Copy)]
pub enum RawMetadata {
    /// A POSIX `stat` result.
    #[cfg(unix)]
    Stat(rustix::fs::Stat),
    /// Windows find data as returned by the native search.
    #[cfg(windows)]
    FindData(windows::Win32::Storage::FileSystem::WIN32_FIND_DATAW),
}

impl RawMetadata {
    /// Reports whether the entry is a directory. Symlinks to directories
    /// count as directories.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        match self {
            #[cfg(unix)]
            Self::Stat(stat) => {
                rustix::fs::FileType::from_raw_mode(stat.st_mode) == rustix::fs::FileType::Directory
            }
            #[cfg(windows)]
            Self::FindData(data) => win::attributes_mark_directory(data.dwFileAttributes),
        }
    }

    /// Returns the entry's size in bytes. Only meaningful for files.
    #[must_use]
    pub fn size(&self) -> u64 {
        match self {
            #[cfg(unix)]
            Self::Stat(stat) => stat.st_size as u64,
            #[cfg(windows)]
            Self::FindData(data) => (u64::from(data.nFileSizeHigh) << 32) | u64::from(data.nFileSizeLow),
        }
    }

    /// Returns the entry's last modification time. Resolution is platform
    /// dependent but at least one second.
    #[must_use]
    pub fn modified(&self) -> SystemTime {
        match self {
            #[cfg(unix)]
            Self::Stat(stat) => posix::stat_mtime(stat),
            #[cfg(windows)]
            Self::FindData(data) => win::filetime_to_system_time(data.ftLastWriteTime),
        }
    }

    /// Returns the entry's filesystem identity when the platform records one.
    #[must_use]
    pub fn identity(&self) -> Option<FileIdentity> {
        match self {
            #[cfg(unix)]
            Self::Stat(stat) => Some(FileIdentity {
                device: stat.st_dev as u64,
                inode: stat.st_ino as u64,
            }),
            #[cfg(windows)]
            Self::FindData(_) => None,
        }
    }
}

impl fmt::Debug for RawMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMetadata")
            .field("is_directory", &self.is_directory())
            .field("size", &self.size())
            .field("modified", &self.modified())
            .field("identity", &self.identity())
            .finish_non_exhaustive()
    }
}
