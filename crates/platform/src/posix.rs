//! POSIX directory listing built on an open directory descriptor.
//!
//! Listing and metadata retrieval are split: the `readdir` iteration only
//! yields names and type hints, and [`DirectoryHandle::metadata`] issues a
//! `statat` call relative to the held descriptor. The descriptor also backs
//! the directory's own identity via `fstat`, so the engine can record a
//! directory as visited without a second path lookup.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::time::{Duration, SystemTime};

use rustix::fd::OwnedFd;
use rustix::fs::{self, AtFlags, Dir, Mode, OFlags};

use crate::{DirectoryHandle, DirectoryReader, EntryHint, FileIdentity, RawEntry, RawMetadata};

/// Split open/readdir/stat realization of [`DirectoryReader`].
#[derive(Debug)]
pub struct PosixDirectoryReader;

impl DirectoryReader for PosixDirectoryReader {
    type Handle = PosixHandle;

    fn open(path: &Path) -> io::Result<PosixHandle> {
        let fd = fs::open(
            path,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
            Mode::empty(),
        )?;
        let identity = fs::fstat(&fd).map(|stat| FileIdentity {
            device: stat.st_dev as u64,
            inode: stat.st_ino as u64,
        })?;
        let dir = Dir::read_from(&fd)?;
        Ok(PosixHandle { fd, dir, identity })
    }
}

/// Open directory descriptor plus its `readdir` iteration state.
pub struct PosixHandle {
    fd: OwnedFd,
    dir: Dir,
    identity: FileIdentity,
}

impl Iterator for PosixHandle {
    type Item = io::Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.dir.next()? {
            Ok(entry) => entry,
            Err(errno) => return Some(Err(errno.into())),
        };
        let name = OsStr::from_bytes(entry.file_name().to_bytes()).to_os_string();
        let hint = match entry.file_type() {
            fs::FileType::Directory => EntryHint::Directory,
            fs::FileType::Unknown => EntryHint::Unknown,
            _ => EntryHint::NotDirectory,
        };
        Some(Ok(RawEntry::new(name, hint)))
    }
}

impl DirectoryHandle for PosixHandle {
    fn identity(&self) -> Option<FileIdentity> {
        Some(self.identity)
    }

    fn metadata(&self, entry: &RawEntry) -> io::Result<RawMetadata> {
        let stat = fs::statat(&self.fd, entry.name(), AtFlags::empty())?;
        Ok(RawMetadata::Stat(stat))
    }
}

pub(crate) fn stat_mtime(stat: &fs::Stat) -> SystemTime {
    let seconds = stat.st_mtime as i64;
    let nanos = stat.st_mtime_nsec as u64;
    let base = if seconds >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs())
    };
    base + Duration::from_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::ffi::OsString;
    use std::fs as stdfs;

    fn list_names(handle: &mut PosixHandle) -> BTreeSet<OsString> {
        let mut names = BTreeSet::new();
        for entry in handle {
            names.insert(entry.expect("raw entry").into_name());
        }
        names
    }

    #[test]
    fn listing_surfaces_self_and_parent_references() {
        let temp = tempfile::tempdir().expect("tempdir");
        stdfs::write(temp.path().join("file.txt"), b"data").expect("write");
        stdfs::create_dir(temp.path().join("sub")).expect("create sub");

        let mut handle = PosixDirectoryReader::open(temp.path()).expect("open");
        let names = list_names(&mut handle);
        assert!(names.contains(OsStr::new(".")));
        assert!(names.contains(OsStr::new("..")));
        assert!(names.contains(OsStr::new("file.txt")));
        assert!(names.contains(OsStr::new("sub")));
    }

    #[test]
    fn handle_reports_directory_identity() {
        let temp = tempfile::tempdir().expect("tempdir");
        let handle = PosixDirectoryReader::open(temp.path()).expect("open");
        let identity = handle.identity().expect("posix identity");

        let again = PosixDirectoryReader::open(temp.path()).expect("reopen");
        assert_eq!(again.identity(), Some(identity));
    }

    #[test]
    fn metadata_reports_type_size_and_identity() {
        let temp = tempfile::tempdir().expect("tempdir");
        stdfs::write(temp.path().join("file.txt"), b"12345").expect("write");
        stdfs::create_dir(temp.path().join("sub")).expect("create sub");

        let mut handle = PosixDirectoryReader::open(temp.path()).expect("open");
        let mut file_meta = None;
        let mut dir_meta = None;
        while let Some(entry) = handle.next() {
            let entry = entry.expect("raw entry");
            if entry.name() == "file.txt" {
                assert_ne!(entry.hint(), EntryHint::Directory);
                file_meta = Some(handle.metadata(&entry).expect("stat file"));
            } else if entry.name() == "sub" {
                assert_ne!(entry.hint(), EntryHint::NotDirectory);
                dir_meta = Some(handle.metadata(&entry).expect("stat sub"));
            }
        }

        let file_meta = file_meta.expect("file listed");
        assert!(!file_meta.is_directory());
        assert_eq!(file_meta.size(), 5);
        assert!(file_meta.identity().is_some());

        let dir_meta = dir_meta.expect("sub listed");
        assert!(dir_meta.is_directory());
        assert_ne!(dir_meta.identity(), file_meta.identity());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn metadata_follows_directory_symlinks() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().expect("tempdir");
        stdfs::create_dir(temp.path().join("target")).expect("create target");
        symlink(temp.path().join("target"), temp.path().join("link")).expect("symlink");

        let mut handle = PosixDirectoryReader::open(temp.path()).expect("open");
        while let Some(entry) = handle.next() {
            let entry = entry.expect("raw entry");
            if entry.name() == "link" {
                let meta = handle.metadata(&entry).expect("stat link");
                assert!(meta.is_directory());
                return;
            }
        }
        panic!("symlink entry was not listed");
    }
}
