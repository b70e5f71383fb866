//! Windows directory listing built on the native find API.
//!
//! `FindFirstFileExW` fuses listing and metadata retrieval: every
//! `WIN32_FIND_DATAW` already carries attributes, size, and write time, so
//! [`DirectoryHandle::metadata`] is satisfied without further syscalls. The
//! basic info level is requested to omit short (8.3) names, which speeds up
//! the query. No filesystem identity is reported; revisit suppression is
//! left to the operating system on this platform.

use std::ffi::OsString;
use std::io;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::Path;
use std::time::{Duration, SystemTime};

use windows::Win32::Foundation::{ERROR_NO_MORE_FILES, FILETIME, HANDLE};
use windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_DIRECTORY, FIND_FIRST_EX_LARGE_FETCH, FindClose, FindExInfoBasic,
    FindExSearchNameMatch, FindFirstFileExW, FindNextFileW, WIN32_FIND_DATAW,
};
use windows::core::PCWSTR;

use crate::{DirectoryHandle, DirectoryReader, EntryHint, FileIdentity, RawEntry, RawMetadata};

/// Fused find-based realization of [`DirectoryReader`].
#[derive(Debug)]
pub struct WindowsDirectoryReader;

impl DirectoryReader for WindowsDirectoryReader {
    type Handle = WindowsHandle;

    fn open(path: &Path) -> io::Result<WindowsHandle> {
        let mut search: Vec<u16> = path.join("*").as_os_str().encode_wide().collect();
        search.push(0);

        let mut data = WIN32_FIND_DATAW::default();
        // SAFETY: `search` is NUL terminated and outlives the call, and
        // `data` is a valid out pointer for the duration of the call.
        let handle = unsafe {
            FindFirstFileExW(
                PCWSTR(search.as_ptr()),
                FindExInfoBasic,
                (&raw mut data).cast(),
                FindExSearchNameMatch,
                None,
                FIND_FIRST_EX_LARGE_FETCH,
            )
        }
        .map_err(find_error)?;

        Ok(WindowsHandle {
            handle,
            pending: Some(data),
            done: false,
        })
    }
}

/// Open native search handle plus the find data buffered ahead of iteration.
pub struct WindowsHandle {
    handle: HANDLE,
    pending: Option<WIN32_FIND_DATAW>,
    done: bool,
}

impl Iterator for WindowsHandle {
    type Item = io::Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let data = match self.pending.take() {
            Some(data) => data,
            None => {
                let mut data = WIN32_FIND_DATAW::default();
                // SAFETY: `handle` is a live search handle and `data` is a
                // valid out pointer for the duration of the call.
                match unsafe { FindNextFileW(self.handle, &mut data) } {
                    Ok(()) => data,
                    Err(error) if error.code() == ERROR_NO_MORE_FILES.to_hresult() => {
                        self.done = true;
                        return None;
                    }
                    Err(error) => {
                        self.done = true;
                        return Some(Err(find_error(error)));
                    }
                }
            }
        };

        let len = data
            .cFileName
            .iter()
            .position(|&unit| unit == 0)
            .unwrap_or(data.cFileName.len());
        let name = OsString::from_wide(&data.cFileName[..len]);
        let hint = if attributes_mark_directory(data.dwFileAttributes) {
            EntryHint::Directory
        } else {
            EntryHint::NotDirectory
        };
        Some(Ok(RawEntry::with_metadata(
            name,
            hint,
            RawMetadata::FindData(data),
        )))
    }
}

impl DirectoryHandle for WindowsHandle {
    fn identity(&self) -> Option<FileIdentity> {
        None
    }

    fn metadata(&self, entry: &RawEntry) -> io::Result<RawMetadata> {
        entry.fused().copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "entry does not originate from this listing",
            )
        })
    }
}

impl Drop for WindowsHandle {
    fn drop(&mut self) {
        // SAFETY: `handle` came from FindFirstFileExW and is closed exactly
        // once, regardless of how iteration ended.
        unsafe {
            let _ = FindClose(self.handle);
        }
    }
}

pub(crate) fn attributes_mark_directory(attributes: u32) -> bool {
    attributes & FILE_ATTRIBUTE_DIRECTORY.0 != 0
}

/// Intervals of 100ns between 1601-01-01 and the Unix epoch.
const FILETIME_UNIX_OFFSET: u64 = 116_444_736_000_000_000;

pub(crate) fn filetime_to_system_time(filetime: FILETIME) -> SystemTime {
    let ticks = (u64::from(filetime.dwHighDateTime) << 32) | u64::from(filetime.dwLowDateTime);
    if ticks >= FILETIME_UNIX_OFFSET {
        SystemTime::UNIX_EPOCH + Duration::from_nanos((ticks - FILETIME_UNIX_OFFSET) * 100)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_nanos((FILETIME_UNIX_OFFSET - ticks) * 100)
    }
}

fn find_error(error: windows::core::Error) -> io::Error {
    io::Error::from_raw_os_error(error.code().0 & 0xFFFF)
}
