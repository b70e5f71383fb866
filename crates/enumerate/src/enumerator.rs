use std::collections::VecDeque;
use std::ffi::OsString;
use std::mem;
use std::path::{Path, PathBuf};

use platform::{DirectoryHandle, DirectoryReader, NativeReader};
use tracing::{debug, trace};

use crate::builder::Request;
use crate::error::EnumerationError;
use crate::info::FileInfo;
use crate::options::{ErrorPolicy, FileTypes, FolderSearchPolicy};
use crate::visited::VisitedSet;

/// Breadth-first directory enumeration.
///
/// Produced by [`EnumeratorBuilder::build`](crate::EnumeratorBuilder::build).
/// Iteration yields the full path of each matching entry: the configured
/// root joined with the entry's position in the tree. `None` signals
/// termination, either because the tree is exhausted or because a failure
/// stopped the enumeration under
/// [`ErrorPolicy::StopEnumeration`]; further calls keep returning `None`.
///
/// Every call may perform blocking directory I/O. Offload the entire
/// enumeration to a worker if the calling thread must not stall.
pub struct FileEnumerator {
    recursive: bool,
    file_types: FileTypes,
    pattern: Option<pattern::Pattern>,
    folder_search_policy: FolderSearchPolicy,
    error_policy: ErrorPolicy,
    pending: VecDeque<PathBuf>,
    current_dir: PathBuf,
    buffered: Vec<BufferedEntry>,
    cursor: usize,
    visited: VisitedSet,
    current: Option<FileInfo>,
    error: Option<EnumerationError>,
    finished: bool,
}

#[derive(Default)]
struct BufferedEntry {
    name: OsString,
    info: Option<FileInfo>,
}

impl FileEnumerator {
    pub(crate) fn new(request: Request) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(request.root);
        Self {
            recursive: request.recursive,
            file_types: request.file_types,
            pattern: request.pattern,
            folder_search_policy: request.folder_search_policy,
            error_policy: request.error_policy,
            pending,
            current_dir: PathBuf::new(),
            buffered: Vec::new(),
            cursor: 0,
            visited: VisitedSet::default(),
            current: None,
            error: None,
            finished: false,
        }
    }

    /// Invokes `handler` once per result path, synchronously, in the same
    /// order iteration would produce them, then returns after termination.
    ///
    /// This is a convenience over the pull contract; it drives the same
    /// advance step and must not be interleaved with external [`Iterator`]
    /// calls on the same enumerator.
    pub fn for_each_path<F>(&mut self, mut handler: F)
    where
        F: FnMut(&Path),
    {
        while let Some(path) = self.advance() {
            handler(&path);
        }
    }

    /// Returns the [`FileInfo`] captured for the most recently produced
    /// entry.
    ///
    /// # Panics
    ///
    /// Panics when called before any entry has been produced, after the
    /// enumeration has terminated, or under [`FileTypes::NAMES_ONLY`],
    /// where no metadata is materialized.
    #[must_use]
    pub fn info(&self) -> &FileInfo {
        match &self.current {
            Some(info) => info,
            None => panic!("no current entry: info() requires a preceding result and is unavailable under NAMES_ONLY"),
        }
    }

    /// Returns the failure that terminated the enumeration early, or `None`
    /// while the enumeration is healthy, was exhausted normally, or runs
    /// under [`ErrorPolicy::IgnoreErrors`].
    #[must_use]
    pub fn error(&self) -> Option<&EnumerationError> {
        self.error.as_ref()
    }

    fn advance(&mut self) -> Option<PathBuf> {
        if self.finished {
            return None;
        }

        loop {
            if self.cursor >= self.buffered.len() {
                let Some(dir) = self.pending.pop_front() else {
                    self.finish();
                    return None;
                };
                match self.read_directory(&dir) {
                    Ok(entries) => {
                        self.buffered = entries;
                        self.cursor = 0;
                        self.current_dir = dir;
                    }
                    Err(error) => match self.error_policy {
                        ErrorPolicy::IgnoreErrors => {
                            debug!(error = %error, "ignoring directory failure");
                        }
                        ErrorPolicy::StopEnumeration => {
                            self.error = Some(error);
                            self.finish();
                            return None;
                        }
                    },
                }
                continue;
            }

            let entry = mem::take(&mut self.buffered[self.cursor]);
            self.cursor += 1;

            if entry.name == "." {
                continue;
            }
            let is_parent = entry.name == "..";
            if is_parent && !self.file_types.contains(FileTypes::INCLUDE_PARENT) {
                continue;
            }

            let is_dir = entry.info.as_ref().is_some_and(FileInfo::is_directory);

            if is_dir && self.recursive && !is_parent && self.descent_allowed(&entry.name) {
                let full_path = self.current_dir.join(&entry.name);
                match entry.info.as_ref().and_then(|info| info.raw().identity()) {
                    Some(identity) => {
                        if self.visited.first_visit(identity) {
                            self.pending.push_back(full_path);
                        } else {
                            debug!(path = ?full_path, "suppressing already visited directory");
                            continue;
                        }
                    }
                    // No identity on this platform; descend and let the
                    // operating system bound any cycles.
                    None => self.pending.push_back(full_path),
                }
            }

            if !self.type_matches(is_dir) {
                continue;
            }
            if !self.name_matches(&entry.name) {
                continue;
            }

            let path = self.current_dir.join(&entry.name);
            trace!(path = ?path, "yielding entry");
            self.current = entry.info;
            return Some(path);
        }
    }

    fn read_directory(&mut self, dir: &Path) -> Result<Vec<BufferedEntry>, EnumerationError> {
        let mut handle = NativeReader::open(dir)
            .map_err(|source| EnumerationError::open(dir.to_path_buf(), source))?;

        if self.recursive {
            if let Some(identity) = handle.identity() {
                self.visited.first_visit(identity);
            }
        }

        let names_only = self.file_types.contains(FileTypes::NAMES_ONLY);
        let mut entries = Vec::new();
        loop {
            let raw = match handle.next() {
                None => break,
                Some(Ok(raw)) => raw,
                Some(Err(source)) => match self.error_policy {
                    ErrorPolicy::IgnoreErrors => {
                        debug!(path = ?dir, error = %source, "ignoring listing failure");
                        break;
                    }
                    ErrorPolicy::StopEnumeration => {
                        return Err(EnumerationError::read(dir.to_path_buf(), source));
                    }
                },
            };

            if names_only {
                entries.push(BufferedEntry {
                    name: raw.into_name(),
                    info: None,
                });
                continue;
            }

            let metadata = match handle.metadata(&raw) {
                Ok(metadata) => metadata,
                Err(source) => match self.error_policy {
                    ErrorPolicy::IgnoreErrors => {
                        debug!(path = ?dir.join(raw.name()), error = %source, "ignoring stat failure");
                        continue;
                    }
                    ErrorPolicy::StopEnumeration => {
                        return Err(EnumerationError::metadata(dir.join(raw.name()), source));
                    }
                },
            };
            let name = raw.into_name();
            entries.push(BufferedEntry {
                info: Some(FileInfo::new(name.clone(), metadata)),
                name,
            });
        }

        debug!(path = ?dir, entries = entries.len(), "listed directory");
        Ok(entries)
    }

    fn descent_allowed(&self, name: &OsString) -> bool {
        match self.folder_search_policy {
            FolderSearchPolicy::All => true,
            FolderSearchPolicy::MatchOnly => self
                .pattern
                .as_ref()
                .is_none_or(|pattern| pattern.matches(name)),
        }
    }

    fn type_matches(&self, is_dir: bool) -> bool {
        if self.file_types.contains(FileTypes::NAMES_ONLY) {
            return true;
        }
        if is_dir {
            self.file_types.contains(FileTypes::DIRECTORIES)
        } else {
            self.file_types.contains(FileTypes::FILES)
        }
    }

    fn name_matches(&self, name: &OsString) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.matches(name))
    }

    fn finish(&mut self) {
        self.finished = true;
        self.current = None;
        self.buffered.clear();
        self.cursor = 0;
        self.pending.clear();
    }
}

impl Iterator for FileEnumerator {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.advance()
    }
}
