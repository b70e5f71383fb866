use bitflags::bitflags;

bitflags! {
    /// Bit mask selecting which entry kinds an enumeration reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FileTypes: u32 {
        /// Report non-directory entries.
        const FILES = 1 << 0;
        /// Report directory entries.
        const DIRECTORIES = 1 << 1;
        /// Report the parent reference (`..`) of each listed directory. The
        /// self reference (`.`) is never reported.
        const INCLUDE_PARENT = 1 << 2;
        /// Report only entry names, without capturing per-entry metadata.
        /// Implies both files and directories, neither of which may be set
        /// explicitly, and is only valid for non-recursive enumerations.
        /// [`FileEnumerator::info`](crate::FileEnumerator::info) must not be
        /// called in this mode.
        const NAMES_ONLY = 1 << 3;
    }
}

/// Search policy for intermediate directories during recursion.
///
/// Has no observable effect when the enumeration is not recursive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FolderSearchPolicy {
    /// Descend only into subdirectories whose own leaf name matches the
    /// configured pattern. Without a pattern every subdirectory matches.
    #[default]
    MatchOnly,
    /// Descend into every subdirectory; the pattern filters reported results
    /// only.
    All,
}

/// Governs how enumeration reacts to filesystem failures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Swallow failures where they occur and report as many entries as
    /// remain reachable.
    #[default]
    IgnoreErrors,
    /// Terminate at the first failure and record it for
    /// [`FileEnumerator::error`](crate::FileEnumerator::error).
    StopEnumeration,
}
