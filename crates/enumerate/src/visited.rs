use platform::FileIdentity;
use rustc_hash::{FxHashMap, FxHashSet};

/// Identities of directories already scheduled for (or finished with)
/// listing, keyed by device so inode sets stay small and collision free
/// across filesystems.
#[derive(Debug, Default)]
pub(crate) struct VisitedSet {
    seen: FxHashMap<u64, FxHashSet<u64>>,
}

impl VisitedSet {
    /// Records `identity` and reports whether this is its first visit.
    pub(crate) fn first_visit(&mut self, identity: FileIdentity) -> bool {
        self.seen
            .entry(identity.device)
            .or_default()
            .insert(identity.inode)
    }
}
