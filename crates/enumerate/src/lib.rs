#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `enumerate` walks a directory tree and yields the files and/or
//! directories matching a request: an optional glob over leaf names, a type
//! mask, optional breadth-first recursion, and a two-tier error policy.
//! The result order within one directory is whatever the platform listing
//! returns; across depths the order is strictly breadth-first, so every
//! entry of a directory is produced before any entry of its subdirectories.
//!
//! Enumeration is synchronous and blocking: every step may stall on
//! directory I/O. Callers that need a responsive thread run the whole
//! enumeration on a worker of their own; no internal concurrency is
//! provided, and separate enumerations share no state.
//!
//! # Design
//!
//! - [`EnumeratorBuilder`] validates the request and compiles the pattern.
//! - [`FileEnumerator`] implements [`Iterator`] over the produced paths and
//!   keeps a FIFO queue of directories still to list. Each directory is
//!   listed in full through the platform reader before its subdirectories
//!   are visited, which is what makes the traversal breadth-first.
//! - [`FileInfo`] snapshots the metadata of the most recent entry and is
//!   retrieved with [`FileEnumerator::info`].
//! - On platforms whose reader reports filesystem identities, a visited set
//!   of (device, inode) pairs suppresses descent through circular symlinks
//!   and bind mounts. The native Windows search offers no cheap identity and
//!   relies on the operating system instead; that realization accepts the
//!   residual risk of deliberately circular trees.
//!
//! # Invariants
//!
//! - Produced paths always incorporate the configured root: an absolute root
//!   produces absolute paths, a relative root relative ones.
//! - The self reference (`.`) is never produced; the parent reference (`..`)
//!   only under [`FileTypes::INCLUDE_PARENT`].
//! - Iteration never panics and never yields an error inline: failures
//!   either shrink the result set ([`ErrorPolicy::IgnoreErrors`]) or stop it
//!   and are reported through [`FileEnumerator::error`]
//!   ([`ErrorPolicy::StopEnumeration`]).
//! - At most one directory handle is open at a time, and it is released
//!   before the next directory is opened or the enumerator is dropped.
//!
//! # Errors
//!
//! [`EnumeratorBuilder::build`] rejects contradictory requests with
//! [`BuildError`]. Runtime failures surface as [`EnumerationError`] through
//! [`FileEnumerator::error`] after termination, carrying the offending path
//! and the underlying [`std::io::Error`].
//!
//! # Examples
//!
//! Enumerate the text files directly inside a directory:
//!
//! ```
//! use enumerate::{EnumeratorBuilder, FileTypes};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::write(temp.path().join("notes.txt"), b"data")?;
//! fs::write(temp.path().join("image.png"), b"data")?;
//!
//! let mut enumerator = EnumeratorBuilder::new(temp.path())
//!     .file_types(FileTypes::FILES)
//!     .pattern("*.txt")
//!     .build()?;
//!
//! let path = enumerator.next().expect("one match");
//! assert_eq!(path, temp.path().join("notes.txt"));
//! assert_eq!(enumerator.info().size(), 4);
//! assert!(!enumerator.info().is_directory());
//! assert!(enumerator.next().is_none());
//! assert!(enumerator.error().is_none());
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod enumerator;
mod error;
mod info;
mod options;
mod visited;

pub use builder::{BuildError, EnumeratorBuilder};
pub use enumerator::FileEnumerator;
pub use error::EnumerationError;
pub use info::FileInfo;
pub use options::{ErrorPolicy, FileTypes, FolderSearchPolicy};

pub use pattern::{Pattern, PatternError};
pub use platform::{FileIdentity, RawMetadata};
