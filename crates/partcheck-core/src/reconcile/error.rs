//! Error types for a verification run.

use std::io;

/// Unrecoverable failure of a verification run. No overall verdict is
/// produced once one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Reading the local stream failed (anything but a clean end of stream).
    #[error("read failed in part {part} at byte offset {offset}")]
    Io {
        part: u32,
        offset: u64,
        #[source]
        source: io::Error,
    },
    /// Local chunking and the remote part list disagree.
    #[error("local file does not line up with the remote parts: {0}")]
    Structural(#[from] StructuralMismatch),
}

/// Ways local windows and remote parts can fail to line up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralMismatch {
    /// Remote part indices are not 1, 2, 3, ... in order.
    #[error("remote part list is not contiguous: expected part {expected}, found part {found}")]
    IndexGap { expected: u32, found: u32 },
    /// The local file has bytes past the end of the last remote part.
    #[error(
        "local file continues past the last remote part ({remote_parts} parts); \
         extra data starts at byte {offset}"
    )]
    TrailingLocalData { remote_parts: u32, offset: u64 },
    /// The local file ended before all remote parts were covered.
    #[error("local file ends after {local_parts} parts but the object has {remote_parts}")]
    MissingLocalParts { local_parts: u32, remote_parts: u32 },
    /// A remote part's published size differs from the local window.
    #[error("part {index} is {local} bytes locally but {remote} bytes remotely")]
    PartSizeMismatch { index: u32, local: u64, remote: u64 },
    /// A window was closed with a different number of bytes fed to the engine
    /// than the window covers.
    #[error("window for part {index} covers {window} bytes but {digested} were digested")]
    WindowLengthMismatch { index: u32, window: u64, digested: u64 },
    /// The engine was finalized while a part was still being digested.
    #[error("part {index} was never completed ({digested} bytes digested)")]
    UnfinishedPart { index: u32, digested: u64 },
}
