//! Verify a local file against a multipart-uploaded object's checksums.
//!
//! [`chunker`] splits the file into the upload's part windows and
//! [`reconcile`] digests and compares them, first per part and then as a
//! checksum-of-checksums for the whole object.

pub mod config;
pub mod logging;

pub mod attributes;
pub mod chunker;
pub mod digest;
pub mod locator;
pub mod reconcile;

pub use chunker::{ChunkCursor, ChunkWindow, Chunker};
pub use digest::{Digest, DigestDecodeError, ExpectedDigest};
pub use reconcile::{
    compute_multipart_checksum, verify, verify_chunks, OverallVerdict, PartSpec, PartVerdict,
    Reconciler, StructuralMismatch, VerificationReport, VerifyError,
};
