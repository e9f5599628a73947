//! Verdicts emitted by a verification run.

use crate::digest::{Digest, ExpectedDigest};
use serde::Serialize;

/// Outcome for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartVerdict {
    pub index: u32,
    pub len: u64,
    pub computed: Digest,
    pub expected: ExpectedDigest,
    pub matched: bool,
}

/// Outcome for the checksum-of-checksums over the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallVerdict {
    pub part_count: u32,
    pub computed: Digest,
    pub expected: ExpectedDigest,
    pub matched: bool,
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub part_size: u64,
    pub bytes_read: u64,
    pub parts: Vec<PartVerdict>,
    pub overall: OverallVerdict,
}

impl VerificationReport {
    /// True only if every part and the whole object matched.
    pub fn all_matched(&self) -> bool {
        self.overall.matched && self.parts.iter().all(|p| p.matched)
    }

    pub fn mismatched_parts(&self) -> impl Iterator<Item = &PartVerdict> {
        self.parts.iter().filter(|p| !p.matched)
    }
}

/// Local multipart checksum, computed without remote metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalChecksum {
    pub part_size: u64,
    pub bytes_read: u64,
    pub parts: Vec<Digest>,
    pub composite: Digest,
}

impl LocalChecksum {
    /// Composite checksum in the store's `<base64>-<part count>` notation.
    pub fn composite_with_part_count(&self) -> String {
        format!("{}-{}", self.composite, self.parts.len())
    }
}
