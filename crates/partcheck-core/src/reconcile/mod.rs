//! Reconciliation engine: digests each local window, compares it with the
//! matching remote part, and finally compares the checksum-of-checksums.
//!
//! The engine is driven one window at a time by [`verify`] (pull model,
//! single thread). Part digests that fail to decode are reported as
//! mismatches and the run continues; I/O errors and structural mismatches
//! end the run.

mod error;
mod verdict;

pub use error::{StructuralMismatch, VerifyError};
pub use verdict::{LocalChecksum, OverallVerdict, PartVerdict, VerificationReport};

use crate::chunker::{ChunkWindow, Chunker};
use crate::digest::{CompositeHasher, ExpectedDigest, PartHasher};
use std::io::Read;
use std::num::NonZeroU64;

/// One remote part as published by the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    /// 1-based part number.
    pub index: u32,
    pub expected: ExpectedDigest,
    /// Published part size, when the metadata carries it.
    pub size: Option<u64>,
}

impl PartSpec {
    pub fn new(index: u32, expected: ExpectedDigest) -> Self {
        Self {
            index,
            expected,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Observable engine states. A part is complete only inside
/// [`Reconciler::complete_part`], which returns to `AwaitingPart` together
/// with the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    AwaitingPart,
    DigestingPart,
}

/// Per-run engine. [`Reconciler::finalize`] consumes it; a new one is built
/// for every run.
pub struct Reconciler {
    parts: Vec<PartSpec>,
    overall: ExpectedDigest,
    state: EngineState,
    current: PartHasher,
    composite: CompositeHasher,
}

impl Reconciler {
    /// Builds an engine after checking that part indices run 1, 2, 3, ...
    pub fn new(parts: Vec<PartSpec>, overall: ExpectedDigest) -> Result<Self, VerifyError> {
        for (pos, part) in parts.iter().enumerate() {
            let expected = pos as u32 + 1;
            if part.index != expected {
                return Err(StructuralMismatch::IndexGap {
                    expected,
                    found: part.index,
                }
                .into());
            }
        }
        Ok(Self {
            parts,
            overall,
            state: EngineState::AwaitingPart,
            current: PartHasher::new(),
            composite: CompositeHasher::new(),
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn remote_part_count(&self) -> u32 {
        self.parts.len() as u32
    }

    pub fn completed_parts(&self) -> u32 {
        self.composite.part_count() as u32
    }

    /// Feed bytes of the window currently being read.
    pub fn update(&mut self, bytes: &[u8]) {
        self.state = EngineState::DigestingPart;
        self.current.update(bytes);
    }

    /// Close the current window and emit its verdict.
    pub fn complete_part(&mut self, window: &ChunkWindow) -> Result<PartVerdict, VerifyError> {
        let done = self.composite.part_count();
        let next_index = done as u32 + 1;
        if window.index != next_index {
            return Err(StructuralMismatch::IndexGap {
                expected: next_index,
                found: window.index,
            }
            .into());
        }
        if self.current.len() != window.len {
            return Err(StructuralMismatch::WindowLengthMismatch {
                index: window.index,
                window: window.len,
                digested: self.current.len(),
            }
            .into());
        }

        let Some(spec) = self.parts.get(done) else {
            return Err(StructuralMismatch::TrailingLocalData {
                remote_parts: self.remote_part_count(),
                offset: window.offset,
            }
            .into());
        };
        if let Some(remote) = spec.size {
            if remote != window.len {
                return Err(StructuralMismatch::PartSizeMismatch {
                    index: window.index,
                    local: window.len,
                    remote,
                }
                .into());
            }
        }

        let computed = std::mem::take(&mut self.current).finish();
        let matched = spec.expected.matches(&computed);

        tracing::debug!(
            part = window.index,
            offset = window.offset,
            len = window.len,
            computed = %computed.to_hex(),
            "part digested"
        );
        if let Some(err) = spec.expected.decode_error() {
            tracing::warn!(part = window.index, "expected checksum unusable: {}", err);
        } else if !matched {
            tracing::warn!(
                part = window.index,
                expected = %spec.expected,
                computed = %computed,
                "part checksum mismatch"
            );
        }

        let verdict = PartVerdict {
            index: window.index,
            len: window.len,
            computed,
            expected: spec.expected.clone(),
            matched,
        };
        self.composite.push(computed);
        self.state = EngineState::AwaitingPart;
        Ok(verdict)
    }

    /// Compare the checksum-of-checksums once the local stream is exhausted.
    pub fn finalize(self) -> Result<OverallVerdict, VerifyError> {
        if self.state == EngineState::DigestingPart {
            return Err(StructuralMismatch::UnfinishedPart {
                index: self.completed_parts() + 1,
                digested: self.current.len(),
            }
            .into());
        }
        let local_parts = self.completed_parts();
        let remote_parts = self.remote_part_count();
        if local_parts < remote_parts {
            return Err(StructuralMismatch::MissingLocalParts {
                local_parts,
                remote_parts,
            }
            .into());
        }

        let computed = self.composite.finish();
        let matched = self.overall.matches(&computed);
        if matched {
            tracing::info!(parts = local_parts, "object checksum matched");
        } else {
            tracing::warn!(
                parts = local_parts,
                expected = %self.overall,
                computed = %computed,
                "object checksum mismatch"
            );
        }

        Ok(OverallVerdict {
            part_count: local_parts,
            computed,
            expected: self.overall,
            matched,
        })
    }
}

/// Verify `reader` against the remote parts and object checksum.
///
/// `on_part` sees every part verdict as soon as it is produced.
pub fn verify<R, F>(
    reader: R,
    part_size: NonZeroU64,
    parts: Vec<PartSpec>,
    overall: ExpectedDigest,
    on_part: F,
) -> Result<VerificationReport, VerifyError>
where
    R: Read,
    F: FnMut(&PartVerdict),
{
    verify_chunks(Chunker::new(reader, part_size), parts, overall, on_part)
}

/// [`verify`] over an already configured chunker.
pub fn verify_chunks<R, F>(
    mut chunker: Chunker<R>,
    parts: Vec<PartSpec>,
    overall: ExpectedDigest,
    mut on_part: F,
) -> Result<VerificationReport, VerifyError>
where
    R: Read,
    F: FnMut(&PartVerdict),
{
    let mut engine = Reconciler::new(parts, overall)?;
    let mut verdicts = Vec::with_capacity(engine.remote_part_count() as usize);

    tracing::debug!(
        part_size = chunker.part_size().get(),
        remote_parts = engine.remote_part_count(),
        "verification started"
    );

    loop {
        let cursor = chunker.cursor();
        let window = chunker
            .next_window(|bytes| engine.update(bytes))
            .map_err(|source| VerifyError::Io {
                part: cursor.next_index,
                offset: cursor.offset,
                source,
            })?;
        let Some(window) = window else {
            break;
        };
        let verdict = engine.complete_part(&window)?;
        on_part(&verdict);
        verdicts.push(verdict);
    }

    let overall = engine.finalize()?;
    Ok(VerificationReport {
        part_size: chunker.part_size().get(),
        bytes_read: chunker.cursor().offset,
        parts: verdicts,
        overall,
    })
}

/// Per-part and composite checksums of a local stream, as the object store
/// would publish them for an upload with this part size.
pub fn compute_multipart_checksum<R: Read>(
    chunker: &mut Chunker<R>,
) -> std::io::Result<LocalChecksum> {
    let mut composite = CompositeHasher::new();
    loop {
        let mut hasher = PartHasher::new();
        let Some(window) = chunker.next_window(|bytes| hasher.update(bytes))? else {
            break;
        };
        let digest = hasher.finish();
        tracing::debug!(part = window.index, len = window.len, digest = %digest, "part digested");
        composite.push(digest);
    }
    Ok(LocalChecksum {
        part_size: chunker.part_size().get(),
        bytes_read: chunker.cursor().offset,
        composite: composite.finish(),
        parts: composite.parts().to_vec(),
    })
}
