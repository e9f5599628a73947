//! Remote object metadata: per-part and whole-object SHA-256 checksums as
//! returned by GetObjectAttributes (`Checksum`, `ObjectParts`, `ObjectSize`).
//!
//! Fetching is left to the caller; this module turns the JSON response into
//! the inputs of the reconciliation engine.

mod parse;

pub use parse::{ChecksumAttr, ObjectAttributes, ObjectPart, ObjectParts};

use crate::digest::ExpectedDigest;
use crate::reconcile::PartSpec;
use std::fs;
use std::num::NonZeroU64;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AttributesError {
    #[error("object attributes are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("object has no part list; it was not uploaded with multipart upload or parts were not requested")]
    NotMultipart,
    #[error("part list is truncated; continue from part number marker {next_marker:?}")]
    Truncated { next_marker: Option<u32> },
    #[error("object declares {declared} parts but {listed} are listed")]
    PartCountMismatch { declared: u32, listed: u32 },
}

/// Verification inputs derived from the remote metadata.
#[derive(Debug, Clone)]
pub struct RemoteObject {
    pub parts: Vec<PartSpec>,
    pub overall: ExpectedDigest,
    /// Size of part 1, which is the upload's part size.
    pub inferred_part_size: Option<NonZeroU64>,
    pub object_size: Option<u64>,
}

impl ObjectAttributes {
    pub fn from_json(data: &str) -> Result<Self, AttributesError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self, AttributesError> {
        let data = fs::read_to_string(path).map_err(|source| AttributesError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data)
    }

    /// True when more parts remain to be fetched.
    pub fn is_truncated(&self) -> bool {
        self.object_parts
            .as_ref()
            .and_then(|p| p.is_truncated)
            .unwrap_or(false)
    }

    pub fn next_part_number_marker(&self) -> Option<u32> {
        self.object_parts
            .as_ref()
            .and_then(|p| p.next_part_number_marker)
    }

    /// Append the parts of a follow-up page and take over its pagination state.
    pub fn merge_page(&mut self, page: ObjectAttributes) {
        if self.checksum.is_none() {
            self.checksum = page.checksum;
        }
        if self.object_size.is_none() {
            self.object_size = page.object_size;
        }
        let Some(next) = page.object_parts else {
            return;
        };
        match self.object_parts.as_mut() {
            None => self.object_parts = Some(next),
            Some(current) => {
                current.parts.extend(next.parts);
                current.is_truncated = next.is_truncated;
                current.next_part_number_marker = next.next_part_number_marker;
                if current.total_parts_count.is_none() {
                    current.total_parts_count = next.total_parts_count;
                }
            }
        }
    }

    /// Convert to engine inputs. Part order is kept as listed; gaps are the
    /// engine's to reject.
    pub fn into_remote(self) -> Result<RemoteObject, AttributesError> {
        let parts = self.object_parts.ok_or(AttributesError::NotMultipart)?;
        if parts.is_truncated.unwrap_or(false) {
            return Err(AttributesError::Truncated {
                next_marker: parts.next_part_number_marker,
            });
        }
        let listed = parts.parts.len() as u32;
        if let Some(declared) = parts.total_parts_count {
            if declared != listed {
                return Err(AttributesError::PartCountMismatch { declared, listed });
            }
        }

        let inferred_part_size = parts
            .parts
            .iter()
            .find(|p| p.part_number == 1)
            .and_then(|p| p.size)
            .and_then(NonZeroU64::new);

        let specs = parts
            .parts
            .into_iter()
            .map(|p| PartSpec {
                index: p.part_number,
                expected: ExpectedDigest::parse(p.checksum_sha256.as_deref()),
                size: p.size,
            })
            .collect();

        let overall = ExpectedDigest::parse(
            self.checksum
                .as_ref()
                .and_then(|c| c.checksum_sha256.as_deref()),
        );

        Ok(RemoteObject {
            parts: specs,
            overall,
            inferred_part_size,
            object_size: self.object_size,
        })
    }
}
