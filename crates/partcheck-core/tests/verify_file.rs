//! Integration test: verify files on disk against metadata in the object
//! store's GetObjectAttributes JSON shape.

use partcheck_core::attributes::ObjectAttributes;
use partcheck_core::chunker::Chunker;
use partcheck_core::reconcile::{self, StructuralMismatch, VerifyError};
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::Write;
use std::num::NonZeroU64;
use tempfile::NamedTempFile;

const PART: usize = 4096;

fn sha(data: &[u8]) -> Vec<u8> {
    Sha256::digest(data).to_vec()
}

fn b64(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// GetObjectAttributes response for `data` uploaded with `PART`-byte parts.
fn attributes_json(data: &[u8]) -> String {
    let mut concat = Vec::new();
    let mut parts = Vec::new();
    for (i, chunk) in data.chunks(PART).enumerate() {
        let d = sha(chunk);
        concat.extend_from_slice(&d);
        parts.push(format!(
            r#"{{"PartNumber": {}, "Size": {}, "ChecksumSHA256": "{}"}}"#,
            i + 1,
            chunk.len(),
            b64(&d)
        ));
    }
    format!(
        r#"{{
            "Checksum": {{"ChecksumSHA256": "{}-{}", "ChecksumType": "COMPOSITE"}},
            "ObjectParts": {{"TotalPartsCount": {}, "IsTruncated": false, "Parts": [{}]}},
            "ObjectSize": {}
        }}"#,
        b64(&sha(&concat)),
        parts.len(),
        parts.len(),
        parts.join(","),
        data.len()
    )
}

fn temp_file(data: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(data).unwrap();
    f.flush().unwrap();
    f
}

fn body(len: usize) -> Vec<u8> {
    (0u8..97).cycle().take(len).collect()
}

#[test]
fn file_on_disk_matches_remote_metadata() {
    let data = body(PART * 3 + 123);
    let file = temp_file(&data);
    let remote = ObjectAttributes::from_json(&attributes_json(&data))
        .unwrap()
        .into_remote()
        .unwrap();
    let part_size = remote.inferred_part_size.unwrap();
    assert_eq!(part_size.get(), PART as u64);

    let mut streamed = Vec::new();
    let report = reconcile::verify(
        File::open(file.path()).unwrap(),
        part_size,
        remote.parts,
        remote.overall,
        |v| streamed.push((v.index, v.matched)),
    )
    .unwrap();

    assert_eq!(streamed, vec![(1, true), (2, true), (3, true), (4, true)]);
    assert!(report.all_matched());
    assert_eq!(report.bytes_read, data.len() as u64);
}

#[test]
fn corrupted_file_on_disk_is_reported_per_part() {
    let data = body(PART * 2);
    let remote = ObjectAttributes::from_json(&attributes_json(&data))
        .unwrap()
        .into_remote()
        .unwrap();
    let mut local = data.clone();
    local[PART + 10] = local[PART + 10].wrapping_add(1);
    let file = temp_file(&local);

    let report = reconcile::verify(
        File::open(file.path()).unwrap(),
        NonZeroU64::new(PART as u64).unwrap(),
        remote.parts,
        remote.overall,
        |_| {},
    )
    .unwrap();
    assert!(report.parts[0].matched);
    assert!(!report.parts[1].matched);
    assert!(!report.overall.matched);
}

#[test]
fn truncated_file_on_disk_is_structural() {
    let data = body(PART * 2 + 1);
    let remote = ObjectAttributes::from_json(&attributes_json(&data))
        .unwrap()
        .into_remote()
        .unwrap();
    let file = temp_file(&data[..PART * 2]);

    let err = reconcile::verify(
        File::open(file.path()).unwrap(),
        NonZeroU64::new(PART as u64).unwrap(),
        remote.parts,
        remote.overall,
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Structural(StructuralMismatch::MissingLocalParts {
            local_parts: 2,
            remote_parts: 3
        })
    ));
}

#[test]
fn local_checksum_predicts_published_composite() {
    let data = body(PART * 5 - 1);
    let file = temp_file(&data);
    let mut chunker = Chunker::with_buffer_size(
        File::open(file.path()).unwrap(),
        NonZeroU64::new(PART as u64).unwrap(),
        1000,
    );
    let local = reconcile::compute_multipart_checksum(&mut chunker).unwrap();

    let remote = ObjectAttributes::from_json(&attributes_json(&data))
        .unwrap()
        .into_remote()
        .unwrap();
    assert_eq!(local.parts.len(), 5);
    assert_eq!(Some(&local.composite), remote.overall.digest());
    assert_eq!(
        Some(local.composite_with_part_count().as_str()),
        remote.overall.encoded()
    );
}
