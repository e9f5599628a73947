//! SHA-256 digests as published by the object store for multipart uploads.
//!
//! The store checksums every part independently and then publishes a
//! checksum-of-checksums for the whole object: SHA-256 over the raw part
//! digests concatenated in part order. Both levels are base64 encoded on the
//! wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Length in bytes of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// A raw SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// SHA-256 of `data` in one shot.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a base64 checksum as printed by the object store.
    ///
    /// Composite checksums are sometimes rendered with a `-N` part-count
    /// suffix (`...=-3`); the suffix is dropped before decoding.
    pub fn from_base64(encoded: &str) -> Result<Self, DigestDecodeError> {
        let (body, _) = split_part_count_suffix(encoded.trim());
        if body.is_empty() {
            return Err(DigestDecodeError::Missing);
        }
        let raw = STANDARD.decode(body)?;
        let bytes: [u8; DIGEST_LEN] =
            raw.as_slice()
                .try_into()
                .map_err(|_| DigestDecodeError::Length {
                    expected: DIGEST_LEN,
                    actual: raw.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_base64())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

/// Splits an optional trailing `-<digits>` part-count suffix off a checksum.
///
/// The standard base64 alphabet has no `-`, so the split is unambiguous.
pub fn split_part_count_suffix(encoded: &str) -> (&str, Option<u32>) {
    if let Some((body, count)) = encoded.rsplit_once('-') {
        if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = count.parse::<u32>() {
                return (body, Some(n));
            }
        }
    }
    (encoded, None)
}

/// Why a published checksum could not be turned into a [`Digest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DigestDecodeError {
    #[error("checksum is missing")]
    Missing,
    #[error("checksum is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("checksum decodes to {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
}

/// An expected digest as supplied by the remote side.
///
/// Keeps the text it was decoded from so reports can show exactly what the
/// store published, even when that text did not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    encoded: Option<String>,
    decoded: Result<Digest, DigestDecodeError>,
}

impl ExpectedDigest {
    /// Decode a published checksum; `None` means the store published none.
    pub fn parse(encoded: Option<&str>) -> Self {
        let decoded = match encoded {
            Some(s) => Digest::from_base64(s),
            None => Err(DigestDecodeError::Missing),
        };
        Self {
            encoded: encoded.map(str::to_owned),
            decoded,
        }
    }

    pub fn from_digest(digest: Digest) -> Self {
        Self {
            encoded: Some(digest.to_base64()),
            decoded: Ok(digest),
        }
    }

    pub fn digest(&self) -> Option<&Digest> {
        self.decoded.as_ref().ok()
    }

    pub fn decode_error(&self) -> Option<&DigestDecodeError> {
        self.decoded.as_ref().err()
    }

    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    /// Exact byte equality. An undecodable expectation never matches.
    pub fn matches(&self, computed: &Digest) -> bool {
        self.digest().is_some_and(|d| d == computed)
    }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.encoded, &self.decoded) {
            (Some(s), Ok(_)) => f.write_str(s),
            (Some(s), Err(e)) => write!(f, "{s} ({e})"),
            (None, _) => f.write_str("<missing>"),
        }
    }
}

impl Serialize for ExpectedDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encoded.serialize(serializer)
    }
}

/// Digesting context for a single part. A fresh one is created for every part.
#[derive(Default)]
pub struct PartHasher {
    inner: Sha256,
    bytes: u64,
}

impl PartHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
        self.bytes += data.len() as u64;
    }

    /// Bytes fed so far.
    pub fn len(&self) -> u64 {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }

    pub fn finish(self) -> Digest {
        Digest(self.inner.finalize().into())
    }
}

/// Collects finished part digests and computes the checksum-of-checksums.
///
/// Holds raw part digests only, never a part hasher's state.
#[derive(Debug, Default)]
pub struct CompositeHasher {
    parts: Vec<Digest>,
}

impl CompositeHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, part: Digest) {
        self.parts.push(part);
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn parts(&self) -> &[Digest] {
        &self.parts
    }

    /// SHA-256 over the concatenated part digests, in push order.
    pub fn finish(&self) -> Digest {
        let mut buf = Vec::with_capacity(self.parts.len() * DIGEST_LEN);
        for part in &self.parts {
            buf.extend_from_slice(part.as_bytes());
        }
        Digest::of(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Digest as _;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

    #[test]
    fn digest_of_known_content() {
        assert_eq!(Digest::of(b"").to_hex(), EMPTY_SHA256);
        assert_eq!(Digest::of(b"hello\n").to_hex(), HELLO_SHA256);
    }

    #[test]
    fn base64_roundtrip_via_store_encoding() {
        let d = Digest::of(b"hello\n");
        let encoded = d.to_base64();
        assert_eq!(encoded.len(), 44);
        assert_eq!(Digest::from_base64(&encoded).unwrap(), d);
    }

    #[test]
    fn part_count_suffix_is_ignored() {
        let d = Digest::of(b"hello\n");
        let encoded = format!("{}-3", d.to_base64());
        assert_eq!(Digest::from_base64(&encoded).unwrap(), d);
        assert_eq!(split_part_count_suffix(&encoded).1, Some(3));
        assert_eq!(split_part_count_suffix("abc=").1, None);
        assert_eq!(split_part_count_suffix("abc=-").1, None);
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(matches!(
            Digest::from_base64("not base64!"),
            Err(DigestDecodeError::Base64(_))
        ));
        assert_eq!(
            Digest::from_base64("aGVsbG8="),
            Err(DigestDecodeError::Length {
                expected: 32,
                actual: 5
            })
        );
        assert_eq!(Digest::from_base64("  "), Err(DigestDecodeError::Missing));
    }

    #[test]
    fn expected_digest_never_matches_when_undecodable() {
        let computed = Digest::of(b"x");
        let missing = ExpectedDigest::parse(None);
        assert!(!missing.matches(&computed));
        assert_eq!(missing.decode_error(), Some(&DigestDecodeError::Missing));
        assert_eq!(missing.to_string(), "<missing>");

        let garbage = ExpectedDigest::parse(Some("%%%"));
        assert!(!garbage.matches(&computed));
        assert_eq!(garbage.encoded(), Some("%%%"));

        let good = ExpectedDigest::parse(Some(&computed.to_base64()));
        assert!(good.matches(&computed));
        assert!(!good.matches(&Digest::of(b"y")));
    }

    #[test]
    fn part_hasher_matches_one_shot_digest() {
        let mut h = PartHasher::new();
        h.update(b"hel");
        h.update(b"lo\n");
        assert_eq!(h.len(), 6);
        assert_eq!(h.finish().to_hex(), HELLO_SHA256);
    }

    #[test]
    fn composite_hashes_concatenated_raw_digests() {
        let a = Digest::of(b"part one");
        let b = Digest::of(b"part two");
        let mut composite = CompositeHasher::new();
        composite.push(a);
        composite.push(b);

        let mut reference = Sha256::new();
        reference.update(a.as_bytes());
        reference.update(b.as_bytes());
        let expected: [u8; DIGEST_LEN] = reference.finalize().into();

        assert_eq!(composite.part_count(), 2);
        assert_eq!(composite.finish(), Digest::from_bytes(expected));
    }

    #[test]
    fn composite_of_no_parts_is_digest_of_empty_input() {
        assert_eq!(CompositeHasher::new().finish().to_hex(), EMPTY_SHA256);
    }
}
