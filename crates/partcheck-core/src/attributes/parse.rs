//! Serde shapes of the object store's GetObjectAttributes response (JSON).

use serde::{Deserialize, Deserializer};

/// Root document. Only the attributes needed for verification are modelled.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectAttributes {
    #[serde(default)]
    pub checksum: Option<ChecksumAttr>,
    #[serde(default)]
    pub object_parts: Option<ObjectParts>,
    #[serde(default)]
    pub object_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChecksumAttr {
    #[serde(default, rename = "ChecksumSHA256")]
    pub checksum_sha256: Option<String>,
    #[serde(default, rename = "ChecksumType")]
    pub checksum_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectParts {
    #[serde(default)]
    pub total_parts_count: Option<u32>,
    #[serde(default, deserialize_with = "marker")]
    pub part_number_marker: Option<u32>,
    #[serde(default, deserialize_with = "marker")]
    pub next_part_number_marker: Option<u32>,
    #[serde(default)]
    pub max_parts: Option<u32>,
    #[serde(default)]
    pub is_truncated: Option<bool>,
    #[serde(default)]
    pub parts: Vec<ObjectPart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectPart {
    pub part_number: u32,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "ChecksumSHA256")]
    pub checksum_sha256: Option<String>,
}

/// Part-number markers show up both as numbers and as strings.
fn marker<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Marker {
        Num(u32),
        Text(String),
    }

    match Option::<Marker>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Marker::Num(n)) => Ok(Some(n)),
        Some(Marker::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Marker::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
