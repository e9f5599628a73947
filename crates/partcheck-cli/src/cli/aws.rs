//! Fetch object attributes with the AWS SDK (GetObjectAttributes), following
//! part-number markers until the part list is complete.

use anyhow::{anyhow, bail, Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object_attributes::GetObjectAttributesOutput;
use aws_sdk_s3::types::{ObjectAttributes as Attribute, ObjectPart as SdkPart};
use aws_sdk_s3::Client;
use partcheck_core::attributes::{ChecksumAttr, ObjectAttributes, ObjectPart, ObjectParts};
use partcheck_core::config::AwsConfig;
use partcheck_core::locator::ObjectLocator;

/// Largest page the API returns.
const MAX_PARTS: i32 = 1000;

/// Build an S3 client from the default provider chain plus config overrides.
pub async fn client(aws: &AwsConfig) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = &aws.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &aws.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &aws.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;

    // Custom endpoints are usually S3-compatible stores that need path-style URLs.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(aws.endpoint_url.is_some())
        .build();
    Client::from_conf(s3_config)
}

/// Fetch all pages of the part list for `object`.
pub async fn fetch_object_attributes(
    aws: &AwsConfig,
    object: &ObjectLocator,
) -> Result<ObjectAttributes> {
    let client = client(aws).await;
    let mut attrs = ObjectAttributes::default();
    let mut marker: Option<u32> = None;
    loop {
        let mut request = client
            .get_object_attributes()
            .bucket(&object.bucket)
            .key(&object.key)
            .object_attributes(Attribute::Checksum)
            .object_attributes(Attribute::ObjectParts)
            .object_attributes(Attribute::ObjectSize)
            .max_parts(MAX_PARTS);
        if let Some(marker) = marker {
            request = request.part_number_marker(marker.to_string());
        }

        tracing::debug!(%object, ?marker, "fetching object attributes");
        let output = request.send().await.map_err(|e| {
            anyhow!(
                "GetObjectAttributes for {} failed: {}",
                object,
                DisplayErrorContext(&e)
            )
        })?;
        let page = page_from_output(&output)
            .with_context(|| format!("attributes of {object}"))?;
        attrs.merge_page(page);

        match next_marker(&attrs, marker)? {
            Some(next) => marker = Some(next),
            None => return Ok(attrs),
        }
    }
}

/// Marker to request the next page with, or `None` once the listing is complete.
pub(crate) fn next_marker(attrs: &ObjectAttributes, previous: Option<u32>) -> Result<Option<u32>> {
    if !attrs.is_truncated() {
        return Ok(None);
    }
    let next = attrs.next_part_number_marker();
    if next.is_none() || next == previous {
        bail!("part listing is truncated but does not advance past marker {previous:?}");
    }
    Ok(next)
}

/// Map one SDK response page onto the attributes document the core understands.
pub(crate) fn page_from_output(output: &GetObjectAttributesOutput) -> Result<ObjectAttributes> {
    let checksum = output.checksum().map(|c| ChecksumAttr {
        checksum_sha256: c.checksum_sha256().map(str::to_owned),
        checksum_type: None,
    });

    let object_parts = match output.object_parts() {
        None => None,
        Some(p) => Some(ObjectParts {
            total_parts_count: p
                .total_parts_count()
                .map(|n| to_u32("TotalPartsCount", n))
                .transpose()?,
            part_number_marker: p
                .part_number_marker()
                .map(|m| parse_marker("PartNumberMarker", m))
                .transpose()?,
            next_part_number_marker: p
                .next_part_number_marker()
                .map(|m| parse_marker("NextPartNumberMarker", m))
                .transpose()?,
            max_parts: p.max_parts().map(|n| to_u32("MaxParts", n)).transpose()?,
            is_truncated: p.is_truncated(),
            parts: p
                .parts()
                .iter()
                .map(part_from_sdk)
                .collect::<Result<Vec<_>>>()?,
        }),
    };

    let object_size = output
        .object_size()
        .map(|n| u64::try_from(n).with_context(|| format!("ObjectSize {n} is negative")))
        .transpose()?;

    Ok(ObjectAttributes {
        checksum,
        object_parts,
        object_size,
    })
}

fn part_from_sdk(part: &SdkPart) -> Result<ObjectPart> {
    let Some(number) = part.part_number() else {
        bail!("listed part has no PartNumber");
    };
    Ok(ObjectPart {
        part_number: to_u32("PartNumber", number)?,
        size: part
            .size()
            .map(|n| u64::try_from(n).with_context(|| format!("part {number} Size {n} is negative")))
            .transpose()?,
        checksum_sha256: part.checksum_sha256().map(str::to_owned),
    })
}

fn to_u32(field: &str, n: i32) -> Result<u32> {
    u32::try_from(n).with_context(|| format!("{field} {n} is negative"))
}

fn parse_marker(field: &str, marker: &str) -> Result<u32> {
    marker
        .trim()
        .parse()
        .with_context(|| format!("{field} {marker:?} is not a part number"))
}
