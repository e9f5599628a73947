//! `partcheck checksum` – local per-part and composite SHA-256 of a file.

use anyhow::{Context, Result};
use partcheck_core::chunker::{Chunker, DEFAULT_BUF_SIZE};
use partcheck_core::config::{self, PartcheckConfig};
use partcheck_core::reconcile::compute_multipart_checksum;
use std::fs::File;
use std::path::Path;

pub fn run_checksum(
    cfg: &PartcheckConfig,
    path: &Path,
    part_size: Option<u64>,
    json: bool,
) -> Result<()> {
    let (part_size, source) = config::resolve_part_size(part_size, None, cfg)?;
    tracing::info!(
        file = %path.display(),
        part_size = part_size.get(),
        ?source,
        "computing multipart checksum"
    );

    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut chunker = Chunker::with_buffer_size(
        f,
        part_size,
        cfg.read_buffer_bytes.unwrap_or(DEFAULT_BUF_SIZE),
    );
    let local = compute_multipart_checksum(&mut chunker)
        .with_context(|| format!("read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&local)?);
        return Ok(());
    }
    for (i, part) in local.parts.iter().enumerate() {
        println!("Part {}: {}", i + 1, part);
    }
    println!("{}  {}", local.composite_with_part_count(), path.display());
    Ok(())
}
