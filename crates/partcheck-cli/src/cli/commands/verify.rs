//! `partcheck verify` – compare a local file with a remote multipart object.

use anyhow::{Context, Result};
use partcheck_core::attributes::ObjectAttributes;
use partcheck_core::chunker::{Chunker, DEFAULT_BUF_SIZE};
use partcheck_core::config::{self, PartcheckConfig};
use partcheck_core::locator::ObjectLocator;
use partcheck_core::reconcile;
use std::fs::File;
use std::path::PathBuf;

use crate::cli::aws;
use crate::cli::report::{overall_line, part_line};
use crate::cli::Outcome;

#[derive(Debug)]
pub struct VerifyArgs {
    pub object: ObjectLocator,
    pub file: PathBuf,
    pub attributes: Option<PathBuf>,
    pub part_size: Option<u64>,
    pub json: bool,
}

pub async fn run_verify(cfg: &PartcheckConfig, args: &VerifyArgs) -> Result<Outcome> {
    let attrs = match &args.attributes {
        Some(path) => ObjectAttributes::load(path)?,
        None => aws::fetch_object_attributes(&cfg.aws(), &args.object).await?,
    };
    let remote = attrs
        .into_remote()
        .with_context(|| format!("attributes of {}", args.object))?;
    let (part_size, source) =
        config::resolve_part_size(args.part_size, remote.inferred_part_size, cfg)?;

    let f = File::open(&args.file).with_context(|| format!("open {}", args.file.display()))?;
    let local_size = f.metadata().map(|m| m.len()).ok();
    tracing::info!(
        object = %args.object,
        file = %args.file.display(),
        part_size = part_size.get(),
        ?source,
        parts = remote.parts.len(),
        "verifying"
    );
    if let (Some(remote_size), Some(local_size)) = (remote.object_size, local_size) {
        if remote_size != local_size {
            tracing::warn!(remote_size, local_size, "object and local file sizes differ");
        }
    }

    let chunker = Chunker::with_buffer_size(
        f,
        part_size,
        cfg.read_buffer_bytes.unwrap_or(DEFAULT_BUF_SIZE),
    );
    let json = args.json;
    let report = reconcile::verify_chunks(chunker, remote.parts, remote.overall, |v| {
        if !json {
            println!("{}", part_line(v));
        }
    })
    .with_context(|| format!("verify {} against {}", args.file.display(), args.object))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", overall_line(&report.overall));
    }

    if report.all_matched() {
        Ok(Outcome::Matched)
    } else {
        tracing::warn!(
            mismatched_parts = report.mismatched_parts().count(),
            overall = report.overall.matched,
            "verification failed"
        );
        Ok(Outcome::Mismatched)
    }
}
