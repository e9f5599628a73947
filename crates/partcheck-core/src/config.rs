use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

/// Part size used by the uploads this tool was first written against.
pub const DEFAULT_PART_SIZE: u64 = 17_179_870;

/// S3 client settings used when metadata is not supplied as a file
/// (optional section in config.toml). Unset fields fall back to the SDK's
/// default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Named profile from the shared AWS config files.
    #[serde(default)]
    pub profile: Option<String>,
    /// Region override.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Global configuration loaded from `~/.config/partcheck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartcheckConfig {
    /// Bytes per part; must equal the part size the object was uploaded with.
    pub part_size: u64,
    /// Prefer the size of remote part 1 over `part_size` when metadata lists it.
    #[serde(default = "default_infer_part_size")]
    pub infer_part_size: bool,
    /// Optional read buffer size in bytes (None = 64 KiB).
    #[serde(default)]
    pub read_buffer_bytes: Option<usize>,
    /// Optional S3 client settings; if missing, SDK defaults are used.
    #[serde(default)]
    pub aws: Option<AwsConfig>,
}

fn default_infer_part_size() -> bool {
    true
}

impl Default for PartcheckConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            infer_part_size: true,
            read_buffer_bytes: None,
            aws: None,
        }
    }
}

impl PartcheckConfig {
    pub fn aws(&self) -> AwsConfig {
        self.aws.clone().unwrap_or_default()
    }
}

/// Where the part size for a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSizeSource {
    Flag,
    Remote,
    Config,
}

/// Pick the part size: explicit flag, then the remote part 1 size (when
/// inference is enabled), then the configured size.
pub fn resolve_part_size(
    flag: Option<u64>,
    inferred: Option<NonZeroU64>,
    cfg: &PartcheckConfig,
) -> Result<(NonZeroU64, PartSizeSource)> {
    if let Some(size) = flag {
        let Some(size) = NonZeroU64::new(size) else {
            bail!("--part-size must be greater than zero");
        };
        return Ok((size, PartSizeSource::Flag));
    }
    if cfg.infer_part_size {
        if let Some(size) = inferred {
            return Ok((size, PartSizeSource::Remote));
        }
    }
    match NonZeroU64::new(cfg.part_size) {
        Some(size) => Ok((size, PartSizeSource::Config)),
        None => bail!("part_size in config must be greater than zero"),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("partcheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PartcheckConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PartcheckConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<PartcheckConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: PartcheckConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
