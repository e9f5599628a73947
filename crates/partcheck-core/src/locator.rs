//! Object locators: `s3://bucket/key` or plain `bucket/key`.

use std::fmt;
use std::str::FromStr;

const SCHEME: &str = "s3://";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocator {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("object locator {0:?} has no key; expected s3://bucket/key")]
    MissingKey(String),
    #[error("object locator {0:?} has no bucket; expected s3://bucket/key")]
    MissingBucket(String),
}

impl ObjectLocator {
    /// Split a locator at the first `/` after the optional scheme. The key is
    /// kept verbatim, including any further slashes.
    pub fn parse(input: &str) -> Result<Self, LocatorError> {
        let rest = input.strip_prefix(SCHEME).unwrap_or(input);
        let Some((bucket, key)) = rest.split_once('/') else {
            return if rest.is_empty() {
                Err(LocatorError::MissingBucket(input.to_string()))
            } else {
                Err(LocatorError::MissingKey(input.to_string()))
            };
        };
        if bucket.is_empty() {
            return Err(LocatorError::MissingBucket(input.to_string()));
        }
        if key.is_empty() {
            return Err(LocatorError::MissingKey(input.to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl FromStr for ObjectLocator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_form() {
        let loc = ObjectLocator::parse("s3://my-bucket/backups/2024/db.tar").unwrap();
        assert_eq!(loc.bucket, "my-bucket");
        assert_eq!(loc.key, "backups/2024/db.tar");
        assert_eq!(loc.to_string(), "s3://my-bucket/backups/2024/db.tar");
    }

    #[test]
    fn parses_bare_form() {
        let loc: ObjectLocator = "bucket/file with spaces.bin".parse().unwrap();
        assert_eq!(loc.bucket, "bucket");
        assert_eq!(loc.key, "file with spaces.bin");
    }

    #[test]
    fn rejects_incomplete_locators() {
        assert!(matches!(
            ObjectLocator::parse("s3://bucket"),
            Err(LocatorError::MissingKey(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("s3://bucket/"),
            Err(LocatorError::MissingKey(_))
        ));
        assert!(matches!(
            ObjectLocator::parse("s3:///key"),
            Err(LocatorError::MissingBucket(_))
        ));
        assert!(matches!(
            ObjectLocator::parse(""),
            Err(LocatorError::MissingBucket(_))
        ));
    }
}
