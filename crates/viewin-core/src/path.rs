// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-store path parsing (`s3://bucket/key`).

use std::fmt;
use std::str::FromStr;

use crate::error::ViewinError;

const SCHEME: &str = "s3://";

/// A bucket/key pair addressing one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath {
    pub bucket: String,
    pub key: String,
}

impl StoragePath {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses `s3://bucket/key`. The scheme prefix is optional.
    ///
    /// The bucket ends at the first `/`; everything after it is the key.
    /// Any other URL scheme is rejected, as is a bucket name with characters
    /// outside ASCII letters, digits, `.`, `-` and `_`.
    pub fn parse(raw: &str) -> Result<Self, ViewinError> {
        let trimmed = raw.trim();
        let rest = trimmed.strip_prefix(SCHEME).unwrap_or(trimmed);
        let invalid = || ViewinError::Validation(format!("invalid storage path format: {raw}"));

        if rest.contains("://") {
            return Err(invalid());
        }
        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
        if !is_bucket_name(bucket) || key.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(bucket, key))
    }

    /// True when the string carries the object-store scheme.
    pub fn is_storage_path(raw: &str) -> bool {
        raw.trim_start().starts_with(SCHEME)
    }

    /// Final key segment, used as the artifact display name.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

fn is_bucket_name(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}

impl FromStr for StoragePath {
    type Err = ViewinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bucket_and_nested_key() {
        let path = StoragePath::parse("s3://answers/responses-audios/job-1/answer_1.mp3").unwrap();
        assert_eq!(path.bucket, "answers");
        assert_eq!(path.key, "responses-audios/job-1/answer_1.mp3");
        assert_eq!(path.file_name(), "answer_1.mp3");
    }

    #[test]
    fn scheme_is_optional() {
        let path = StoragePath::parse("b/1.mp3").unwrap();
        assert_eq!(path, StoragePath::new("b", "1.mp3"));
    }

    #[test]
    fn display_restores_scheme() {
        let path = StoragePath::new("b", "dir/file.pdf");
        assert_eq!(path.to_string(), "s3://b/dir/file.pdf");
    }

    #[test]
    fn missing_separator_is_validation_error() {
        let err = StoragePath::parse("s3://bucket-only").unwrap_err();
        assert!(matches!(err, ViewinError::Validation(_)));
        assert!(err.to_string().contains("s3://bucket-only"));
    }

    #[test]
    fn empty_bucket_or_key_rejected() {
        assert!(StoragePath::parse("s3:///key").is_err());
        assert!(StoragePath::parse("s3://bucket/").is_err());
        assert!(StoragePath::parse("").is_err());
    }

    #[test]
    fn foreign_urls_are_not_storage_paths() {
        for raw in [
            "https://reports.example/1.mp3",
            "s3://https://reports.example/1.mp3",
            "file:///tmp/1.mp3",
            "bucket:1/key.mp3",
        ] {
            let err = StoragePath::parse(raw).unwrap_err();
            assert!(matches!(err, ViewinError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn detects_scheme() {
        assert!(StoragePath::is_storage_path("s3://b/k"));
        assert!(!StoragePath::is_storage_path("https://reports/1.pdf"));
    }
}
