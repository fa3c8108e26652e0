// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Media storage seam.
//!
//! Cases only ever hold retrievable URIs. Raw bytes go to a `MediaStore`,
//! which the server backs with the filesystem.

use thiserror::Error;
use time::OffsetDateTime;

/// Most files accepted by one append.
pub const DEFAULT_MAX_FILES: usize = 6;

/// Default per-file size limit, 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Errors raised while validating or storing uploaded media.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("at most {max} files may be uploaded at once")]
    TooManyFiles { max: usize },
    #[error("'{file_name}' is not an allowed image type")]
    UnsupportedType { file_name: String },
    #[error("'{file_name}' exceeds the {max_bytes} byte limit")]
    TooLarge { file_name: String, max_bytes: usize },
    #[error("media storage failed: {0}")]
    Storage(String),
}

/// One uploaded file, as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The client-supplied file name.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub const fn new(file_name: String, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    /// The lowercased extension of the client file name, without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, extension) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || extension.is_empty() {
            return None;
        }
        Some(extension.to_ascii_lowercase())
    }
}

/// Limits applied to an image append before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_files: usize,
    pub max_file_size: usize,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: ["jpg", "jpeg", "png", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Builds a policy from a comma-separated extension list such as
    /// `jpg,.PNG, webp`.
    ///
    /// # Arguments
    ///
    /// * `max_file_size` - Per-file limit in bytes
    /// * `allowed` - The comma-separated extension list
    #[must_use]
    pub fn from_extension_list(max_file_size: usize, allowed: &str) -> Self {
        let allowed_extensions: Vec<String> = allowed
            .split(',')
            .map(|part| part.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|part| !part.is_empty())
            .collect();
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size,
            allowed_extensions,
        }
    }

    /// Checks every file against the policy.
    ///
    /// # Arguments
    ///
    /// * `files` - The files of one append request
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, files: &[UploadedFile]) -> Result<(), MediaError> {
        if files.len() > self.max_files {
            return Err(MediaError::TooManyFiles {
                max: self.max_files,
            });
        }
        for file in files {
            let allowed: bool = file
                .extension()
                .is_some_and(|extension| self.allowed_extensions.contains(&extension));
            if !allowed {
                return Err(MediaError::UnsupportedType {
                    file_name: file.file_name.clone(),
                });
            }
            if file.bytes.len() > self.max_file_size {
                return Err(MediaError::TooLarge {
                    file_name: file.file_name.clone(),
                    max_bytes: self.max_file_size,
                });
            }
        }
        Ok(())
    }
}

/// Stores raw media and hands back a retrievable URI.
pub trait MediaStore: Send + Sync {
    /// Persists one file.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Storage` if the bytes could not be written.
    fn store(&self, file: &UploadedFile, now: OffsetDateTime) -> Result<String, MediaError>;
}

/// Builds a collision-resistant stored name such as
/// `images_1714550400000_9f2c4e1a7b3d5f60.jpg`.
///
/// # Arguments
///
/// * `extension` - The validated extension, without the dot
/// * `now` - The upload time
#[must_use]
pub fn stored_file_name(extension: &str, now: OffsetDateTime) -> String {
    let millis: i128 = now.unix_timestamp_nanos() / 1_000_000;
    let suffix: u64 = rand::random::<u64>();
    format!("images_{millis}_{suffix:016x}.{extension}")
}
