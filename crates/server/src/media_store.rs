// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filesystem-backed media store.

use std::path::{Path, PathBuf};

use safelink_api::{MediaError, MediaStore, UploadedFile, stored_file_name};
use time::OffsetDateTime;
use tracing::{debug, error};

/// Writes uploads into one directory that the server also exposes under
/// `/uploads`.
#[derive(Debug, Clone)]
pub struct DiskMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl DiskMediaStore {
    /// Creates the store, creating the upload directory if needed.
    ///
    /// # Arguments
    ///
    /// * `root` - The upload directory
    /// * `public_base_url` - Origin under which `/uploads` is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> std::io::Result<Self> {
        let root: PathBuf = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for DiskMediaStore {
    fn store(&self, file: &UploadedFile, now: OffsetDateTime) -> Result<String, MediaError> {
        let extension: String = file
            .extension()
            .ok_or_else(|| MediaError::UnsupportedType {
                file_name: file.file_name.clone(),
            })?;
        let stored_name: String = stored_file_name(&extension, now);
        let path: PathBuf = self.root.join(&stored_name);

        std::fs::write(&path, &file.bytes).map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to write upload");
            MediaError::Storage(e.to_string())
        })?;

        debug!(
            original = %file.file_name,
            stored = %stored_name,
            bytes = file.bytes.len(),
            "Stored upload"
        );
        Ok(format!("{}/uploads/{stored_name}", self.public_base_url))
    }
}
