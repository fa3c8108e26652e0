// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_file, now};
use crate::{
    ApiError, DEFAULT_MAX_FILES, MediaError, UploadPolicy, UploadedFile, stored_file_name,
};

#[test]
fn test_extension_is_lowercased() {
    assert_eq!(
        create_test_file("scene.JPG").extension().as_deref(),
        Some("jpg")
    );
    assert_eq!(
        create_test_file("archive.tar.PNG").extension().as_deref(),
        Some("png")
    );
    assert_eq!(create_test_file("noextension").extension(), None);
    assert_eq!(create_test_file(".jpg").extension(), None);
    assert_eq!(create_test_file("trailing.").extension(), None);
}

#[test]
fn test_default_policy_accepts_common_images() {
    let policy: UploadPolicy = UploadPolicy::default();
    let files: Vec<UploadedFile> = ["a.jpg", "b.JPEG", "c.png", "d.webp"]
        .into_iter()
        .map(create_test_file)
        .collect();

    assert_eq!(policy.validate(&files), Ok(()));
}

#[test]
fn test_policy_rejects_too_many_files() {
    let policy: UploadPolicy = UploadPolicy::default();
    let files: Vec<UploadedFile> = (0..=DEFAULT_MAX_FILES)
        .map(|index| create_test_file(&format!("{index}.jpg")))
        .collect();

    assert_eq!(
        policy.validate(&files),
        Err(MediaError::TooManyFiles {
            max: DEFAULT_MAX_FILES
        })
    );
}

#[test]
fn test_policy_rejects_unlisted_types() {
    let policy: UploadPolicy = UploadPolicy::default();

    for name in ["clip.mp4", "payload.exe", "README"] {
        assert_eq!(
            policy.validate(&[create_test_file("ok.png"), create_test_file(name)]),
            Err(MediaError::UnsupportedType {
                file_name: name.to_string()
            })
        );
    }
}

#[test]
fn test_policy_rejects_oversized_files() {
    let policy: UploadPolicy = UploadPolicy::from_extension_list(4, "jpg");
    let exact: UploadedFile = UploadedFile::new(String::from("exact.jpg"), vec![0; 4]);
    let over: UploadedFile = UploadedFile::new(String::from("over.jpg"), vec![0; 5]);

    assert_eq!(policy.validate(std::slice::from_ref(&exact)), Ok(()));
    assert_eq!(
        policy.validate(&[exact, over]),
        Err(MediaError::TooLarge {
            file_name: String::from("over.jpg"),
            max_bytes: 4
        })
    );
}

#[test]
fn test_policy_from_extension_list() {
    let policy: UploadPolicy = UploadPolicy::from_extension_list(1_024, " .PNG, gif,,jpg ");

    assert_eq!(policy.allowed_extensions, vec!["png", "gif", "jpg"]);
    assert_eq!(policy.max_file_size, 1_024);
    assert_eq!(policy.max_files, DEFAULT_MAX_FILES);
    assert!(policy.validate(&[create_test_file("anim.GIF")]).is_ok());
    assert!(policy.validate(&[create_test_file("photo.webp")]).is_err());
}

#[test]
fn test_stored_file_name_shape() {
    let first: String = stored_file_name("png", now());
    let second: String = stored_file_name("png", now());

    assert!(first.starts_with("images_1714550400000_"), "{first}");
    assert!(first.ends_with(".png"));
    let suffix: &str = first
        .trim_start_matches("images_1714550400000_")
        .trim_end_matches(".png");
    assert_eq!(suffix.len(), 16);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first, second);
}

#[test]
fn test_media_errors_translate_to_api_errors() {
    let rejected: ApiError = ApiError::from(MediaError::UnsupportedType {
        file_name: String::from("x.exe"),
    });
    assert!(matches!(rejected, ApiError::InvalidInput { field, .. } if field == "images"));

    let storage: ApiError = ApiError::from(MediaError::Storage(String::from("disk full")));
    assert!(matches!(storage, ApiError::Internal { .. }));
}
