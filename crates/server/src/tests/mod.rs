// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use std::sync::{Arc, Mutex as StdMutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use safelink_api::{MediaError, MediaStore, UploadPolicy, UploadedFile};
use safelink_domain::{ActorDraft, ActorProfile, Role};
use safelink_persistence::SqlitePersistence;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::session::ACTOR_HEADER;
use crate::{AppState, build_router};

pub const BOUNDARY: &str = "safelink-test-boundary";

/// Records stored file names and returns predictable URIs.
#[derive(Default)]
pub struct RecordingMediaStore {
    pub stored: StdMutex<Vec<String>>,
}

impl MediaStore for RecordingMediaStore {
    fn store(&self, file: &UploadedFile, _now: OffsetDateTime) -> Result<String, MediaError> {
        self.stored.lock().unwrap().push(file.file_name.clone());
        Ok(format!("http://localhost:4000/uploads/{}", file.file_name))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: Arc<RecordingMediaStore>,
}

/// Helper to create a router over an in-memory database.
pub fn create_test_app() -> TestApp {
    let persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    let media: Arc<RecordingMediaStore> = Arc::new(RecordingMediaStore::default());
    let state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        media: media.clone(),
        upload_policy: Arc::new(UploadPolicy::default()),
    };
    TestApp {
        router: build_router(state.clone()),
        state,
        media,
    }
}

impl TestApp {
    pub async fn create_actor(&self, email: &str, role: Role) -> ActorProfile {
        let draft: ActorDraft = ActorDraft {
            email: email.to_string(),
            full_name: format!("Test {role}"),
            role,
            is_verified: true,
            is_active: true,
            ..ActorDraft::default()
        };
        self.state
            .persistence
            .lock()
            .await
            .create_actor(&draft, OffsetDateTime::now_utc())
            .expect("actor")
    }

    /// Sends a request and returns the status with the decoded JSON body,
    /// or `Value::Null` for an empty body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status: StatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    actor: Option<&ActorProfile>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.id.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, actor: Option<&ActorProfile>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor.id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a multipart request with one `images` part per file name.
pub fn multipart_request(uri: &str, actor: &ActorProfile, file_names: &[&str]) -> Request<Body> {
    multipart_form_request(uri, actor, &[], file_names)
}

/// Builds a multipart request with text parts followed by `images` parts.
pub fn multipart_form_request(
    uri: &str,
    actor: &ActorProfile,
    fields: &[(&str, &str)],
    file_names: &[&str],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for name in file_names {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; \
                 filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(ACTOR_HEADER, actor.id.to_string())
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
