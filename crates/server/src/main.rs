// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod media_store;
mod routes;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use clap::Parser;
use safelink_api::{MediaStore, UploadPolicy, seed_admin};
use safelink_persistence::SqlitePersistence;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::media_store::DiskMediaStore;
use crate::routes::{
    handle_active_case, handle_admin_append_images, handle_admin_create_case,
    handle_admin_delete_case, handle_admin_get_case, handle_admin_update_case,
    handle_append_images, handle_assign_case, handle_create_actor, handle_create_case,
    handle_delete_actor, handle_delete_case, handle_get_case, handle_health, handle_list_actors,
    handle_list_cases, handle_list_my_cases, handle_list_officers, handle_set_eta,
    handle_update_actor, handle_update_case, handle_update_profile, handle_whoami,
};

/// Extra room above the file payload for multipart framing and text parts.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// `SafeLink` Server - HTTP server for the incident case subsystem
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "SAFELINK_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "SAFELINK_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Directory that receives uploaded images
    #[arg(long, env = "UPLOAD_PATH", default_value = "./uploads")]
    upload_dir: PathBuf,

    /// Origin under which `/uploads` is publicly reachable
    #[arg(
        long,
        env = "SAFELINK_PUBLIC_BASE_URL",
        default_value = "http://localhost:4000"
    )]
    public_base_url: String,

    /// Per-file upload limit in bytes
    #[arg(long, env = "MAX_FILE_SIZE", default_value_t = safelink_api::DEFAULT_MAX_FILE_SIZE)]
    max_file_size: usize,

    /// Comma-separated image extensions accepted for upload
    #[arg(long, env = "ALLOWED_IMAGE_TYPES", default_value = "jpg,jpeg,png,webp")]
    allowed_image_types: String,

    /// Email of an administrator to create at startup if absent
    #[arg(long, env = "SAFELINK_SEED_ADMIN_EMAIL")]
    seed_admin_email: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex; each request holds it for
/// one API call.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<Mutex<SqlitePersistence>>,
    pub media: Arc<dyn MediaStore>,
    pub upload_policy: Arc<UploadPolicy>,
}

/// Builds the application router with all API endpoints.
///
/// Static upload serving is attached separately in `main` so tests can
/// exercise the API without a filesystem.
fn build_router(app_state: AppState) -> Router {
    let body_limit: usize = app_state
        .upload_policy
        .max_file_size
        .saturating_mul(app_state.upload_policy.max_files)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/api/health", get(handle_health))
        .route(
            "/api/profile/me",
            get(handle_whoami)
                .patch(handle_update_profile)
                .put(handle_update_profile),
        )
        .route("/api/emergency", post(handle_create_case))
        .route("/api/emergency/my", get(handle_list_my_cases))
        .route("/api/emergency/my/active", get(handle_active_case))
        .route(
            "/api/emergency/{case_ref}",
            get(handle_get_case)
                .patch(handle_update_case)
                .delete(handle_delete_case),
        )
        .route(
            "/api/emergency/{case_ref}/images",
            post(handle_append_images),
        )
        .route(
            "/api/admin/emergency/officers",
            get(handle_list_officers),
        )
        .route(
            "/api/admin/emergency/incidents",
            get(handle_list_cases).post(handle_admin_create_case),
        )
        .route(
            "/api/admin/emergency/incidents/{case_ref}",
            get(handle_admin_get_case)
                .patch(handle_admin_update_case)
                .delete(handle_admin_delete_case),
        )
        .route(
            "/api/admin/emergency/incidents/{case_ref}/assign",
            post(handle_assign_case),
        )
        .route(
            "/api/admin/emergency/incidents/{case_ref}/eta",
            post(handle_set_eta),
        )
        .route(
            "/api/admin/emergency/incidents/{case_ref}/images",
            post(handle_admin_append_images),
        )
        .route(
            "/api/admin/users",
            get(handle_list_actors).post(handle_create_actor),
        )
        .route(
            "/api/admin/users/{id}",
            patch(handle_update_actor).delete(handle_delete_actor),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SafeLink Server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    if let Some(email) = &args.seed_admin_email {
        seed_admin(&mut persistence, email, OffsetDateTime::now_utc())?;
    }

    let media: DiskMediaStore = DiskMediaStore::new(&args.upload_dir, &args.public_base_url)?;
    info!(upload_dir = %media.root().display(), "Serving uploads");
    let uploads: ServeDir = ServeDir::new(media.root());

    let upload_policy: UploadPolicy =
        UploadPolicy::from_extension_list(args.max_file_size, &args.allowed_image_types);
    info!(
        max_file_size = upload_policy.max_file_size,
        allowed = ?upload_policy.allowed_extensions,
        "Upload policy"
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        media: Arc::new(media),
        upload_policy: Arc::new(upload_policy),
    };

    let app: Router = build_router(app_state)
        .nest_service("/uploads", uploads)
        .layer(TraceLayer::new_for_http());

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
