//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubely-api`. The record store is in memory and the
//! asset root is a fresh temporary directory per test app.

pub mod fixtures;
pub mod stores;

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;
use tubely_api::auth::issue_access_token;
use tubely_api::setup::routes::setup_routes;
use tubely_api::AppState;
use tubely_core::models::Video;
use tubely_core::{Config, LogFormat, RecordStoreBackend};
use tubely_db::VideoRepository;
use tubely_storage::LocalStorage;

use stores::{CountingStorage, CountingVideoRepository};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_JWT_ISSUER: &str = "tubely-access";
pub const TEST_BASE_URL: &str = "http://localhost:8091";

/// Test application: server plus handles on its stores.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<CountingVideoRepository>,
    pub storage: Arc<CountingStorage>,
    pub config: Config,
    pub assets: TempDir,
}

pub fn test_config(assets_root: PathBuf) -> Config {
    Config {
        server_port: 8091,
        environment: "test".to_string(),
        log_format: LogFormat::Compact,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_issuer: TEST_JWT_ISSUER.to_string(),
        assets_root,
        assets_route: "assets".to_string(),
        public_base_url: TEST_BASE_URL.to_string(),
        max_upload_bytes: 10 << 20,
        max_memory_bytes: 10 << 20,
        record_store: RecordStoreBackend::Memory,
        database_url: None,
        db_max_connections: 1,
        db_timeout_seconds: 5,
    }
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked config (limits, asset route, ...).
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> TestApp {
        let assets = tempfile::tempdir().expect("Failed to create temp directory");
        let mut config = test_config(assets.path().to_path_buf());
        configure(&mut config);
        config.validate().expect("test config must be valid");

        let local = LocalStorage::new(assets.path())
            .await
            .expect("Failed to create local storage");
        let storage = Arc::new(CountingStorage::new(local));
        let videos = Arc::new(CountingVideoRepository::new());

        let state = Arc::new(AppState::new(
            config.clone(),
            videos.clone(),
            storage.clone(),
        ));
        let server = TestServer::new(setup_routes(state)).expect("Failed to start test server");

        TestApp {
            server,
            videos,
            storage,
            config,
            assets,
        }
    }

    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, subject: &str) -> String {
        issue_access_token(
            subject,
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER,
            chrono::Duration::hours(1),
        )
        .expect("Failed to issue token")
    }

    pub fn bearer(&self, subject: &str) -> String {
        format!("Bearer {}", self.token_for(subject))
    }

    /// Insert a video directly, bypassing the counters.
    pub async fn seed_video(&self, video: Video) -> Video {
        self.videos
            .inner()
            .create(&video)
            .await
            .expect("Failed to seed video")
    }

    pub async fn seed_owned_by(&self, owner: &str) -> Video {
        self.seed_video(Video::draft(owner, "Boots", "a walkthrough"))
            .await
    }

    /// Current stored record, bypassing the counters.
    pub async fn stored(&self, video: &Video) -> Video {
        self.videos
            .inner()
            .fetch(video.id)
            .await
            .expect("video should exist")
    }

    pub fn asset_path(&self, key: &str) -> PathBuf {
        self.assets.path().join(key)
    }

    pub fn asset_url(&self, key: &str) -> String {
        format!("{}/assets/{}", TEST_BASE_URL, key)
    }

    /// Files in the asset root, sorted.
    pub fn asset_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.assets.path())
            .expect("asset root should be readable")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn upload_path(video_id: impl std::fmt::Display) -> String {
    format!("/api/thumbnail_upload/{}", video_id)
}
