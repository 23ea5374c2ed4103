use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use brainflip_server::build_app;
use brainflip_server::config::{ServerConfig, StorageConfig};

pub const INDEX_HTML: &str = "<!doctype html><title>BrainFlip</title>";

pub struct TestServer {
    pub addr: SocketAddr,
    /// Score file the server writes to.
    pub scores_path: PathBuf,
    _dir: tempfile::TempDir,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with fresh storage and a one-page web root.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let web_root = dir.path().join("public");
        std::fs::create_dir_all(&web_root).unwrap();
        std::fs::write(web_root.join("index.html"), INDEX_HTML).unwrap();

        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            web_root: web_root.to_string_lossy().into_owned(),
            storage: StorageConfig {
                dir: dir.path().join("storage").to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
        };
        Self::from_config(config, dir).await
    }

    async fn from_config(config: ServerConfig, dir: tempfile::TempDir) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let scores_path = config.score_store().path().to_path_buf();
        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            scores_path,
            _dir: dir,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url())
    }

    /// POST a JSON body to /api/scores.
    pub async fn submit(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.scores_url())
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// GET /api/scores and decode the leaderboard.
    pub async fn leaderboard(&self) -> Vec<i64> {
        let resp = reqwest::get(self.scores_url()).await.unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }
}
