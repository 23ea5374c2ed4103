use std::sync::Arc;
use tokio::sync::Mutex;

use brainflip_core::ScoreService;

use crate::config::ServerConfig;

/// Submissions are serialized through this lock, so in-process writers
/// never lose updates. Other processes sharing the file still race.
pub type SharedScoreService = Arc<Mutex<ScoreService>>;

#[derive(Clone)]
pub struct AppState {
    pub scores: SharedScoreService,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let service = ScoreService::new(config.score_store());
        Self {
            scores: Arc::new(Mutex::new(service)),
            config: Arc::new(config),
        }
    }
}
