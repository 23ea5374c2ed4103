pub mod input;
pub mod score;
pub mod service;
pub mod store;

pub use input::{ScoreInputError, parse_score};
pub use score::{Leaderboard, MAX_TOP_SCORES, Score};
pub use service::{ScoreService, ServiceError, Submission};
pub use store::{ScoreStore, StoreError};
