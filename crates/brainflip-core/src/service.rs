use serde::Serialize;
use serde_json::Value;

use crate::input::{ScoreInputError, parse_score};
use crate::score::Leaderboard;
use crate::store::{ScoreStore, StoreError};

/// Failure of a service operation.
///
/// `Display` yields the message shown to clients. For storage failures the
/// underlying [`StoreError`] is only reachable through `source()`.
#[derive(Debug)]
pub enum ServiceError {
    Invalid(ScoreInputError),
    LoadFailed(StoreError),
    SaveFailed(StoreError),
}

impl ServiceError {
    /// True when the caller sent bad input, as opposed to a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "{e}"),
            Self::LoadFailed(_) => f.write_str("Failed to load scores"),
            Self::SaveFailed(_) => f.write_str("Failed to save score"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::LoadFailed(e) | Self::SaveFailed(e) => Some(e),
        }
    }
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub success: bool,
    pub top_scores: Leaderboard,
}

/// Validates submissions and orchestrates the score store.
#[derive(Debug, Clone)]
pub struct ScoreService {
    store: ScoreStore,
}

impl ScoreService {
    pub fn new(store: ScoreStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ScoreStore {
        &self.store
    }

    /// Current leaderboard.
    pub fn list(&self) -> Result<Leaderboard, ServiceError> {
        self.store.load_scores().map_err(ServiceError::LoadFailed)
    }

    /// Validate the raw `score` field and record it.
    pub fn submit(&self, raw: Option<&Value>) -> Result<Submission, ServiceError> {
        let score = parse_score(raw).map_err(ServiceError::Invalid)?;
        let top_scores = self
            .store
            .save_score(score)
            .map_err(ServiceError::SaveFailed)?;
        tracing::debug!(score, top = ?top_scores.scores(), "Score recorded");
        Ok(Submission {
            success: true,
            top_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error as _;

    fn temp_service() -> (tempfile::TempDir, ScoreService) {
        let dir = tempfile::tempdir().unwrap();
        let service = ScoreService::new(ScoreStore::new(dir.path().join("storage")));
        (dir, service)
    }

    #[test]
    fn list_starts_empty() {
        let (_dir, service) = temp_service();
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn submit_returns_updated_board() {
        let (_dir, service) = temp_service();
        service.submit(Some(&json!(10))).unwrap();
        service.submit(Some(&json!("5"))).unwrap();
        let submission = service.submit(Some(&json!(20))).unwrap();
        assert!(submission.success);
        assert_eq!(submission.top_scores.scores(), &[20, 10, 5]);
        assert_eq!(service.list().unwrap(), submission.top_scores);
    }

    #[test]
    fn rejected_input_is_not_persisted() {
        let (_dir, service) = temp_service();
        for raw in [None, Some(json!("abc")), Some(json!(-3))] {
            let err = service.submit(raw.as_ref()).unwrap_err();
            assert!(err.is_client_error());
        }
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn validation_errors_carry_client_messages() {
        let (_dir, service) = temp_service();
        let cases = [
            (None, "Score is required"),
            (Some(json!("abc")), "Invalid score format"),
            (Some(json!(-1)), "Score must be non-negative"),
        ];
        for (raw, message) in cases {
            let err = service.submit(raw.as_ref()).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn save_failure_hides_cause_behind_generic_message() {
        let (_dir, service) = temp_service();
        std::fs::create_dir_all(service.store().path()).unwrap();

        let err = service.submit(Some(&json!(4))).unwrap_err();
        assert!(matches!(err, ServiceError::SaveFailed(_)));
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Failed to save score");
        assert!(
            err.source()
                .unwrap()
                .to_string()
                .contains("failed to write score file")
        );
    }

    #[test]
    fn load_failure_uses_generic_message() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("storage");
        std::fs::write(&blocker, "").unwrap();
        let service = ScoreService::new(ScoreStore::new(&blocker));

        let err = service.list().unwrap_err();
        assert_eq!(err.to_string(), "Failed to load scores");
    }

    #[test]
    fn submission_serializes_to_response_body() {
        let submission = Submission {
            success: true,
            top_scores: Leaderboard::from_scores([3, 9]),
        };
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({ "success": true, "top_scores": [9, 3] })
        );
    }
}
