use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::RecordId;

/// A finished quiz attempt. Body of `POST /student/quiz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub game_id: String,
    pub score: usize,
    pub total_questions: usize,
    /// score / total × 100, rounded
    pub percentage: u32,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(game_id: impl Into<String>, score: usize, total_questions: usize) -> Self {
        let percentage = if total_questions == 0 {
            0
        } else {
            (score as f64 / total_questions as f64 * 100.0).round() as u32
        };
        Self {
            id: RecordId::new(),
            game_id: game_id.into(),
            score,
            total_questions,
            percentage,
            completed_at: Utc::now(),
        }
    }
}
