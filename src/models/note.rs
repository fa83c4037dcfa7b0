use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl Note {
    pub fn new(id: String, text: String, created_at: Timestamp) -> Self {
        Self {
            id,
            text,
            created_at,
        }
    }
}
