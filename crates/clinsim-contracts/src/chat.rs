//! Conversation turns exchanged with the simulated patient.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Doctor,
    Patient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub content: String,
}

impl ChatTurn {
    pub fn doctor(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Doctor,
            content: content.into(),
        }
    }

    pub fn patient(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Patient,
            content: content.into(),
        }
    }
}
