//! Line-delimited JSON messages exchanged with the robot controller.
//!
//! Every message is a JSON object with a `type` field, terminated by a
//! newline. Extra fields are ignored; missing or mistyped required fields
//! are errors.
//!
//! ```
//! use tape_targets::messages::{parse_message, Message};
//!
//! let msg = parse_message(r#"{"type": "stop"}"#).unwrap();
//! assert_eq!(msg, Message::Stop);
//! assert_eq!(msg.encode().unwrap(), "{\"type\":\"stop\"}\n");
//! ```

use serde::{Deserialize, Serialize};

use crate::detect::DetectionResult;
use crate::stereo::StereoEstimate;

#[derive(thiserror::Error, Debug)]
pub enum MessageError {
    #[error("empty message")]
    Empty,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Start streaming video to `host:port` with the given exposure settings.
    Start {
        port: u16,
        host: String,
        iso: u32,
        shutterspeed: u32,
    },
    Stop,
    Error {
        message: String,
    },
    Results {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        corners: Option<Vec<[f32; 2]>>,
        /// Lateral offset of the target from the frame centre, pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        xdisp: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        distance: Option<f64>,
    },
}

impl Message {
    /// Results message for one frame; corners are omitted when nothing was found.
    pub fn results(detection: Option<&DetectionResult>, estimate: Option<&StereoEstimate>) -> Self {
        let corners = detection
            .filter(|d| !d.is_empty())
            .map(DetectionResult::corner_pairs);
        Message::Results {
            corners,
            xdisp: estimate.map(|e| e.lateral_offset),
            distance: estimate.map(|e| e.distance),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Message::Error {
            message: message.into(),
        }
    }

    /// Serialize to a single newline-terminated line.
    pub fn encode(&self) -> Result<String, MessageError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Parse and validate one message line.
pub fn parse_message(line: &str) -> Result<Message, MessageError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(MessageError::Empty);
    }
    Ok(serde_json::from_str(line)?)
}
