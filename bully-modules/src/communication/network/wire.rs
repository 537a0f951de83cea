use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;

use bully::{new_err, BullyError, BullyErrorKind};
use bully::{ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse};

/// Peer request as sent over TCP: one JSON object per line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireRequest {
    Election { candidate_id: u64 },
    Heartbeat { leader_id: u64 },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireResponse {
    Election { is_greater: bool, peer_id: u64 },
    Heartbeat { success: bool, peer_id: u64 },

    /// The receiving node failed to handle the request.
    Rejected { kind: WireErrorKind, text: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WireErrorKind {
    Transport,
    ProtocolViolation,
    Resource,
}

impl WireResponse {
    pub fn rejected(err: &BullyError) -> WireResponse {
        WireResponse::Rejected {
            kind: err.kind().into(),
            text: err.to_string(),
        }
    }
}

impl From<BullyErrorKind> for WireErrorKind {
    fn from(kind: BullyErrorKind) -> Self {
        match kind {
            BullyErrorKind::Transport => WireErrorKind::Transport,
            BullyErrorKind::ProtocolViolation => WireErrorKind::ProtocolViolation,
            BullyErrorKind::Resource => WireErrorKind::Resource,
        }
    }
}

impl From<WireErrorKind> for BullyErrorKind {
    fn from(kind: WireErrorKind) -> Self {
        match kind {
            WireErrorKind::Transport => BullyErrorKind::Transport,
            WireErrorKind::ProtocolViolation => BullyErrorKind::ProtocolViolation,
            WireErrorKind::Resource => BullyErrorKind::Resource,
        }
    }
}

impl From<ElectionRequest> for WireRequest {
    fn from(request: ElectionRequest) -> Self {
        WireRequest::Election {
            candidate_id: request.candidate_id,
        }
    }
}

impl From<HeartbeatRequest> for WireRequest {
    fn from(request: HeartbeatRequest) -> Self {
        WireRequest::Heartbeat {
            leader_id: request.leader_id,
        }
    }
}

impl From<ElectionResponse> for WireResponse {
    fn from(response: ElectionResponse) -> Self {
        WireResponse::Election {
            is_greater: response.is_greater,
            peer_id: response.peer_id,
        }
    }
}

impl From<HeartbeatResponse> for WireResponse {
    fn from(response: HeartbeatResponse) -> Self {
        WireResponse::Heartbeat {
            success: response.success,
            peer_id: response.peer_id,
        }
    }
}

/// Serializes the message and writes it as a single line.
pub fn write_line<W, T>(writer: &mut W, message: &T) -> Result<(), BullyError>
where
    W: Write,
    T: Serialize,
{
    let mut line = match serde_json::to_string(message) {
        Ok(line) => line,
        Err(err) => {
            return new_err(
                BullyErrorKind::ProtocolViolation,
                "Cannot serialize message".to_string(),
                err.to_string(),
            )
        }
    };
    line.push('\n');

    let write_result = writer
        .write_all(line.as_bytes())
        .and_then(|_| writer.flush());
    if let Err(err) = write_result {
        return new_err(
            BullyErrorKind::Transport,
            "Cannot write message".to_string(),
            err.to_string(),
        );
    }

    Ok(())
}

pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, BullyError> {
    match serde_json::from_str(line.trim()) {
        Ok(message) => Ok(message),
        Err(err) => new_err(
            BullyErrorKind::ProtocolViolation,
            "Malformed message".to_string(),
            err.to_string(),
        ),
    }
}
