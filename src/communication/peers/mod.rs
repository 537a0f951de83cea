use crossbeam_channel::{Receiver, Sender};

use crate::errors::{new_err, BullyError, BullyErrorKind, Result};
use crate::Cluster;

/// Election RPC request. Sent by a candidate to every peer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Election request: candidate_id {}", candidate_id)]
pub struct ElectionRequest {
    /// Identity (priority) of the candidate.
    pub candidate_id: u64,
}

/// Election RPC response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Election response: is_greater {} peer_id {}", is_greater, peer_id)]
pub struct ElectionResponse {
    /// True if the responding peer has a higher identity than the candidate.
    pub is_greater: bool,

    /// Identity of the responding peer.
    pub peer_id: u64,
}

/// Heartbeat RPC request. Sent by the leader to every peer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Heartbeat request: leader_id {}", leader_id)]
pub struct HeartbeatRequest {
    /// Identity of the sending leader.
    pub leader_id: u64,
}

/// Heartbeat RPC response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[display(fmt = "Heartbeat response: success {} peer_id {}", success, peer_id)]
pub struct HeartbeatResponse {
    /// Always true when the handler ran.
    pub success: bool,

    /// Identity of the responding peer.
    pub peer_id: u64,
}

/// Inbound request paired with the channel for its own reply.
#[derive(Debug)]
pub struct PeerRequest<Request, Response> {
    pub request: Request,
    response_tx: Sender<Result<Response>>,
}

impl<Request, Response> PeerRequest<Request, Response> {
    /// Creates the request envelope and the receiver for the reply.
    pub fn new(request: Request) -> (PeerRequest<Request, Response>, Receiver<Result<Response>>) {
        let (response_tx, response_rx) = crossbeam_channel::bounded(1);

        (PeerRequest { request, response_tx }, response_rx)
    }

    /// Sends the reply back to the requester. Fails if the requester stopped waiting.
    pub fn respond(self, response: Result<Response>) -> Result<()> {
        if let Err(err) = self.response_tx.send(response) {
            return new_err(
                BullyErrorKind::Transport,
                "Requester is not waiting for the response".to_string(),
                err.to_string(),
            );
        }

        Ok(())
    }
}

/// Outbound part of the peer transport.
pub trait PeerRequestHandler: Send + Sync + Clone + 'static {
    /// Sends the election request to the peer and waits for the reply.
    fn send_election_request(
        &self,
        destination_node_id: u64,
        request: ElectionRequest,
    ) -> std::result::Result<ElectionResponse, BullyError>;

    /// Sends the heartbeat request to the peer and waits for the reply.
    fn send_heartbeat_request(
        &self,
        destination_node_id: u64,
        request: HeartbeatRequest,
    ) -> std::result::Result<HeartbeatResponse, BullyError>;
}

/// Inbound part of the peer transport.
pub trait PeerRequestChannels: Send + Sync + Clone + 'static {
    /// Returns receiver channel for the election requests addressed to the node.
    fn election_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<ElectionRequest, ElectionResponse>>;

    /// Returns receiver channel for the heartbeat requests addressed to the node.
    fn heartbeat_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<HeartbeatRequest, HeartbeatResponse>>;
}

/// Rejects requests from the node itself or from outside the cluster.
pub(crate) fn validate_sender<Cl: Cluster>(
    node_id: u64,
    sender_id: u64,
    cluster: &Cl,
) -> Result<()> {
    if sender_id == node_id {
        return new_err(
            BullyErrorKind::ProtocolViolation,
            format!("Node {} received a request carrying its own identity", node_id),
            String::new(),
        );
    }

    if !cluster.is_member(sender_id) {
        return new_err(
            BullyErrorKind::ProtocolViolation,
            format!("Node {} received a request from unknown node {}", node_id, sender_id),
            String::new(),
        );
    }

    Ok(())
}
