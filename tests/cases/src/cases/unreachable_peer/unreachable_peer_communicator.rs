use bully::{new_err, BullyError, BullyErrorKind};
use bully::{
    ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse, PeerRequest,
    PeerRequestChannels, PeerRequestHandler,
};
use bully_modules::InProcPeerCommunicator;
use crossbeam_channel::Receiver;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fails every request to the unreachable nodes, delegates the rest.
#[derive(Clone, Debug)]
pub struct UnreachablePeerCommunicator {
    inner: InProcPeerCommunicator,
    unreachable_nodes: Vec<u64>,
    blocked_requests: Arc<AtomicUsize>,
}

impl UnreachablePeerCommunicator {
    pub fn new(
        inner: InProcPeerCommunicator,
        unreachable_nodes: Vec<u64>,
    ) -> UnreachablePeerCommunicator {
        UnreachablePeerCommunicator {
            inner,
            unreachable_nodes,
            blocked_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn blocked_requests(&self) -> usize {
        self.blocked_requests.load(Ordering::SeqCst)
    }

    fn check_reachable(&self, destination_node_id: u64) -> Result<(), BullyError> {
        if self.unreachable_nodes.contains(&destination_node_id) {
            self.blocked_requests.fetch_add(1, Ordering::SeqCst);
            return new_err(
                BullyErrorKind::Transport,
                format!("Node {} is unreachable", destination_node_id),
                String::new(),
            );
        }

        Ok(())
    }
}

impl PeerRequestHandler for UnreachablePeerCommunicator {
    fn send_election_request(
        &self,
        destination_node_id: u64,
        request: ElectionRequest,
    ) -> Result<ElectionResponse, BullyError> {
        self.check_reachable(destination_node_id)?;
        self.inner.send_election_request(destination_node_id, request)
    }

    fn send_heartbeat_request(
        &self,
        destination_node_id: u64,
        request: HeartbeatRequest,
    ) -> Result<HeartbeatResponse, BullyError> {
        self.check_reachable(destination_node_id)?;
        self.inner.send_heartbeat_request(destination_node_id, request)
    }
}

impl PeerRequestChannels for UnreachablePeerCommunicator {
    fn election_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<ElectionRequest, ElectionResponse>> {
        self.inner.election_request_rx(node_id)
    }

    fn heartbeat_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<HeartbeatRequest, HeartbeatResponse>> {
        self.inner.heartbeat_request_rx(node_id)
    }
}
