use crate::communication::duplex_channel::DuplexChannel;

use bully::{new_err, BullyError, BullyErrorKind};
use bully::{
    ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse, PeerRequest,
    PeerRequestChannels, PeerRequestHandler,
};
use crossbeam_channel::Receiver;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Basic in-memory implementation of the PeerRequestHandler and PeerRequestChannels traits.
#[derive(Clone, Debug)]
pub struct InProcPeerCommunicator {
    timeout: Duration,
    election_channels: Arc<HashMap<u64, DuplexChannel<ElectionRequest, ElectionResponse>>>,
    heartbeat_channels: Arc<HashMap<u64, DuplexChannel<HeartbeatRequest, HeartbeatResponse>>>,
}

impl InProcPeerCommunicator {
    /// Create new instance of the InProcPeerCommunicator with node ids and communication timeout.
    pub fn new(nodes: Vec<u64>, timeout: Duration) -> InProcPeerCommunicator {
        let mut election_channels = HashMap::new();
        let mut heartbeat_channels = HashMap::new();

        for node_id in nodes {
            let election_duplex =
                DuplexChannel::new(format!("Election channel NodeId={}", node_id), timeout);
            let heartbeat_duplex =
                DuplexChannel::new(format!("Heartbeat channel NodeId={}", node_id), timeout);

            election_channels.insert(node_id, election_duplex);
            heartbeat_channels.insert(node_id, heartbeat_duplex);
        }

        InProcPeerCommunicator {
            timeout,
            election_channels: Arc::new(election_channels),
            heartbeat_channels: Arc::new(heartbeat_channels),
        }
    }

    /// Communication timeout for the sends and receives.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn unknown_node_err<T>(destination_node_id: u64) -> Result<T, BullyError> {
        new_err(
            BullyErrorKind::Transport,
            format!("No channel for NodeId={}", destination_node_id),
            String::new(),
        )
    }
}

impl PeerRequestHandler for InProcPeerCommunicator {
    fn send_election_request(
        &self,
        destination_node_id: u64,
        request: ElectionRequest,
    ) -> Result<ElectionResponse, BullyError> {
        trace!(
            "Destination Node {} Sending request {}",
            destination_node_id,
            request
        );

        let resp = match self.election_channels.get(&destination_node_id) {
            Some(channel) => channel.send_request(request),
            None => InProcPeerCommunicator::unknown_node_err(destination_node_id),
        };

        trace!(
            "Destination Node {} Response {:?}",
            destination_node_id,
            resp
        );

        resp
    }

    fn send_heartbeat_request(
        &self,
        destination_node_id: u64,
        request: HeartbeatRequest,
    ) -> Result<HeartbeatResponse, BullyError> {
        trace!(
            "Destination Node {} Sending request {}",
            destination_node_id,
            request
        );

        match self.heartbeat_channels.get(&destination_node_id) {
            Some(channel) => channel.send_request(request),
            None => InProcPeerCommunicator::unknown_node_err(destination_node_id),
        }
    }
}

impl PeerRequestChannels for InProcPeerCommunicator {
    fn election_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<ElectionRequest, ElectionResponse>> {
        self.election_channels[&node_id].request_rx()
    }

    fn heartbeat_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<HeartbeatRequest, HeartbeatResponse>> {
        self.heartbeat_channels[&node_id].request_rx()
    }
}
