use crossbeam_channel::Receiver;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use bully::{new_err, BullyError, BullyErrorKind};
use bully::{
    ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse, PeerRequest,
    PeerRequestChannels, PeerRequestHandler,
};

use crate::communication::duplex_channel::DuplexChannel;
use crate::communication::network::client_requests;
use crate::communication::network::wire::{WireRequest, WireResponse};
use crate::service_discovery::PeerCommunicatorServiceDiscovery;

/// Peer transport of a single node over TCP. Outbound requests open a connection to the
/// destination address, inbound ones are handed to the local node through duplex channels.
#[derive(Clone, Debug)]
pub struct NetworkPeerCommunicator<Psd>
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    node_id: u64,
    timeout: Duration,
    service_discovery: Psd,
    election_channel: DuplexChannel<ElectionRequest, ElectionResponse>,
    heartbeat_channel: DuplexChannel<HeartbeatRequest, HeartbeatResponse>,
}

impl<Psd> NetworkPeerCommunicator<Psd>
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    pub fn new(node_id: u64, timeout: Duration, service_discovery: Psd) -> Self {
        NetworkPeerCommunicator {
            node_id,
            timeout,
            service_discovery,
            election_channel: DuplexChannel::new(
                format!("Election channel NodeId={}", node_id),
                timeout,
            ),
            heartbeat_channel: DuplexChannel::new(
                format!("Heartbeat channel NodeId={}", node_id),
                timeout,
            ),
        }
    }

    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Binds the address of the node and serves peer connections on a background thread.
    pub fn run_server(&self) -> Result<(), BullyError> {
        let address = self.address(self.node_id)?;

        let listener = match TcpListener::bind(address.as_str()) {
            Ok(listener) => listener,
            Err(err) => {
                return new_err(
                    BullyErrorKind::Resource,
                    format!("Cannot listen on {}", address),
                    err.to_string(),
                )
            }
        };

        let communicator = self.clone();
        thread::spawn(move || super::server::run_server(listener, communicator));

        Ok(())
    }

    /// Dials every peer until it accepts a connection. Fails when some peer is still
    /// unreachable after the timeout.
    pub fn wait_for_peers(
        &self,
        retry_interval: Duration,
        timeout: Duration,
    ) -> Result<(), BullyError> {
        let deadline = Instant::now() + timeout;

        for peer_id in self.service_discovery.node_ids() {
            if peer_id == self.node_id {
                continue;
            }
            let address = self.address(peer_id)?;

            loop {
                match client_requests::connect(&address, self.timeout) {
                    Ok(_) => {
                        info!("Node {} Connected to node {}", self.node_id, peer_id);
                        break;
                    }
                    Err(err) if Instant::now() >= deadline => {
                        return new_err(
                            BullyErrorKind::Transport,
                            format!("Node {} is unreachable", peer_id),
                            err.to_string(),
                        );
                    }
                    Err(err) => {
                        info!("Node {} {}. Trying again", self.node_id, err);
                        thread::sleep(retry_interval);
                    }
                }
            }
        }

        Ok(())
    }

    /// Hands the request to the local node and converts its reply.
    pub(crate) fn process_wire_request(&self, request: WireRequest) -> WireResponse {
        let result = match request {
            WireRequest::Election { candidate_id } => self
                .election_channel
                .send_request(ElectionRequest { candidate_id })
                .map(WireResponse::from),
            WireRequest::Heartbeat { leader_id } => self
                .heartbeat_channel
                .send_request(HeartbeatRequest { leader_id })
                .map(WireResponse::from),
        };

        match result {
            Ok(response) => response,
            Err(err) => WireResponse::rejected(&err),
        }
    }

    fn address(&self, node_id: u64) -> Result<String, BullyError> {
        match self.service_discovery.get_address(node_id) {
            Some(address) => Ok(address),
            None => new_err(
                BullyErrorKind::Transport,
                format!("No address for NodeId={}", node_id),
                String::new(),
            ),
        }
    }

    fn send(
        &self,
        destination_node_id: u64,
        request: WireRequest,
    ) -> Result<WireResponse, BullyError> {
        let address = self.address(destination_node_id)?;

        trace!(
            "Destination Node {}. Address ({}). Request {:?}",
            destination_node_id,
            address,
            request
        );

        match client_requests::send_request(&address, self.timeout, request)? {
            WireResponse::Rejected { kind, text } => new_err(
                kind.into(),
                format!("Request rejected by node {}", destination_node_id),
                text,
            ),
            response => Ok(response),
        }
    }

    fn local_request_rx<Req, Resp>(
        &self,
        node_id: u64,
        channel: &DuplexChannel<Req, Resp>,
    ) -> Receiver<PeerRequest<Req, Resp>> {
        if node_id != self.node_id {
            error!(
                "Node {} Network communicator has no channels for node {}",
                self.node_id, node_id
            );
            return crossbeam_channel::never();
        }

        channel.request_rx()
    }
}

fn unexpected_response<T>(
    destination_node_id: u64,
    response: WireResponse,
) -> Result<T, BullyError> {
    new_err(
        BullyErrorKind::ProtocolViolation,
        format!("Unexpected response from node {}", destination_node_id),
        format!("{:?}", response),
    )
}

impl<Psd> PeerRequestHandler for NetworkPeerCommunicator<Psd>
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    fn send_election_request(
        &self,
        destination_node_id: u64,
        request: ElectionRequest,
    ) -> Result<ElectionResponse, BullyError> {
        match self.send(destination_node_id, request.into())? {
            WireResponse::Election {
                is_greater,
                peer_id,
            } => Ok(ElectionResponse {
                is_greater,
                peer_id,
            }),
            response => unexpected_response(destination_node_id, response),
        }
    }

    fn send_heartbeat_request(
        &self,
        destination_node_id: u64,
        request: HeartbeatRequest,
    ) -> Result<HeartbeatResponse, BullyError> {
        match self.send(destination_node_id, request.into())? {
            WireResponse::Heartbeat { success, peer_id } => {
                Ok(HeartbeatResponse { success, peer_id })
            }
            response => unexpected_response(destination_node_id, response),
        }
    }
}

impl<Psd> PeerRequestChannels for NetworkPeerCommunicator<Psd>
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    fn election_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<ElectionRequest, ElectionResponse>> {
        self.local_request_rx(node_id, &self.election_channel)
    }

    fn heartbeat_request_rx(
        &self,
        node_id: u64,
    ) -> Receiver<PeerRequest<HeartbeatRequest, HeartbeatResponse>> {
        self.local_request_rx(node_id, &self.heartbeat_channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticTableServiceDiscovery;

    const TIMEOUT: Duration = Duration::from_millis(500);

    fn free_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();

        listener.local_addr().unwrap().to_string()
    }

    fn communicators(
        addresses: Vec<String>,
    ) -> Vec<NetworkPeerCommunicator<StaticTableServiceDiscovery>> {
        let discovery = StaticTableServiceDiscovery::from_lines(addresses.clone());

        (0..addresses.len() as u64)
            .map(|node_id| NetworkPeerCommunicator::new(node_id, TIMEOUT, discovery.clone()))
            .collect()
    }

    #[test]
    fn test_election_request_over_tcp() {
        let nodes = communicators(vec![free_address(), free_address()]);
        nodes[1].run_server().unwrap();
        let request_rx = nodes[1].election_request_rx(1);

        let responder = thread::spawn(move || {
            let peer_request = request_rx.recv().unwrap();
            let is_greater = 1 > peer_request.request.candidate_id;
            peer_request
                .respond(Ok(ElectionResponse { is_greater, peer_id: 1 }))
                .unwrap();
        });

        let resp = nodes[0]
            .send_election_request(1, ElectionRequest { candidate_id: 0 })
            .unwrap();

        assert_eq!(ElectionResponse { is_greater: true, peer_id: 1 }, resp);
        responder.join().unwrap();
    }

    #[test]
    fn test_rejected_heartbeat_keeps_error_kind() {
        let nodes = communicators(vec![free_address(), free_address()]);
        nodes[1].run_server().unwrap();
        let request_rx = nodes[1].heartbeat_request_rx(1);

        let responder = thread::spawn(move || {
            let peer_request = request_rx.recv().unwrap();
            peer_request
                .respond(new_err(
                    BullyErrorKind::ProtocolViolation,
                    "Unknown sender".to_string(),
                    String::new(),
                ))
                .unwrap();
        });

        let result = nodes[0].send_heartbeat_request(1, HeartbeatRequest { leader_id: 0 });

        assert_eq!(BullyErrorKind::ProtocolViolation, result.unwrap_err().kind());
        responder.join().unwrap();
    }

    #[test]
    fn test_silent_node_is_a_transport_failure() {
        let nodes = communicators(vec![free_address(), free_address()]);
        nodes[1].run_server().unwrap();

        let result = nodes[0].send_heartbeat_request(1, HeartbeatRequest { leader_id: 0 });

        assert_eq!(BullyErrorKind::Transport, result.unwrap_err().kind());
    }

    #[test]
    fn test_unreachable_node_is_a_transport_failure() {
        let nodes = communicators(vec![free_address(), free_address()]);

        let result = nodes[0].send_election_request(1, ElectionRequest { candidate_id: 0 });

        assert_eq!(BullyErrorKind::Transport, result.unwrap_err().kind());
    }

    #[test]
    fn test_unknown_node_is_a_transport_failure() {
        let nodes = communicators(vec![free_address()]);

        let result = nodes[0].send_election_request(7, ElectionRequest { candidate_id: 0 });

        assert_eq!(BullyErrorKind::Transport, result.unwrap_err().kind());
    }

    #[test]
    fn test_requests_for_other_nodes_are_never_received() {
        let nodes = communicators(vec![free_address(), free_address()]);

        let request_rx = nodes[0].election_request_rx(1);

        assert!(request_rx.recv_timeout(Duration::from_millis(20)).is_err());
    }

    #[test]
    fn test_wait_for_peers() {
        let nodes = communicators(vec![free_address(), free_address()]);
        let retry_interval = Duration::from_millis(20);

        let unreachable = nodes[0].wait_for_peers(retry_interval, Duration::from_millis(100));
        assert_eq!(BullyErrorKind::Transport, unreachable.unwrap_err().kind());

        nodes[1].run_server().unwrap();
        assert!(nodes[0].wait_for_peers(retry_interval, TIMEOUT).is_ok());
    }
}
