use bully::{NodeConfiguration, NodeTimings, NodeWorker};
use bully::{PeerRequestChannels, PeerRequestHandler};
use bully_modules::{ClusterConfiguration, InProcPeerCommunicator, RandomizedElectionTimer};
use bully_modules::{NetworkPeerCommunicator, StaticTableServiceDiscovery};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

pub mod cluster;

// The smallest failure detector interval must exceed the candidacy window,
// otherwise a lower node keeps refreshing the candidacy of a higher one.
const DETECTOR_RANGE_START_MS: u64 = 600;
const DETECTOR_RANGE_STOP_MS: u64 = 1200;
const DETECTOR_STEP_MS: u64 = 100;

pub fn get_peers_communication_timeout() -> Duration {
    Duration::from_millis(100)
}

pub fn get_case_timings() -> NodeTimings {
    NodeTimings {
        heartbeat_interval: Duration::from_millis(50),
        candidacy_window: Duration::from_millis(300),
        election_round_pause: Duration::from_millis(50),
    }
}

/// Enough for the failure detector to fire, the candidacy to run out and a few
/// communication timeouts on the way.
pub fn get_election_timeout() -> Duration {
    Duration::from_secs(5)
}

pub fn get_peer_communicator(nodes: Vec<u64>) -> InProcPeerCommunicator {
    InProcPeerCommunicator::new(nodes, get_peers_communication_timeout())
}

/// One TCP transport per node, listening on free local ports.
pub fn get_network_peer_communicators(
    nodes_count: u64,
) -> Vec<NetworkPeerCommunicator<StaticTableServiceDiscovery>> {
    let addresses: Vec<String> = (0..nodes_count).map(|_| get_free_address()).collect();
    let discovery = StaticTableServiceDiscovery::from_lines(addresses);

    (0..nodes_count)
        .map(|node_id| {
            NetworkPeerCommunicator::new(
                node_id,
                get_peers_communication_timeout(),
                discovery.clone(),
            )
        })
        .collect()
}

fn get_free_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("free port");

    listener.local_addr().expect("local address").to_string()
}

pub fn create_node<Pc>(node_id: u64, all_nodes: Vec<u64>, peer_communicator: Pc) -> NodeWorker
where
    Pc: PeerRequestHandler + PeerRequestChannels,
{
    let node_config = NodeConfiguration {
        node_id,
        cluster_configuration: ClusterConfiguration::new(all_nodes),
        peer_communicator,
        election_timer: RandomizedElectionTimer::new(
            DETECTOR_RANGE_START_MS,
            DETECTOR_RANGE_STOP_MS,
            DETECTOR_STEP_MS,
        ),
        timings: get_case_timings(),
    };

    bully::start_node(node_config).expect("node started")
}

pub fn sleep_ms(millis: u64) {
    thread::sleep(Duration::from_millis(millis));
}

/// Polls the condition until it holds or the timeout elapses.
pub fn wait_for<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep_ms(20);
    }
}
