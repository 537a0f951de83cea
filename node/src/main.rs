#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

extern crate bully;
extern crate bully_modules;

use std::env;
use std::io::Write;
use std::process;
use std::thread;
use std::time::Duration;

use chrono::prelude::{DateTime, Local};

use bully::{NodeConfiguration, NodeTimings, NodeWorker};
use bully_modules::{ClusterConfiguration, InProcPeerCommunicator, RandomizedElectionTimer};
use bully_modules::{NetworkPeerCommunicator, StaticTableServiceDiscovery};

const DEFAULT_RUN_SECONDS: u64 = 60;
const USAGE: &str = "Usage: node run <node_id> <cluster_file> \
                     | node demo [cluster_file] [run_seconds]";

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            let time = now.format("%H:%M:%S.%3f");
            writeln!(buf, "{:5}: {} - {}", record.level(), time, record.args())
        })
        .init();
}

fn main() {
    init_logger();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("run") => match (args.get(2).and_then(|arg| arg.parse().ok()), args.get(3)) {
            (Some(node_id), Some(path)) => run_network_node(node_id, path),
            _ => exit_with_usage(),
        },
        Some("demo") => run_demo(args.get(2), args.get(3)),
        None => run_demo(None, None),
        Some(_) => exit_with_usage(),
    }
}

fn exit_with_usage() -> ! {
    error!("{}", USAGE);
    process::exit(2);
}

fn read_cluster_file(path: &str) -> StaticTableServiceDiscovery {
    let discovery = match StaticTableServiceDiscovery::from_file(path) {
        Ok(discovery) => discovery,
        Err(err) => {
            error!("Cannot read cluster file {}: {}", path, err);
            process::exit(1);
        }
    };

    if discovery.node_ids().is_empty() {
        error!("Empty cluster file {}", path);
        process::exit(1);
    }

    discovery
}

/// Runs a single node of the cluster file, talking to its peers over TCP.
fn run_network_node(node_id: u64, cluster_file: &str) {
    let discovery = read_cluster_file(cluster_file);
    let node_ids = discovery.node_ids();
    if !node_ids.contains(&node_id) {
        error!("Node {} is not in the cluster {:?}", node_id, node_ids);
        process::exit(1);
    }

    let peer_communicator =
        NetworkPeerCommunicator::new(node_id, get_communication_timeout(), discovery.clone());
    if let Err(err) = peer_communicator.run_server() {
        error!("Node {} {}", node_id, err);
        process::exit(1);
    }

    info!("Node {} Address {:?}, waiting for peers", node_id, discovery.address(node_id));
    let wait_result =
        peer_communicator.wait_for_peers(get_dial_retry_interval(), get_peers_wait_timeout());
    if let Err(err) = wait_result {
        error!("Node {} {}", node_id, err);
        process::exit(1);
    }

    let node_config = NodeConfiguration {
        node_id,
        cluster_configuration: ClusterConfiguration::new(node_ids),
        peer_communicator,
        election_timer: RandomizedElectionTimer::default(),
        timings: NodeTimings::default(),
    };

    let node_worker = match bully::start_node(node_config) {
        Ok(node_worker) => node_worker,
        Err(err) => {
            error!("Node {} failed to start: {}", node_id, err);
            process::exit(1);
        }
    };

    if node_worker.join_handle.join().is_err() {
        error!("Node {} Worker panicked", node_id);
        process::exit(1);
    }
}

/// Runs all nodes in-process and stops the leader halfway through to show the fail-over.
fn run_demo(cluster_file: Option<&String>, run_seconds: Option<&String>) {
    let discovery = match cluster_file {
        Some(path) => read_cluster_file(path),
        None => StaticTableServiceDiscovery::from_lines((0..3).map(get_peer_requests_address)),
    };
    let run_seconds = run_seconds
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RUN_SECONDS);

    let node_ids = discovery.node_ids();
    info!(
        "Cluster started. Nodes: {:?}, run time: {} seconds",
        node_ids, run_seconds
    );

    let cluster_configuration = ClusterConfiguration::new(node_ids.clone());
    let peer_communicator =
        InProcPeerCommunicator::new(node_ids.clone(), get_communication_timeout());

    let mut node_workers = Vec::new();
    for node_id in node_ids {
        let node_config = NodeConfiguration {
            node_id,
            cluster_configuration: cluster_configuration.clone(),
            peer_communicator: peer_communicator.clone(),
            election_timer: RandomizedElectionTimer::default(),
            timings: NodeTimings::default(),
        };

        match bully::start_node(node_config) {
            Ok(node_worker) => node_workers.push(node_worker),
            Err(err) => {
                error!("Node {} failed to start: {}", node_id, err);
                terminate_all(node_workers);
                process::exit(1);
            }
        }
    }

    let mut leader_stopped = false;
    for second in 1..=run_seconds {
        thread::sleep(Duration::from_secs(1));

        let leader = current_leader(&node_workers);
        match leader {
            Some(leader_id) => info!("Current leader: {}", leader_id),
            None => info!("No leader"),
        }

        if !leader_stopped && second >= run_seconds / 2 {
            if let Some(leader_id) = leader {
                info!("Stopping the leader {}", leader_id);
                if let Some(index) = node_workers.iter().position(|w| w.node_id() == leader_id) {
                    node_workers.remove(index).terminate();
                }
                leader_stopped = true;
            }
        }
    }

    terminate_all(node_workers);

    info!("Cluster stopped");
}

fn current_leader(node_workers: &[NodeWorker]) -> Option<u64> {
    node_workers
        .iter()
        .filter(|worker| worker.role().is_leader())
        .map(|worker| worker.node_id())
        .max()
}

fn terminate_all(node_workers: Vec<NodeWorker>) {
    for node_worker in node_workers {
        node_worker.terminate();
    }
}

fn get_communication_timeout() -> Duration {
    Duration::from_millis(500)
}

fn get_dial_retry_interval() -> Duration {
    Duration::from_millis(500)
}

fn get_peers_wait_timeout() -> Duration {
    Duration::from_secs(300)
}

fn get_peer_requests_address(node_id: u64) -> String {
    format!("127.0.0.1:{}", 60000 + node_id)
}
