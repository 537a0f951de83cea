use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::common::{self, WorkerPool};
use crate::communication::peers::{PeerRequestChannels, PeerRequestHandler};
use crate::errors::{new_err, BullyError, BullyErrorKind};
use crate::leadership::heartbeat_sender::{send_heartbeats, SendHeartbeatParams};
use crate::leadership::status::administrator::ElectionsAdministrator;
use crate::leadership::status::node_leadership_fsm::{
    run_node_status_watcher, ElectionManagerParams,
};
use crate::leadership::watchdog::leader_status_watcher::{
    watch_leader_status, WatchLeaderStatusParams,
};
use crate::leadership::watchdog::watchdog_handler::LeadershipStatusWatchdogHandler;
use crate::request_handler::peer::{process_peer_request, PeerRequestHandlerParams};
use crate::{Cluster, ElectionTimer};

pub mod configuration;
pub mod state;

use configuration::{NodeConfiguration, NodeTimings};
use state::{Node, ProtectedNode, Role};

/// Handle of the running node.
#[derive(Debug)]
pub struct NodeWorker {
    /// Handle of the node main thread.
    pub join_handle: JoinHandle<()>,

    /// Sends the termination request to the node.
    pub terminate_worker_tx: Sender<()>,

    node_id: u64,
    protected_node: ProtectedNode,
}

impl NodeWorker {
    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Consistent snapshot of the node role.
    pub fn role(&self) -> Role {
        self.protected_node.lock().role()
    }

    /// Stops all node workers and waits for them.
    pub fn terminate(self) {
        if self.terminate_worker_tx.send(()).is_err() {
            error!("Node {} Cannot send termination signal", self.node_id);
        }

        if self.join_handle.join().is_err() {
            error!("Node {} Worker returned an error", self.node_id);
        }
    }
}

struct NodeStartingParams<Pc, Cl>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
    Cl: Cluster,
{
    protected_node: ProtectedNode,
    election_administrator: ElectionsAdministrator,
    watchdog_handler: LeadershipStatusWatchdogHandler,
    cluster_configuration: Cl,
    peer_communicator: Pc,
    timings: NodeTimings,
    fan_out_pool: Arc<ThreadPool>,
}

pub fn start_node<Pc, Et, Cl>(
    node_config: NodeConfiguration<Pc, Et, Cl>,
) -> Result<NodeWorker, BullyError>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
    Et: ElectionTimer,
    Cl: Cluster,
{
    let node_id = node_config.node_id;
    let peer_count = node_config.cluster_configuration.peers(node_id).len();
    let fan_out_pool = build_fan_out_pool(node_id, peer_count)?;

    let failure_detector_interval = node_config.election_timer.next_elections_timeout();
    info!("Node {} Failure detector interval {:?}", node_id, failure_detector_interval);

    let election_administrator = ElectionsAdministrator::new();
    let watchdog_handler = LeadershipStatusWatchdogHandler::new();
    let node = Node::new(
        node_id,
        failure_detector_interval,
        node_config.timings.candidacy_window,
        election_administrator.clone(),
        watchdog_handler.clone(),
    );
    let protected_node = Arc::new(Mutex::new(node));

    let worker = common::run_worker(
        run_node,
        NodeStartingParams {
            protected_node: protected_node.clone(),
            election_administrator,
            watchdog_handler,
            cluster_configuration: node_config.cluster_configuration,
            peer_communicator: node_config.peer_communicator,
            timings: node_config.timings,
            fan_out_pool: Arc::new(fan_out_pool),
        },
    );

    Ok(NodeWorker {
        join_handle: worker.join_handle,
        terminate_worker_tx: worker.terminate_worker_tx,
        node_id,
        protected_node,
    })
}

// Heartbeats and an election round may overlap right after a demotion.
fn build_fan_out_pool(node_id: u64, peer_count: usize) -> Result<ThreadPool, BullyError> {
    let pool_result = ThreadPoolBuilder::new()
        .num_threads((2 * peer_count).max(1))
        .thread_name(move |index| format!("node-{}-fan-out-{}", node_id, index))
        .build();

    match pool_result {
        Ok(pool) => Ok(pool),
        Err(err) => new_err(
            BullyErrorKind::Resource,
            format!("Node {} Cannot build peer fan-out pool", node_id),
            err.to_string(),
        ),
    }
}

fn run_node<Pc, Cl>(params: NodeStartingParams<Pc, Cl>, terminate_worker_rx: Receiver<()>)
where
    Pc: PeerRequestHandler + PeerRequestChannels,
    Cl: Cluster,
{
    let node_id = { params.protected_node.lock().id };
    let (leader_initial_heartbeat_tx, leader_initial_heartbeat_rx): (Sender<()>, Receiver<()>) =
        crossbeam_channel::unbounded();

    let election_worker = common::run_worker(
        run_node_status_watcher,
        ElectionManagerParams {
            protected_node: params.protected_node.clone(),
            election_administrator: params.election_administrator.clone(),
            leader_initial_heartbeat_tx,
            peer_communicator: params.peer_communicator.clone(),
            cluster_configuration: params.cluster_configuration.clone(),
            fan_out_pool: params.fan_out_pool.clone(),
            election_round_pause: params.timings.election_round_pause,
        },
    );

    let check_leader_worker = common::run_worker(
        watch_leader_status,
        WatchLeaderStatusParams {
            protected_node: params.protected_node.clone(),
            watchdog_handler: params.watchdog_handler.clone(),
        },
    );

    let peer_request_processor_worker = common::run_worker(
        process_peer_request,
        PeerRequestHandlerParams {
            protected_node: params.protected_node.clone(),
            peer_communicator: params.peer_communicator.clone(),
            cluster_configuration: params.cluster_configuration.clone(),
        },
    );

    let send_heartbeat_worker = common::run_worker(
        send_heartbeats,
        SendHeartbeatParams {
            protected_node: params.protected_node.clone(),
            cluster_configuration: params.cluster_configuration.clone(),
            communicator: params.peer_communicator.clone(),
            leader_initial_heartbeat_rx,
            heartbeat_interval: params.timings.heartbeat_interval,
            fan_out_pool: params.fan_out_pool.clone(),
            in_flight_peers: Arc::new(Mutex::new(HashSet::new())),
        },
    );

    let workers = vec![
        send_heartbeat_worker,
        peer_request_processor_worker,
        check_leader_worker,
        election_worker,
    ];

    let worker_pool = WorkerPool::new(workers);

    info!("Node {} started", node_id);

    let terminate_result = terminate_worker_rx.recv();
    if let Err(e) = terminate_result {
        error!("Abnormal exit for node: {}", e);
    }

    info!("Node {} termination requested", node_id);

    worker_pool.terminate();
    worker_pool.join();

    info!("Node {} shutting down", node_id);
}
