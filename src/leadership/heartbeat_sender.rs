use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use rayon::ThreadPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::communication::peers::{HeartbeatRequest, PeerRequestHandler};
use crate::node::state::ProtectedNode;
use crate::Cluster;

pub struct SendHeartbeatParams<Pc, Cl>
where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    pub protected_node: ProtectedNode,
    pub cluster_configuration: Cl,
    pub communicator: Pc,
    pub leader_initial_heartbeat_rx: Receiver<()>,
    pub heartbeat_interval: Duration,
    pub fan_out_pool: Arc<ThreadPool>,
    pub in_flight_peers: Arc<Mutex<HashSet<u64>>>,
}

/// Heartbeat worker. Idle while the node is not a leader, woken up by the
/// initial heartbeat request on promotion. Replies are never awaited: each peer send
/// runs on the fan-out pool, at most one per peer at a time.
pub fn send_heartbeats<Pc, Cl>(
    params: SendHeartbeatParams<Pc, Cl>,
    terminate_worker_rx: Receiver<()>,
) where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    info!("Heartbeat sender worker started");
    loop {
        let is_leader = { params.protected_node.lock().role().is_leader() };
        let heartbeat_timeout = if is_leader {
            crossbeam_channel::after(params.heartbeat_interval)
        } else {
            crossbeam_channel::never()
        };
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for heartbeat sender worker");
                }
                break
            },
            recv(heartbeat_timeout) -> _  => {
                send_heartbeat(&params)
            },
            recv(params.leader_initial_heartbeat_rx) -> res  => {
                if let Err(err) = res {
                    error!("Invalid result from leader_initial_heartbeat_rx: {}", err);
                    break
                }
                trace!("Sending initial heartbeat...");
                send_heartbeat(&params)
            },
        );
    }
    info!("Heartbeat sender worker stopped");
}

pub(crate) fn send_heartbeat<Pc, Cl>(params: &SendHeartbeatParams<Pc, Cl>)
where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    let node_id = {
        let mut node = params.protected_node.lock();
        if !node.role().is_leader() {
            return;
        }
        node.reset_failure_detector(Instant::now());

        node.id
    };

    let request = HeartbeatRequest { leader_id: node_id };

    for peer_id in params.cluster_configuration.peers(node_id) {
        if !params.in_flight_peers.lock().insert(peer_id) {
            trace!(
                "Node {} Previous heartbeat to node {} is still in flight",
                node_id, peer_id
            );
            continue;
        }

        let communicator = params.communicator.clone();
        let in_flight_peers = params.in_flight_peers.clone();
        params.fan_out_pool.spawn(move || {
            let result = communicator.send_heartbeat_request(peer_id, request);
            in_flight_peers.lock().remove(&peer_id);

            if let Err(err) = result {
                debug!(
                    "Node {} Heartbeat to node {} not delivered: {}",
                    node_id, peer_id, err
                );
            }
        });
    }
}
