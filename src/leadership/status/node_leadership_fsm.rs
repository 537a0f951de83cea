use crossbeam_channel::{Receiver, Sender};
use rayon::ThreadPool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::{self, Worker};
use crate::communication::peers::PeerRequestHandler;
use crate::leadership::election::{self, StartElectionParams};
use crate::leadership::status::administrator::ElectionsAdministrator;
use crate::leadership::status::{CandidateInfo, RoleChangedEvent};
use crate::node::state::{ProtectedNode, Role};
use crate::Cluster;

pub struct ElectionManagerParams<Pc, Cl>
where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    pub protected_node: ProtectedNode,
    pub election_administrator: ElectionsAdministrator,
    pub leader_initial_heartbeat_tx: Sender<()>,
    pub peer_communicator: Pc,
    pub cluster_configuration: Cl,
    pub fan_out_pool: Arc<ThreadPool>,
    pub election_round_pause: Duration,
}

/// Reacts to role transitions: starts election rounds for new candidacies, wakes the
/// heartbeat sender for a new leader, and promotes a candidate when its deadline elapses.
/// The promotion is decided here only, under the node lock.
pub fn run_node_status_watcher<Pc, Cl>(
    params: ElectionManagerParams<Pc, Cl>,
    terminate_worker_rx: Receiver<()>,
) where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    info!("Leader election status watcher worker started");
    let mut election_workers = Vec::new();
    loop {
        let promotion_timeout = {
            let node = params.protected_node.lock();
            if let Role::Candidate { deadline } = node.role() {
                crossbeam_channel::after(deadline.saturating_duration_since(Instant::now()))
            } else {
                crossbeam_channel::never()
            }
        };
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for leader election status watcher worker");
                }
                break
            },
            recv(params.election_administrator.role_changed_rx()) -> event_result => {
                match event_result {
                    Ok(event) => handle_role_change(&params, event, &mut election_workers),
                    Err(err) => {
                        error!("Cannot receive role changed event: {}", err);
                        break
                    }
                }
            },
            recv(promotion_timeout) -> _ => {
                let mut node = params.protected_node.lock();
                node.promote_if_deadline_elapsed(Instant::now());
            }
        );
    }
    stop_election_workers(election_workers);
    info!("Leader election status watcher worker stopped");
}

fn handle_role_change<Pc, Cl>(
    params: &ElectionManagerParams<Pc, Cl>,
    event: RoleChangedEvent,
    election_workers: &mut Vec<Worker>,
) where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    match event {
        RoleChangedEvent::CandidacyStarted(info) => {
            election_workers.retain(|worker| !worker.join_handle.is_finished());
            if let Some(worker) = start_election(params, info) {
                election_workers.push(worker);
            }
        }
        RoleChangedEvent::PromotedToLeader(node_id) => {
            info!("Node {} Leading the cluster", node_id);

            if let Err(err) = params.leader_initial_heartbeat_tx.send(()) {
                error!("Node {} Cannot send leader initial heartbeat: {}", node_id, err);
            }
        }
        RoleChangedEvent::ResetToFollower(node_id) => {
            trace!("Node {} Follower", node_id);
        }
    }
}

fn start_election<Pc, Cl>(
    params: &ElectionManagerParams<Pc, Cl>,
    info: CandidateInfo,
) -> Option<Worker>
where
    Pc: PeerRequestHandler,
    Cl: Cluster,
{
    {
        let node = params.protected_node.lock();
        if !node.role().is_candidate() || node.candidacy() != info.candidacy {
            debug!(
                "Node {} Candidacy {} superseded before election start",
                info.candidate_id, info.candidacy
            );
            return None;
        }
    }

    info!(
        "Node {} Starting election for candidacy {}",
        info.candidate_id, info.candidacy
    );

    let election_params = StartElectionParams {
        protected_node: params.protected_node.clone(),
        node_id: info.candidate_id,
        candidacy: info.candidacy,
        peers: params.cluster_configuration.peers(info.candidate_id),
        peer_communicator: params.peer_communicator.clone(),
        fan_out_pool: params.fan_out_pool.clone(),
        round_pause: params.election_round_pause,
    };

    Some(common::run_worker(election::start_election, election_params))
}

// Rounds of superseded candidacies may still wait for a peer reply.
fn stop_election_workers(election_workers: Vec<Worker>) {
    for worker in &election_workers {
        // Finished workers dropped their receiver.
        let _ = worker.terminate_worker_tx.send(());
    }

    for worker in election_workers {
        if worker.join_handle.join().is_err() {
            error!("Election worker returned an error");
        }
    }
}
