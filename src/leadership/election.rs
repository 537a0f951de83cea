use crossbeam_channel::Receiver;
use rayon::ThreadPool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::peer_notifier::notify_peers;
use crate::communication::peers::{ElectionRequest, ElectionResponse, PeerRequestHandler};
use crate::errors::{new_multiple_err, BullyErrorKind, Result};
use crate::node::state::ProtectedNode;

pub struct StartElectionParams<Pc: PeerRequestHandler> {
    pub protected_node: ProtectedNode,
    pub node_id: u64,
    pub candidacy: u64,
    pub peers: Vec<u64>,
    pub peer_communicator: Pc,
    pub fan_out_pool: Arc<ThreadPool>,
    pub round_pause: Duration,
}

/// Election worker of a single candidacy. Repeats election rounds while the candidacy
/// is current and its deadline has not elapsed, so a lost reply from a higher peer
/// gets another chance. Never promotes the node: promotion is decided by the deadline.
pub fn start_election<Pc: PeerRequestHandler>(
    params: StartElectionParams<Pc>,
    terminate_worker_rx: Receiver<()>,
) {
    let mut round = 0;
    loop {
        round += 1;
        run_election_round(&params, round, &terminate_worker_rx);

        if !is_candidacy_active(&params) {
            break;
        }

        select!(
            recv(terminate_worker_rx) -> _ => break,
            recv(crossbeam_channel::after(params.round_pause)) -> _ => {},
        );

        if !is_candidacy_active(&params) {
            break;
        }
    }
    debug!(
        "Node {} Candidacy {} election finished after {} round(s)",
        params.node_id, params.candidacy, round
    );
}

/// Sends the election request to all peers and withdraws the candidacy as soon as
/// a peer with a higher identity replies. Re-arms the failure detector once.
fn run_election_round<Pc: PeerRequestHandler>(
    params: &StartElectionParams<Pc>,
    round: u64,
    terminate_worker_rx: &Receiver<()>,
) {
    let request = ElectionRequest {
        candidate_id: params.node_id,
    };

    if params.peers.is_empty() {
        warn!("Node {} Election with no peers", params.node_id);
    } else {
        let requester = |dest_node_id: u64, req: ElectionRequest| {
            send_election_request(params, terminate_worker_rx, dest_node_id, req)
        };

        let peers = params.peers.clone();
        let responses = params
            .fan_out_pool
            .install(|| notify_peers(request, peers, requester));

        let mut greater_peers = Vec::new();
        let mut errors = Vec::new();
        for response in responses {
            match response.result {
                Ok(Some(resp)) if resp.is_greater => greater_peers.push(resp.peer_id),
                Ok(_) => {}
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            let failure_count = errors.len();
            let summary: Result<()> = new_multiple_err(
                BullyErrorKind::Transport,
                format!("No election reply from {} peer(s)", failure_count),
                errors,
            );
            if let Err(err) = summary {
                warn!("Node {} {}", params.node_id, err);
            }
        }

        if greater_peers.is_empty() {
            debug!(
                "Node {} Candidacy {} round {} found no higher node",
                params.node_id, params.candidacy, round
            );
        } else {
            info!(
                "Node {} Candidacy {} round {} found higher nodes {:?}",
                params.node_id, params.candidacy, round, greater_peers
            );
        }
    }

    let mut node = params.protected_node.lock();
    node.reset_failure_detector(Instant::now());
}

fn send_election_request<Pc: PeerRequestHandler>(
    params: &StartElectionParams<Pc>,
    terminate_worker_rx: &Receiver<()>,
    dest_node_id: u64,
    request: ElectionRequest,
) -> Result<Option<ElectionResponse>> {
    if !terminate_worker_rx.is_empty() || !is_candidacy_active(params) {
        trace!(
            "Node {} Candidacy {} is over. Skipping node {}",
            params.node_id,
            params.candidacy,
            dest_node_id
        );
        return Ok(None);
    }

    let resp = params
        .peer_communicator
        .send_election_request(dest_node_id, request)?;

    trace!(
        "Node {} Destination Node {} election result: is_greater={}",
        params.node_id,
        dest_node_id,
        resp.is_greater
    );

    if resp.is_greater {
        withdraw_candidacy(params, resp.peer_id);
    }

    Ok(Some(resp))
}

fn is_candidacy_active<Pc: PeerRequestHandler>(params: &StartElectionParams<Pc>) -> bool {
    let node = params.protected_node.lock();

    node.is_candidacy_active(params.candidacy, Instant::now())
}

fn withdraw_candidacy<Pc: PeerRequestHandler>(
    params: &StartElectionParams<Pc>,
    higher_node_id: u64,
) {
    let mut node = params.protected_node.lock();

    if node.withdraw_candidacy(params.candidacy) {
        info!(
            "Node {} Candidacy withdrawn in favor of node {}",
            node.id, higher_node_id
        );
    }
}
