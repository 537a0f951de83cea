use crossbeam_channel::Receiver;

use crate::communication::peers::{
    ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse, PeerRequest,
    PeerRequestChannels,
};
use crate::leadership::election_request_processor::process_election_request;
use crate::leadership::heartbeat_request_processor::process_heartbeat_request;
use crate::node::state::ProtectedNode;
use crate::Cluster;

pub struct PeerRequestHandlerParams<Pc, Cl>
where
    Pc: PeerRequestChannels,
    Cl: Cluster,
{
    pub protected_node: ProtectedNode,
    pub peer_communicator: Pc,
    pub cluster_configuration: Cl,
}

pub fn process_peer_request<Pc, Cl>(
    params: PeerRequestHandlerParams<Pc, Cl>,
    terminate_worker_rx: Receiver<()>,
) where
    Pc: PeerRequestChannels,
    Cl: Cluster,
{
    let node_id = { params.protected_node.lock().id };
    let election_request_rx = params.peer_communicator.election_request_rx(node_id);
    let heartbeat_request_rx = params.peer_communicator.heartbeat_request_rx(node_id);

    info!("Peer request processor worker started");
    loop {
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for peer request processor worker");
                }
                break
            },
            recv(election_request_rx) -> res => {
                match res {
                    Ok(request) => handle_election_request(node_id, request, &params),
                    Err(err) => {
                        error!(
                            "Node {} Cannot get request from election_request_rx: {}",
                            node_id, err
                        );
                        break
                    }
                }
            },
            recv(heartbeat_request_rx) -> res => {
                match res {
                    Ok(request) => handle_heartbeat_request(node_id, request, &params),
                    Err(err) => {
                        error!(
                            "Node {} Cannot get request from heartbeat_request_rx: {}",
                            node_id, err
                        );
                        break
                    }
                }
            }
        );
    }
    info!("Peer request processor worker stopped");
}

fn handle_election_request<Pc, Cl>(
    node_id: u64,
    request: PeerRequest<ElectionRequest, ElectionResponse>,
    params: &PeerRequestHandlerParams<Pc, Cl>,
) where
    Pc: PeerRequestChannels,
    Cl: Cluster,
{
    debug!("Node {} Received {}", node_id, request.request);

    let election_response = process_election_request(
        request.request,
        &params.protected_node,
        &params.cluster_configuration,
    );

    match &election_response {
        Ok(resp) => trace!("Node {} Sending {}", node_id, resp),
        Err(err) => warn!("Node {} Election request rejected: {}", node_id, err),
    }

    if let Err(err) = request.respond(election_response) {
        debug!("Node {} Election response not delivered: {}", node_id, err);
    }
}

fn handle_heartbeat_request<Pc, Cl>(
    node_id: u64,
    request: PeerRequest<HeartbeatRequest, HeartbeatResponse>,
    params: &PeerRequestHandlerParams<Pc, Cl>,
) where
    Pc: PeerRequestChannels,
    Cl: Cluster,
{
    trace!("Node {} Received {}", node_id, request.request);

    let heartbeat_response = process_heartbeat_request(
        request.request,
        &params.protected_node,
        &params.cluster_configuration,
    );

    if let Err(err) = &heartbeat_response {
        warn!("Node {} Heartbeat rejected: {}", node_id, err);
    }

    if let Err(err) = request.respond(heartbeat_response) {
        debug!("Node {} Heartbeat response not delivered: {}", node_id, err);
    }
}
