use crate::steps;

/// Three nodes with their own TCP transports elect the highest one.
pub fn run() {
    let peer_communicators = steps::get_network_peer_communicators(3);
    for peer_communicator in peer_communicators.iter() {
        peer_communicator.run_server().expect("server started");
    }
    for peer_communicator in peer_communicators.iter() {
        peer_communicator
            .wait_for_peers(
                steps::get_peers_communication_timeout(),
                steps::get_election_timeout(),
            )
            .expect("peers are reachable");
    }

    let node_ids = vec![0, 1, 2];
    let cluster = steps::cluster::start_initial_cluster(
        node_ids,
        peer_communicators[0].clone(),
        |node_id, all_nodes, _| {
            let peer_communicator = peer_communicators[node_id as usize].clone();
            steps::create_node(node_id, all_nodes, peer_communicator)
        },
    );

    let elected = cluster.wait_for_leader(2, steps::get_election_timeout());
    info!("Leaders: {:?}", cluster.leaders());
    assert!(elected, "node 2 was not elected");

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_network_cluster() {
        crate::cases::network_cluster::run()
    }
}
