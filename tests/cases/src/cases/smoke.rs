use crate::steps;

/// Three nodes elect the highest one.
pub fn run() {
    let node_ids = vec![1, 2, 3];

    let peer_communicator = steps::get_peer_communicator(node_ids.clone());
    let cluster = steps::cluster::start_initial_cluster(
        node_ids,
        peer_communicator,
        steps::create_node,
    );

    let elected = cluster.wait_for_leader(3, steps::get_election_timeout());
    info!("Leaders: {:?}", cluster.leaders());
    assert!(elected, "node 3 was not elected");

    // The leader keeps its role while heartbeats flow.
    steps::sleep_ms(1500);
    assert_eq!(vec![3], cluster.leaders());

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_smoke() {
        crate::cases::smoke::run()
    }
}
