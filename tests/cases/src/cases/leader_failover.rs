use crate::steps;

/// The next highest node takes over after the leader stops.
pub fn run() {
    let node_ids = vec![1, 2, 3];

    let peer_communicator = steps::get_peer_communicator(node_ids.clone());
    let mut cluster = steps::cluster::start_initial_cluster(
        node_ids,
        peer_communicator,
        steps::create_node,
    );

    assert!(cluster.wait_for_leader(3, steps::get_election_timeout()));

    cluster.terminate_node(3);

    let elected = cluster.wait_for_leader(2, steps::get_election_timeout());
    info!("Leaders after fail-over: {:?}", cluster.leaders());
    assert!(elected, "node 2 did not take over");

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_leader_failover() {
        crate::cases::leader_failover::run()
    }
}
