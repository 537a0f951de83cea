use crate::steps;

/// A restarted node hears the current leader before its failure detector fires and
/// stays a follower.
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
    assert!(cluster.wait_for_leader(2, steps::get_election_timeout()));

    cluster.add_server(3, steps::create_node);

    steps::sleep_ms(300);
    assert!(cluster.role(3).is_follower());
    assert_eq!(vec![2], cluster.leaders());

    steps::sleep_ms(1500);
    assert!(cluster.role(3).is_follower());
    assert_eq!(vec![2], cluster.leaders());

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_restarted_node_follows_current_leader() {
        crate::cases::restarted_node::run()
    }
}
