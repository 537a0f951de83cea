pub mod leader_failover;
pub mod network_cluster;
pub mod restarted_node;
pub mod smoke;
pub mod unreachable_peer;
