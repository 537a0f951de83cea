pub mod client_requests;
pub mod network_peer_communicator;
pub mod server;
pub mod wire;
