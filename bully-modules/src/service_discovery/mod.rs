pub mod static_table;

use std::fmt::Debug;

/// Resolves node identities to the addresses of their peer request servers.
pub trait PeerCommunicatorServiceDiscovery: Clone + Sync + Send + Debug + 'static {
    fn get_address(&self, node_id: u64) -> Option<String>;

    /// All known node ids in ascending order.
    fn node_ids(&self) -> Vec<u64>;
}
