use bully::Cluster;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Basic in-memory implementation of the Cluster trait. The membership is fixed
/// on creation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClusterConfiguration {
    nodes: Arc<BTreeSet<u64>>,
}

impl ClusterConfiguration {
    /// Creates an instance of ClusterConfiguration initialized with provided node list.
    pub fn new(nodes: Vec<u64>) -> ClusterConfiguration {
        let mut node_set = BTreeSet::new();
        for node in nodes {
            if !node_set.insert(node) {
                warn!("Cluster configuration - duplicate node:{}", node)
            }
        }

        ClusterConfiguration {
            nodes: Arc::new(node_set),
        }
    }
}

impl Cluster for ClusterConfiguration {
    fn all_nodes(&self) -> Vec<u64> {
        self.nodes.iter().cloned().collect()
    }

    fn is_member(&self, node_id: u64) -> bool {
        self.nodes.contains(&node_id)
    }
}
