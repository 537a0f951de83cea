use bully::{NodeWorker, PeerRequestChannels, PeerRequestHandler, Role};
use std::time::Duration;

use super::wait_for;

pub struct CaseCluster<Pc>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
{
    pub initial_nodes: Vec<u64>,
    pub peer_communicator: Pc,
    pub node_workers: Vec<NodeWorker>,
}

pub fn start_initial_cluster<F, Pc>(
    nodes: Vec<u64>,
    peer_communicator: Pc,
    node_creator: F,
) -> CaseCluster<Pc>
where
    F: Fn(u64, Vec<u64>, Pc) -> NodeWorker,
    Pc: PeerRequestHandler + PeerRequestChannels,
{
    let mut node_workers = Vec::new();

    //run initial cluster
    for node_id in nodes.clone() {
        let node_worker = node_creator(node_id, nodes.clone(), peer_communicator.clone());

        node_workers.push(node_worker);
    }

    CaseCluster {
        initial_nodes: nodes,
        peer_communicator,
        node_workers,
    }
}

impl<Pc> CaseCluster<Pc>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
{
    /// Starts a node with the initial membership, e.g. a restarted one.
    pub fn add_server<F>(&mut self, node_id: u64, node_creator: F)
    where
        F: Fn(u64, Vec<u64>, Pc) -> NodeWorker,
    {
        let node_worker = node_creator(
            node_id,
            self.initial_nodes.clone(),
            self.peer_communicator.clone(),
        );

        self.node_workers.push(node_worker);
    }

    pub fn role(&self, node_id: u64) -> Role {
        let node_worker = self
            .node_workers
            .iter()
            .find(|worker| worker.node_id() == node_id)
            .expect("running node");

        node_worker.role()
    }

    pub fn leaders(&self) -> Vec<u64> {
        self.node_workers
            .iter()
            .filter(|worker| worker.role().is_leader())
            .map(|worker| worker.node_id())
            .collect()
    }

    /// Waits until the expected node is the only leader and the rest of the running
    /// nodes are followers.
    pub fn wait_for_leader(&self, expected_leader: u64, timeout: Duration) -> bool {
        wait_for(timeout, || {
            self.node_workers.iter().all(|worker| {
                let role = worker.role();
                if worker.node_id() == expected_leader {
                    role.is_leader()
                } else {
                    role.is_follower()
                }
            })
        })
    }

    pub fn terminate_node(&mut self, node_id: u64) {
        let index = self
            .node_workers
            .iter()
            .position(|worker| worker.node_id() == node_id)
            .expect("running node");

        info!("Terminating node {}", node_id);
        self.node_workers.remove(index).terminate();
    }

    pub fn terminate(self) {
        let mut handles = Vec::new();
        for node_worker in self.node_workers {
            handles.push(node_worker.join_handle);
            if node_worker.terminate_worker_tx.send(()).is_err() {
                panic!("worker panicked!")
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                panic!("worker panicked!")
            }
        }
    }
}
