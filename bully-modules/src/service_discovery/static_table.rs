use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::service_discovery::PeerCommunicatorServiceDiscovery;

/// Bootstrap entry of a single peer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PeerEntry {
    pub id: u64,
    pub address: String,
}

/// Node addresses known in advance. Built from a cluster file with one `host:port` per
/// line, the zero-based index of the non-empty line being the node identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StaticTableServiceDiscovery {
    table: BTreeMap<u64, String>,
}

impl StaticTableServiceDiscovery {
    pub fn new(table: BTreeMap<u64, String>) -> StaticTableServiceDiscovery {
        StaticTableServiceDiscovery { table }
    }

    pub fn from_lines<I, S>(lines: I) -> StaticTableServiceDiscovery
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, address)| (index as u64, address))
            .collect();

        StaticTableServiceDiscovery { table }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<StaticTableServiceDiscovery> {
        let content = fs::read_to_string(path)?;

        Ok(StaticTableServiceDiscovery::from_lines(content.lines()))
    }

    pub fn address(&self, node_id: u64) -> Option<&str> {
        self.table.get(&node_id).map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<u64> {
        self.table.keys().cloned().collect()
    }

    /// Ordered peer list of the node, its own entry excluded.
    pub fn peers_of(&self, node_id: u64) -> Vec<PeerEntry> {
        self.table
            .iter()
            .filter(|(id, _)| **id != node_id)
            .map(|(id, address)| PeerEntry {
                id: *id,
                address: address.clone(),
            })
            .collect()
    }
}

impl PeerCommunicatorServiceDiscovery for StaticTableServiceDiscovery {
    fn get_address(&self, node_id: u64) -> Option<String> {
        self.table.get(&node_id).cloned()
    }

    fn node_ids(&self) -> Vec<u64> {
        StaticTableServiceDiscovery::node_ids(self)
    }
}
