use rayon::prelude::*;
use std::ops::Fn;

use crate::errors::Result;

/// Response of a single peer in the fan-out.
#[derive(Debug)]
pub struct PeerResponse<Resp> {
    pub peer_id: u64,
    pub result: Result<Resp>,
}

/// Sends the request to every peer in parallel on the current rayon pool and
/// collects the results in the order of the peer list.
pub fn notify_peers<Req, Resp, Requester>(
    request: Req,
    peers: Vec<u64>,
    requester: Requester,
) -> Vec<PeerResponse<Resp>>
where
    Requester: Fn(u64, Req) -> Result<Resp> + Sync,
    Req: Clone + Sync + Send,
    Resp: Send,
{
    peers
        .into_par_iter()
        .map(|peer_id| PeerResponse {
            peer_id,
            result: requester(peer_id, request.clone()),
        })
        .collect()
}
