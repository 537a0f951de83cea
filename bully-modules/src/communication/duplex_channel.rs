use crossbeam_channel::{Receiver, Sender};

use std::time::Duration;

use bully::{new_err, BullyError, BullyErrorKind, PeerRequest};

/// Create abstraction for the dual-end communication via channels. Every request
/// carries its own reply channel.
#[derive(Clone, Debug)]
pub struct DuplexChannel<Request, Response> {
    name: String,
    timeout_duration: Duration,

    /// Sender channel for the request.
    pub request_tx: Sender<PeerRequest<Request, Response>>,

    /// Receiver channel for the request.
    pub request_rx: Receiver<PeerRequest<Request, Response>>,
}

impl<Request, Response> DuplexChannel<Request, Response> {
    /// Creates new DuplexChannel with the name and communication timeout on recv's and send's.
    pub fn new(name: String, timeout_duration: Duration) -> DuplexChannel<Request, Response> {
        let (request_tx, request_rx) = crossbeam_channel::bounded(0);

        DuplexChannel {
            timeout_duration,
            name,
            request_tx,
            request_rx,
        }
    }

    /// Returns the receiver channel for the request.
    pub fn request_rx(&self) -> Receiver<PeerRequest<Request, Response>> {
        self.request_rx.clone()
    }

    /// Sends request and gets response via channels.
    pub fn send_request(&self, request: Request) -> Result<Response, BullyError> {
        let (peer_request, response_rx) = PeerRequest::new(request);

        let send_result = self.request_tx.send_timeout(peer_request, self.timeout_duration);
        if let Err(err) = send_result {
            return new_err(
                BullyErrorKind::Transport,
                format!("Cannot send request. Channel : {} ", self.name),
                err.to_string(),
            );
        }

        match response_rx.recv_timeout(self.timeout_duration) {
            Ok(response) => response,
            Err(err) => new_err(
                BullyErrorKind::Transport,
                format!("Cannot receive response. Channel : {}", self.name),
                err.to_string(),
            ),
        }
    }
}
