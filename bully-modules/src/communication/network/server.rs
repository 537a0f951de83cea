use std::io::{BufRead, BufReader};
use std::net::{TcpListener, TcpStream};
use std::thread;

use crate::communication::network::network_peer_communicator::NetworkPeerCommunicator;
use crate::communication::network::wire::{self, WireRequest, WireResponse};
use crate::service_discovery::PeerCommunicatorServiceDiscovery;

/// Accepts peer connections, each one served by its own thread.
pub fn run_server<Psd>(listener: TcpListener, communicator: NetworkPeerCommunicator<Psd>)
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    match listener.local_addr() {
        Ok(address) => info!("Network peer communicator: listening on {}", address),
        Err(err) => warn!("Network peer communicator: unknown listening address: {}", err),
    }

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let communicator = communicator.clone();
                thread::spawn(move || serve_connection(stream, communicator));
            }
            Err(err) => error!("Cannot accept peer connection: {}", err),
        }
    }
}

// Requests and replies alternate line by line until the peer closes the connection.
fn serve_connection<Psd>(stream: TcpStream, communicator: NetworkPeerCommunicator<Psd>)
where
    Psd: PeerCommunicatorServiceDiscovery,
{
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(err) => {
            error!("Cannot use peer connection: {}", err);
            return;
        }
    };

    for line in BufReader::new(stream).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                debug!("Peer connection read failed: {}", err);
                break;
            }
        };

        let response = match wire::decode_line::<WireRequest>(&line) {
            Ok(request) => {
                trace!("Peer request {:?}", request);
                communicator.process_wire_request(request)
            }
            Err(err) => {
                warn!("Node {} {}", communicator.node_id(), err);
                WireResponse::rejected(&err)
            }
        };

        if let Err(err) = wire::write_line(&mut writer, &response) {
            debug!("Cannot reply to peer: {}", err);
            break;
        }
    }
}
