use std::io::{BufRead, BufReader};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bully::{new_err, BullyError, BullyErrorKind};

use crate::communication::network::wire::{self, WireRequest, WireResponse};

/// Sends the request over a new connection and waits for the single reply line.
pub fn send_request(
    address: &str,
    timeout: Duration,
    request: WireRequest,
) -> Result<WireResponse, BullyError> {
    let stream = connect(address, timeout)?;

    let timeouts_result = stream
        .set_read_timeout(Some(timeout))
        .and_then(|_| stream.set_write_timeout(Some(timeout)));
    if let Err(err) = timeouts_result {
        return transport_err(format!("Cannot set timeouts. Address: {}", address), err);
    }

    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(err) => return transport_err(format!("Cannot use connection to {}", address), err),
    };
    wire::write_line(&mut writer, &request)?;

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => new_err(
            BullyErrorKind::Transport,
            format!("Connection closed without reply. Address: {}", address),
            String::new(),
        ),
        Ok(_) => wire::decode_line(&line),
        Err(err) => transport_err(format!("Cannot receive reply. Address: {}", address), err),
    }
}

/// Opens a connection to the address, failing after the timeout.
pub fn connect(address: &str, timeout: Duration) -> Result<TcpStream, BullyError> {
    let socket_address = resolve(address)?;

    match TcpStream::connect_timeout(&socket_address, timeout) {
        Ok(stream) => Ok(stream),
        Err(err) => transport_err(format!("Cannot connect. Address: {}", address), err),
    }
}

fn resolve(address: &str) -> Result<SocketAddr, BullyError> {
    let mut addresses = match address.to_socket_addrs() {
        Ok(addresses) => addresses,
        Err(err) => return transport_err(format!("Cannot resolve address {}", address), err),
    };

    match addresses.next() {
        Some(socket_address) => Ok(socket_address),
        None => new_err(
            BullyErrorKind::Transport,
            format!("No socket address for {}", address),
            String::new(),
        ),
    }
}

fn transport_err<T>(text: String, err: std::io::Error) -> Result<T, BullyError> {
    new_err(BullyErrorKind::Transport, text, err.to_string())
}
