//! Fire-and-forget datagram hand-off to the relay.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

/// Sends raw form bodies to the relay address, one datagram each.
///
/// Nothing is ever read back: once the kernel accepts the datagram the
/// submission is out of the front-end's hands.
#[derive(Debug, Clone, Copy)]
pub struct DatagramForwarder {
    relay_addr: SocketAddr,
}

impl DatagramForwarder {
    pub fn new(relay_addr: SocketAddr) -> Self {
        Self { relay_addr }
    }

    pub fn relay_addr(&self) -> SocketAddr {
        self.relay_addr
    }

    /// Send `payload` unmodified. Returns the number of bytes handed to the transport.
    pub async fn forward(&self, payload: &[u8]) -> Result<usize, std::io::Error> {
        let local: SocketAddr = if self.relay_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local).await?;
        socket.send_to(payload, self.relay_addr).await
    }
}
