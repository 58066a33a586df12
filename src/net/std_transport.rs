//! `tokio::net::UdpSocket` adapter for `AsyncTransport`.
//!
//! The `std`-side counterpart to [`crate::net::embassy_adapter::EmbassyUdpTransport`]:
//! same trait, same shape, a real OS socket instead of `embassy-net`'s.

use crate::error::{KnxError, Result};
use crate::net::transport::AsyncTransport;
use crate::net::{IpEndpoint, Ipv4Addr};
use std::net::SocketAddrV4;
use tokio::net::UdpSocket;

/// Adapter for `tokio::net::UdpSocket` implementing [`AsyncTransport`].
pub struct StdUdpTransport {
    socket: UdpSocket,
}

impl StdUdpTransport {
    /// Bind a new UDP socket to `port` on all interfaces (0 = OS-assigned).
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Transport` if the socket cannot be bound.
    pub async fn bind(port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((std::net::Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|_| KnxError::socket_error())?;
        Ok(Self { socket })
    }
}

impl AsyncTransport for StdUdpTransport {
    async fn send_to(&mut self, data: &[u8], addr: IpEndpoint) -> Result<()> {
        let octets = addr.addr.octets();
        let target = SocketAddrV4::new(octets.into(), addr.port);
        self.socket
            .send_to(data, target)
            .await
            .map_err(|_| KnxError::send_failed())?;
        Ok(())
    }

    async fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, IpEndpoint)> {
        let (len, from) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|_| KnxError::receive_failed())?;
        let std::net::SocketAddr::V4(from_v4) = from else {
            return Err(KnxError::receive_failed());
        };
        let endpoint = IpEndpoint::new(Ipv4Addr::from(from_v4.ip().octets()), from_v4.port());
        Ok((len, endpoint))
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_and_loopback_roundtrip() {
        let mut server = StdUdpTransport::bind(0).await.unwrap();
        let server_port = server.socket.local_addr().unwrap().port();

        let mut client = StdUdpTransport::bind(0).await.unwrap();
        let server_endpoint = IpEndpoint::new(Ipv4Addr::LOCALHOST, server_port);

        client.send_to(&[0xAA, 0xBB, 0xCC], server_endpoint).await.unwrap();

        let mut buf = [0u8; 16];
        let (len, _from) = server.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], &[0xAA, 0xBB, 0xCC]);
    }
}
