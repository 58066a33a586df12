//! Async KNXnet/IP tunneling client for Embassy.
//!
//! Wraps [`TunnelClient`] with an `embassy-net` UDP socket, driving the
//! request/response exchanges over the control channel and handling
//! TUNNELING_REQUEST indications (with their mandatory ACK) on receive.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn doc(mut client: knx_pico::protocol::async_tunnel::AsyncTunnelClient<'static>) -> knx_pico::Result<()> {
//! client.connect().await?;
//! client.send_cemi(&[0x29, 0x00, 0xBC, 0xE0, 0x11, 0x01, 0x0A, 0x03, 0x01, 0x00, 0x81]).await?;
//! if let Some(cemi) = client.receive().await? {
//!     // Process cEMI frame
//! }
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{KnxError, Result};
use crate::protocol::constants::*;
use crate::protocol::frame::KnxnetIpFrame;
use crate::protocol::tunnel::TunnelClient;
use embassy_net::{
    udp::{PacketMetadata, UdpSocket},
    Stack,
};
use embassy_time::{with_timeout, Duration};

/// Timeout for connection establishment
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for receiving responses to requests we sent
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Poll interval used while waiting for unsolicited indications
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Maximum UDP packet size for KNXnet/IP
const MAX_PACKET_SIZE: usize = 512;

/// Async wrapper around [`TunnelClient`] bound to an embassy-net UDP socket.
pub struct AsyncTunnelClient<'a> {
    socket: UdpSocket<'a>,
    gateway_addr: [u8; 4],
    gateway_port: u16,
    rx_buffer: [u8; MAX_PACKET_SIZE],
    tunnel: TunnelClient,
}

impl<'a> AsyncTunnelClient<'a> {
    /// Create a new async tunnel client bound to `stack`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stack: &'a Stack<'a>,
        rx_meta: &'a mut [PacketMetadata],
        tx_meta: &'a mut [PacketMetadata],
        rx_buffer: &'a mut [u8],
        tx_buffer: &'a mut [u8],
        gateway_addr: [u8; 4],
        gateway_port: u16,
    ) -> Self {
        let socket = UdpSocket::new(*stack, rx_meta, rx_buffer, tx_meta, tx_buffer);

        Self {
            socket,
            gateway_addr,
            gateway_port,
            rx_buffer: [0u8; MAX_PACKET_SIZE],
            tunnel: TunnelClient::new(gateway_addr, gateway_port),
        }
    }

    fn gateway_endpoint(&self) -> embassy_net::IpEndpoint {
        embassy_net::IpEndpoint::new(
            embassy_net::IpAddress::v4(
                self.gateway_addr[0],
                self.gateway_addr[1],
                self.gateway_addr[2],
                self.gateway_addr[3],
            ),
            self.gateway_port,
        )
    }

    /// Send CONNECT_REQUEST and wait for CONNECT_RESPONSE.
    pub async fn connect(&mut self) -> Result<()> {
        self.socket.bind(0).map_err(|_| KnxError::socket_error())?;

        let mut tx_buf = [0u8; MAX_PACKET_SIZE];
        let len = {
            let frame_data = self.tunnel.build_connect_request()?;
            tx_buf[..frame_data.len()].copy_from_slice(frame_data);
            frame_data.len()
        };
        let gateway = self.gateway_endpoint();

        self.socket
            .send_to(&tx_buf[..len], gateway)
            .await
            .map_err(|_| KnxError::send_failed())?;

        let (n, _remote) = with_timeout(CONNECT_TIMEOUT, self.socket.recv_from(&mut self.rx_buffer))
            .await
            .map_err(|_| KnxError::connection_timeout())?
            .map_err(|_| KnxError::receive_failed())?;

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;

        if frame.service_type() != ServiceType::ConnectResponse {
            return Err(KnxError::invalid_frame());
        }

        self.tunnel.handle_connect_response(frame.body())
    }

    /// Send a cEMI frame over the data channel and wait for the ACK.
    pub async fn send_cemi(&mut self, cemi_data: &[u8]) -> Result<()> {
        if !self.tunnel.is_connected() {
            return Err(KnxError::not_connected());
        }

        let mut tx_buf = [0u8; MAX_PACKET_SIZE];
        let len = {
            let frame_data = self.tunnel.build_tunneling_request(cemi_data)?;
            tx_buf[..frame_data.len()].copy_from_slice(frame_data);
            frame_data.len()
        };
        let gateway = self.gateway_endpoint();

        self.socket
            .send_to(&tx_buf[..len], gateway)
            .await
            .map_err(|_| KnxError::send_failed())?;

        let (n, _) = with_timeout(RESPONSE_TIMEOUT, self.socket.recv_from(&mut self.rx_buffer))
            .await
            .map_err(|_| KnxError::connection_timeout())?
            .map_err(|_| KnxError::receive_failed())?;

        let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;

        if frame.service_type() == ServiceType::TunnellingAck {
            self.tunnel.handle_tunneling_ack(frame.body())?;
        }

        Ok(())
    }

    /// Poll once for an unsolicited TUNNELING_REQUEST, ACKing it if received.
    ///
    /// Returns `Ok(None)` on a poll timeout; callers are expected to call
    /// this in a loop alongside heartbeat/retransmit timers.
    pub async fn receive(&mut self) -> Result<Option<heapless::Vec<u8, MAX_PACKET_SIZE>>> {
        if !self.tunnel.is_connected() {
            return Err(KnxError::not_connected());
        }

        let result = with_timeout(POLL_TIMEOUT, self.socket.recv_from(&mut self.rx_buffer)).await;

        match result {
            Ok(Ok((n, _))) => {
                let frame = KnxnetIpFrame::parse(&self.rx_buffer[..n])?;

                match frame.service_type() {
                    ServiceType::TunnellingRequest => {
                        let cemi: heapless::Vec<u8, MAX_PACKET_SIZE> = {
                            let cemi_data = self.tunnel.handle_tunneling_request(frame.body())?;
                            heapless::Vec::from_slice(cemi_data).map_err(|()| KnxError::buffer_too_small())?
                        };

                        let ack_seq = self.tunnel.recv_sequence().wrapping_sub(1);
                        let mut ack_buf = [0u8; MAX_PACKET_SIZE];
                        let ack_len = {
                            let ack_frame = self.tunnel.build_tunneling_ack(ack_seq, 0)?;
                            ack_buf[..ack_frame.len()].copy_from_slice(ack_frame);
                            ack_frame.len()
                        };

                        let gateway = self.gateway_endpoint();
                        self.socket
                            .send_to(&ack_buf[..ack_len], gateway)
                            .await
                            .map_err(|_| KnxError::send_failed())?;

                        Ok(Some(cemi))
                    }
                    _ => Ok(None),
                }
            }
            Ok(Err(_)) => Err(KnxError::receive_failed()),
            Err(_) => Ok(None),
        }
    }

    /// Send DISCONNECT_REQUEST and wait (best effort) for the response.
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.tunnel.is_connected() {
            let mut tx_buf = [0u8; MAX_PACKET_SIZE];
            let len = {
                let frame_data = self.tunnel.build_disconnect_request()?;
                tx_buf[..frame_data.len()].copy_from_slice(frame_data);
                frame_data.len()
            };
            let gateway = self.gateway_endpoint();

            self.socket
                .send_to(&tx_buf[..len], gateway)
                .await
                .map_err(|_| KnxError::send_failed())?;

            if let Ok(Ok((n, _))) =
                with_timeout(RESPONSE_TIMEOUT, self.socket.recv_from(&mut self.rx_buffer)).await
            {
                if let Ok(frame) = KnxnetIpFrame::parse(&self.rx_buffer[..n]) {
                    if frame.service_type() == ServiceType::DisconnectResponse {
                        let _ = self.tunnel.handle_disconnect_response(frame.body());
                    }
                }
            }

            self.tunnel.reset();
        }

        self.socket.close();

        Ok(())
    }

    /// Check if the tunnel is connected
    pub fn is_connected(&self) -> bool {
        self.tunnel.is_connected()
    }

    /// Gateway address and port
    pub fn gateway_addr(&self) -> ([u8; 4], u16) {
        (self.gateway_addr, self.gateway_port)
    }
}

impl Drop for AsyncTunnelClient<'_> {
    fn drop(&mut self) {
        self.socket.close();
    }
}
