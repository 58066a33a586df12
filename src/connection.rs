//! `std` connection facade: a background task drives the tunnel state
//! machine, and handles sent here return results through channels.
//!
//! This is the `std`-only counterpart to [`crate::protocol::async_tunnel`]'s
//! embedded client: same cEMI/KNXnet-IP plumbing underneath
//! ([`crate::protocol::tunnel::TunnelClient`], reused unmodified since
//! `async_tunnel.rs` still depends on it for the Embassy target), but driven
//! by a single `tokio` task reachable over `mpsc` channels instead of being
//! polled cooperatively, and generic over [`crate::scheduler::Scheduler`] so
//! its timers can be driven virtually in tests.

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::config::ConnectionConfig;
use crate::error::{KnxError, Result};
use crate::net::std_transport::StdUdpTransport;
use crate::net::transport::AsyncTransport;
use crate::net::IpEndpoint;
use crate::protocol::cemi::{Apci, Apdu, CEMIFrame};
use crate::protocol::constants::CEMIMessageCode;
use crate::protocol::frame::KnxnetIpFrame;
use crate::protocol::tunnel::TunnelClient;
pub use crate::protocol::tunnel::ConnectionState;
use crate::scheduler::{Scheduler, TokioScheduler};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_ATTEMPTS: u32 = 3;
const ACK_TIMEOUT: Duration = Duration::from_secs(1);
const ACK_RETRANSMITS: u32 = 1;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);
const HEARTBEAT_ACK_TIMEOUT: Duration = Duration::from_secs(10);
const HEARTBEAT_FAILURES_BEFORE_LOST: u32 = 3;
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RECONNECT_BACKOFF_CAP: Duration = Duration::from_secs(60);

/// A group telegram observed on the bus: either a write/response we picked up
/// from the gateway, or one we sent ourselves.
#[derive(Debug, Clone)]
pub struct GroupEvent {
    /// Destination group address.
    pub ga: GroupAddress,
    /// The cEMI message code this telegram arrived as (`L_Data.ind` for bus
    /// traffic, `L_Data.con` echoing back our own `L_Data.req`).
    pub message_code: CEMIMessageCode,
    /// Whether this was a write (`true`) or a read-response/response (`false`).
    pub is_write: bool,
    /// Set on an `L_Data.con` whose control field carries the error bit,
    /// i.e. the gateway negatively confirmed a write we sent.
    pub confirmed_error: bool,
    /// Raw application-layer payload (post-TPCI/APCI).
    pub data: Vec<u8>,
}

impl GroupEvent {
    /// `true` for a gateway confirmation of our own outbound `L_Data.req`
    /// (positive or negative), as opposed to indication traffic from the bus.
    #[must_use]
    pub const fn is_confirmation(&self) -> bool {
        matches!(self.message_code, CEMIMessageCode::LDataCon)
    }
}

enum Command {
    Connect(oneshot::Sender<Result<()>>),
    Disconnect(oneshot::Sender<Result<()>>),
    Write {
        ga: GroupAddress,
        data: Vec<u8>,
        resp: oneshot::Sender<Result<()>>,
    },
    Read {
        ga: GroupAddress,
        resp: oneshot::Sender<Result<Vec<u8>>>,
    },
}

/// A live KNXnet/IP tunneling connection.
///
/// Cheap to clone: every clone shares the same background task via the
/// internal command channel. Dropping the last clone shuts the task down.
#[derive(Clone)]
pub struct Connection {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<ConnectionState>,
    events_tx: broadcast::Sender<GroupEvent>,
    _task: std::sync::Arc<JoinHandle<()>>,
}

impl Connection {
    /// Connect to the gateway named in `config` using a real UDP socket and
    /// the system clock, spawning the background engine on the current
    /// `tokio` runtime.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Config` if `config` fails validation, or
    /// `KnxError::Transport` if the local UDP socket cannot be bound.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let transport = StdUdpTransport::bind(0).await?;
        Self::with_transport_and_scheduler(config, transport, TokioScheduler::new()).await
    }

    /// Same as [`Connection::connect`], but with an injected transport and
    /// scheduler. This is the seam integration tests use to run the engine
    /// against [`crate::net::mock_transport::MockTransport`] and
    /// [`crate::scheduler::VirtualScheduler`] instead of real I/O.
    pub async fn with_transport_and_scheduler<T, S>(
        config: ConnectionConfig,
        transport: T,
        scheduler: S,
    ) -> Result<Self>
    where
        T: AsyncTransport + Send + 'static,
        S: Scheduler + Send + Sync + 'static,
    {
        config.validate()?;

        #[cfg(feature = "usb-logger")]
        config.log_level.apply();

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (events_tx, _events_rx) = broadcast::channel(64);

        let manual_connect = config.manual_connect;
        let engine = Engine::new(config, transport, scheduler, cmd_rx, state_tx, events_tx.clone());
        let task = tokio::spawn(engine.run());

        let connection = Self {
            cmd_tx,
            state_rx,
            events_tx,
            _task: std::sync::Arc::new(task),
        };

        if !manual_connect {
            connection.request_connect().await?;
        }

        Ok(connection)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to group telegrams seen on the bus. Each [`Connection`]
    /// clone and each [`crate::datapoint::Datapoint`] bound to it holds its
    /// own receiver; slow subscribers drop the oldest events rather than
    /// stalling the engine.
    pub fn subscribe(&self) -> broadcast::Receiver<GroupEvent> {
        self.events_tx.subscribe()
    }

    /// Watch [`ConnectionState`] transitions. Used by
    /// [`crate::datapoint::Datapoint`] to trigger an `autoread` the moment
    /// the tunnel reaches `Connected`, including after an auto-reconnect.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Explicitly (re)connect. A no-op if already connected.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Connection` if the gateway rejects the request or
    /// does not respond within the connect timeout after all retries.
    pub async fn request_connect(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Connect(tx))
            .await
            .map_err(|_| KnxError::InvalidState)?;
        rx.await.map_err(|_| KnxError::InvalidState)?
    }

    /// Explicitly disconnect.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Connection` if the disconnect request times out.
    pub async fn disconnect(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Disconnect(tx))
            .await
            .map_err(|_| KnxError::InvalidState)?;
        rx.await.map_err(|_| KnxError::InvalidState)?
    }

    /// Send a `GroupValue_Write` with the given raw application-layer
    /// payload (already DPT-encoded).
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Connection` if not connected, or
    /// `KnxError::Tunneling` if the gateway does not acknowledge the
    /// telegram within the ack timeout and its single retransmit.
    pub async fn write_group(&self, ga: GroupAddress, data: &[u8]) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Write {
                ga,
                data: data.to_vec(),
                resp: tx,
            })
            .await
            .map_err(|_| KnxError::InvalidState)?;
        rx.await.map_err(|_| KnxError::InvalidState)?
    }

    /// Send a `GroupValue_Read` and wait for the first matching
    /// `GroupValue_Response`.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Connection` if not connected, or
    /// `KnxError::Timeout` if no response arrives within the ack timeout.
    pub async fn read_group(&self, ga: GroupAddress) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Read { ga, resp: tx })
            .await
            .map_err(|_| KnxError::InvalidState)?;
        rx.await.map_err(|_| KnxError::InvalidState)?
    }
}

struct PendingWrite {
    sequence: u8,
    deadline: Instant,
    retries_left: u32,
    cemi_data: Vec<u8>,
    resp: oneshot::Sender<Result<()>>,
}

/// A write the caller submitted while another one was already in flight.
/// Held in FIFO order behind the single-in-flight-request invariant (§4.5)
/// until it can be sent, or dropped with [`KnxError::Expired`] once it has
/// sat longer than [`ConnectionConfig::with_max_queue_age`].
struct QueuedWrite {
    ga: GroupAddress,
    data: Vec<u8>,
    submitted_at: Instant,
    resp: oneshot::Sender<Result<()>>,
}

struct PendingRead {
    ga: GroupAddress,
    deadline: Instant,
    resp: oneshot::Sender<Result<Vec<u8>>>,
}

struct Engine<T, S> {
    config: ConnectionConfig,
    transport: T,
    scheduler: S,
    cmd_rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<ConnectionState>,
    events_tx: broadcast::Sender<GroupEvent>,
    client: TunnelClient,
    source: IndividualAddress,
    gateway_endpoint: IpEndpoint,
    pending_write: Option<PendingWrite>,
    write_queue: std::collections::VecDeque<QueuedWrite>,
    pending_read: Option<PendingRead>,
    pending_connect: Vec<oneshot::Sender<Result<()>>>,
    pending_disconnect: Vec<oneshot::Sender<Result<()>>>,
    connect_attempts_left: u32,
    heartbeat_deadline: Option<Instant>,
    heartbeat_awaiting_ack: bool,
    heartbeat_failures: u32,
    reconnect_deadline: Option<Instant>,
    reconnect_backoff: Duration,
    /// Set while a Disconnecting transition was caused by a stalled
    /// ack/heartbeat rather than `Connection::disconnect()`, so the eventual
    /// `Disconnected` arrival knows whether to schedule an auto-reconnect.
    stalled: bool,
}

impl<T, S> Engine<T, S>
where
    T: AsyncTransport,
    S: Scheduler,
{
    fn new(
        config: ConnectionConfig,
        transport: T,
        scheduler: S,
        cmd_rx: mpsc::Receiver<Command>,
        state_tx: watch::Sender<ConnectionState>,
        events_tx: broadcast::Sender<GroupEvent>,
    ) -> Self {
        let octets = config.gateway_addr.octets();
        let gateway_endpoint = IpEndpoint::new(config.gateway_addr, config.gateway_port);
        let source = config.phys_addr;
        let client = TunnelClient::new(octets, config.gateway_port);
        Self {
            config,
            transport,
            scheduler,
            cmd_rx,
            state_tx,
            events_tx,
            client,
            source,
            gateway_endpoint,
            pending_write: None,
            write_queue: std::collections::VecDeque::new(),
            pending_read: None,
            pending_connect: Vec::new(),
            pending_disconnect: Vec::new(),
            connect_attempts_left: CONNECT_ATTEMPTS,
            heartbeat_deadline: None,
            heartbeat_awaiting_ack: false,
            heartbeat_failures: 0,
            reconnect_deadline: None,
            reconnect_backoff: Duration::from_secs(1),
            stalled: false,
        }
    }

    async fn run(mut self) {
        let mut rx_buf = [0u8; crate::protocol::constants::MAX_FRAME_SIZE];
        loop {
            let wake_at = self.earliest_deadline();
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            let _ = self.send_disconnect_request().await;
                            return;
                        }
                    }
                }
                recv = self.transport.recv_from(&mut rx_buf) => {
                    match recv {
                        Ok((len, _from)) => self.handle_incoming(&rx_buf[..len]).await,
                        Err(_) => {
                            // A transport that reports "no data" without
                            // actually suspending (e.g. MockTransport with
                            // an empty queue) would otherwise spin this
                            // branch without ever yielding to the runtime.
                            tokio::task::yield_now().await;
                        }
                    }
                }
                () = sleep_until(&self.scheduler, wake_at) => {
                    self.handle_timers().await;
                }
            }
        }
    }

    fn earliest_deadline(&self) -> Option<Instant> {
        let write_deadline = self.pending_write.as_ref().map(|w| w.deadline);
        let read_deadline = self.pending_read.as_ref().map(|r| r.deadline);
        [write_deadline, read_deadline, self.heartbeat_deadline, self.reconnect_deadline]
            .into_iter()
            .flatten()
            .min()
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Connect(resp) => self.start_connect(resp).await,
            Command::Disconnect(resp) => self.start_disconnect(resp).await,
            Command::Write { ga, data, resp } => self.start_write(ga, &data, resp).await,
            Command::Read { ga, resp } => self.start_read(ga, resp).await,
        }
    }

    async fn start_connect(&mut self, resp: oneshot::Sender<Result<()>>) {
        if self.client.is_connected() {
            let _ = resp.send(Ok(()));
            return;
        }
        self.pending_connect.push(resp);
        if let Some(cb) = self.config.handlers.on_connecting {
            cb();
        }
        self.connect_attempts_left = CONNECT_ATTEMPTS;
        self.reconnect_deadline = None;
        self.send_connect_request().await;
    }

    async fn send_connect_request(&mut self) {
        if let Ok(frame) = self.client.build_connect_request() {
            let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
        }
        self.reconnect_deadline = Some(self.scheduler.now() + CONNECT_TIMEOUT);
    }

    async fn start_disconnect(&mut self, resp: oneshot::Sender<Result<()>>) {
        if !self.client.is_connected() {
            self.client.reset();
            let _ = resp.send(Ok(()));
            return;
        }
        self.cancel_pending_writes();
        self.pending_disconnect.push(resp);
        if let Ok(frame) = self.client.build_disconnect_request() {
            let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
        }
        let _ = self.state_tx.send(ConnectionState::Disconnecting);
        self.reconnect_deadline = Some(self.scheduler.now() + DISCONNECT_TIMEOUT);
    }

    /// §5: "`disconnect()` cancels all pending writes with `Cancelled`".
    /// Reads are left alone: a `GroupValue_Read` reply can still arrive while
    /// `DISCONNECT_REQUEST` is in flight.
    fn cancel_pending_writes(&mut self) {
        if let Some(pending) = self.pending_write.take() {
            let _ = pending.resp.send(Err(KnxError::Cancelled));
        }
        for queued in self.write_queue.drain(..) {
            let _ = queued.resp.send(Err(KnxError::Cancelled));
        }
    }

    /// §4.5: "app write/read -> enqueue; if no pending, send". A write never
    /// fails with `InvalidState` just because another one is in flight; it
    /// waits in `write_queue` until the current one is acked, stalls, or
    /// ages out past `max_queue_age`.
    async fn start_write(&mut self, ga: GroupAddress, data: &[u8], resp: oneshot::Sender<Result<()>>) {
        if !self.client.is_connected() {
            let _ = resp.send(Err(KnxError::not_connected()));
            return;
        }
        self.write_queue.push_back(QueuedWrite {
            ga,
            data: data.to_vec(),
            submitted_at: self.scheduler.now(),
            resp,
        });
        self.try_send_next_write().await;
    }

    /// Drop queued writes older than `max_queue_age` with `Expired`, then
    /// send the next one if nothing is currently in flight.
    async fn try_send_next_write(&mut self) {
        if self.pending_write.is_some() {
            return;
        }
        let max_age = self.config.max_queue_age;
        while let Some(queued) = self.write_queue.pop_front() {
            if self.scheduler.now().saturating_duration_since(queued.submitted_at) > max_age {
                let _ = queued.resp.send(Err(KnxError::Expired));
                continue;
            }
            self.send_queued_write(queued).await;
            return;
        }
    }

    async fn send_queued_write(&mut self, queued: QueuedWrite) {
        let QueuedWrite { ga, data, resp, .. } = queued;

        let mut cemi_buf = [0u8; crate::protocol::constants::MAX_CEMI_SIZE];
        let apdu = if data.is_empty() {
            Apdu::Packed(0)
        } else if data.len() == 1 && data[0] <= 0x3F {
            Apdu::Packed(data[0])
        } else {
            Apdu::Bytes(&data)
        };
        let cemi_len = match CEMIFrame::build_ldata(
            CEMIMessageCode::LDataReq,
            self.source,
            ga,
            Apci::GroupValueWrite,
            apdu,
            &mut cemi_buf,
        ) {
            Ok(len) => len,
            Err(err) => {
                let _ = resp.send(Err(err));
                return;
            }
        };
        let cemi_data = cemi_buf[..cemi_len].to_vec();

        let sequence = self.client.send_sequence();
        match self.client.build_tunneling_request(&cemi_data) {
            Ok(frame) => {
                let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
            }
            Err(err) => {
                let _ = resp.send(Err(err));
                return;
            }
        }

        self.pending_write = Some(PendingWrite {
            sequence,
            deadline: self.scheduler.now() + ACK_TIMEOUT,
            retries_left: ACK_RETRANSMITS,
            cemi_data,
            resp,
        });
    }

    async fn start_read(&mut self, ga: GroupAddress, resp: oneshot::Sender<Result<Vec<u8>>>) {
        if !self.client.is_connected() {
            let _ = resp.send(Err(KnxError::not_connected()));
            return;
        }
        if self.pending_read.is_some() {
            let _ = resp.send(Err(KnxError::InvalidState));
            return;
        }
        self.pending_read = Some(PendingRead {
            ga,
            deadline: self.scheduler.now() + ACK_TIMEOUT,
            resp,
        });
        self.send_group_read(ga).await;
    }

    async fn send_group_read(&mut self, ga: GroupAddress) {
        let mut cemi_buf = [0u8; crate::protocol::constants::MAX_CEMI_SIZE];
        if let Ok(cemi_len) = CEMIFrame::build_ldata(
            CEMIMessageCode::LDataReq,
            self.source,
            ga,
            Apci::GroupValueRead,
            Apdu::Packed(0),
            &mut cemi_buf,
        ) {
            let cemi_data = cemi_buf[..cemi_len].to_vec();
            if let Ok(frame) = self.client.build_tunneling_request(&cemi_data) {
                let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
            }
        }
    }

    async fn handle_incoming(&mut self, data: &[u8]) {
        let Ok(frame) = KnxnetIpFrame::parse(data) else {
            crate::pico_log!(warn, "dropping malformed KNXnet/IP frame ({} bytes)", data.len());
            return;
        };
        let body = frame.body();

        use crate::protocol::constants::ServiceType;
        match frame.service_type() {
            ServiceType::ConnectResponse => self.on_connect_response(body).await,
            ServiceType::ConnectionstateResponse => self.on_connectionstate_response(body).await,
            ServiceType::DisconnectResponse => self.on_disconnect_response(body),
            ServiceType::TunnellingRequest => self.on_tunneling_request(body).await,
            ServiceType::TunnellingAck => self.on_tunneling_ack(body).await,
            _ => {}
        }
    }

    async fn on_connect_response(&mut self, body: &[u8]) {
        let result = self.client.handle_connect_response(body);
        self.reconnect_deadline = None;
        match result {
            Ok(()) => {
                self.reconnect_backoff = Duration::from_secs(1);
                self.arm_heartbeat();
                let _ = self.state_tx.send(ConnectionState::Connected);
                if let Some(cb) = self.config.handlers.on_connected {
                    cb();
                }
                for resp in self.pending_connect.drain(..) {
                    let _ = resp.send(Ok(()));
                }
            }
            Err(err) => {
                self.connect_attempts_left = self.connect_attempts_left.saturating_sub(1);
                if self.connect_attempts_left == 0 {
                    crate::pico_log!(error, "CONNECT_REQUEST rejected, no attempts left: {}", err);
                    for resp in self.pending_connect.drain(..) {
                        let _ = resp.send(Err(KnxError::connection_failed()));
                    }
                } else {
                    crate::pico_log!(warn, "CONNECT_REQUEST rejected ({} attempts left): {}", self.connect_attempts_left, err);
                    self.send_connect_request().await;
                }
            }
        }
    }

    async fn on_connectionstate_response(&mut self, body: &[u8]) {
        let was_waiting = self.heartbeat_awaiting_ack;
        if self.client.handle_connectionstate_response(body).is_ok() {
            self.heartbeat_failures = 0;
            self.heartbeat_awaiting_ack = false;
            self.arm_heartbeat();
        } else if was_waiting {
            self.note_heartbeat_failure().await;
        }
    }

    fn on_disconnect_response(&mut self, body: &[u8]) {
        let _ = self.client.handle_disconnect_response(body);
        self.reconnect_deadline = None;
        let _ = self.state_tx.send(ConnectionState::Disconnected);
        for resp in self.pending_disconnect.drain(..) {
            let _ = resp.send(Ok(()));
        }
        if let Some(cb) = self.config.handlers.on_disconnected {
            cb();
        }
        self.maybe_schedule_reconnect();
    }

    async fn on_tunneling_request(&mut self, body: &[u8]) {
        let expected = self.client.recv_sequence();
        match self.client.handle_tunneling_request(body) {
            Ok(cemi_data) => {
                let cemi_data = cemi_data.to_vec();
                self.ack_sequence(expected).await;
                self.dispatch_cemi(&cemi_data);
            }
            Err(_) => {
                // §4.5 dedup discipline: a retransmit of the frame we most
                // recently dispatched (seq == expected-1) gets re-acked
                // without redelivery; anything else is dropped silently.
                if let Ok(request) =
                    crate::protocol::services::TunnelingRequest::parse(body)
                {
                    let prev = expected.wrapping_sub(1);
                    let seq = request.connection_header.sequence_counter;
                    if seq == prev {
                        self.ack_sequence(prev).await;
                    } else {
                        crate::pico_log!(warn, "dropping out-of-sequence TUNNELING_REQUEST (seq {}, expected {})", seq, expected);
                    }
                } else {
                    crate::pico_log!(warn, "dropping malformed TUNNELING_REQUEST ({} bytes)", body.len());
                }
            }
        }
    }

    async fn ack_sequence(&mut self, sequence: u8) {
        if let Ok(frame) = self.client.build_tunneling_ack(sequence, 0) {
            let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
        }
    }

    fn dispatch_cemi(&mut self, cemi_data: &[u8]) {
        let Ok(cemi) = CEMIFrame::parse(cemi_data) else {
            crate::pico_log!(warn, "dropping malformed cEMI frame ({} bytes)", cemi_data.len());
            return;
        };
        let message_code = cemi.message_code();
        let Ok(ldata) = cemi.as_ldata() else {
            crate::pico_log!(warn, "dropping non-L_Data cEMI frame (message code {:?})", message_code);
            return;
        };
        let Some(ga) = ldata.destination_group() else {
            crate::pico_log!(warn, "dropping L_Data frame with non-group destination");
            return;
        };

        if ldata.is_group_read() {
            self.schedule_group_read_reply(ga);
            return;
        }

        if !(ldata.is_group_write() || ldata.is_group_response()) {
            return;
        }

        let data = extract_apdu_payload(&ldata);

        if ldata.is_group_response() {
            if let Some(pending) = &self.pending_read {
                if pending.ga == ga {
                    if let Some(pending) = self.pending_read.take() {
                        let _ = pending.resp.send(Ok(data.clone()));
                    }
                }
            }
        }

        let _ = self.events_tx.send(GroupEvent {
            ga,
            message_code,
            is_write: ldata.is_group_write(),
            confirmed_error: ldata.ctrl1.has_error(),
            data,
        });
    }

    fn schedule_group_read_reply(&mut self, _ga: GroupAddress) {
        // Answering GroupValue_Read for locally-bound datapoints is the
        // responsibility of `Datapoint`, which holds the current value;
        // the engine only forwards the indication as a `GroupEvent` so a
        // bound datapoint can decide whether to respond.
    }

    async fn on_tunneling_ack(&mut self, body: &[u8]) {
        let Some(pending) = &self.pending_write else {
            return;
        };
        let Ok(ack) = crate::protocol::services::TunnelingAck::parse(body) else {
            return;
        };
        if ack.connection_header.sequence_counter != pending.sequence {
            return;
        }
        if self.client.handle_tunneling_ack(body).is_ok() {
            if let Some(pending) = self.pending_write.take() {
                let _ = pending.resp.send(Ok(()));
            }
        } else if let Some(pending) = self.pending_write.take() {
            let _ = pending.resp.send(Err(KnxError::tunneling_ack_failed()));
        }
        self.try_send_next_write().await;
    }

    fn arm_heartbeat(&mut self) {
        self.heartbeat_deadline = Some(self.scheduler.now() + HEARTBEAT_INTERVAL);
    }

    async fn note_heartbeat_failure(&mut self) {
        self.heartbeat_failures += 1;
        self.heartbeat_awaiting_ack = false;
        crate::pico_log!(warn, "CONNECTIONSTATE_REQUEST unanswered ({}/{})", self.heartbeat_failures, HEARTBEAT_FAILURES_BEFORE_LOST);
        if self.heartbeat_failures >= HEARTBEAT_FAILURES_BEFORE_LOST {
            self.on_tunnel_stalled().await;
        } else {
            self.arm_heartbeat();
        }
    }

    /// Arms the auto-reconnect timer after a teardown that started from
    /// [`Engine::on_tunnel_stalled`], using the same doubling backoff as a
    /// failed connect attempt. No-op for a teardown the caller requested.
    fn maybe_schedule_reconnect(&mut self) {
        if !self.stalled {
            return;
        }
        self.stalled = false;
        if !self.config.manual_connect {
            self.reconnect_deadline = Some(self.scheduler.now() + self.reconnect_backoff);
            self.reconnect_backoff = (self.reconnect_backoff * 2).min(RECONNECT_BACKOFF_CAP);
        }
    }

    async fn handle_timers(&mut self) {
        let now = self.scheduler.now();

        if let Some(deadline) = self.pending_write.as_ref().map(|w| w.deadline) {
            if deadline <= now {
                self.handle_write_timeout().await;
            }
        }

        if let Some(deadline) = self.pending_read.as_ref().map(|r| r.deadline) {
            if deadline <= now {
                if let Some(pending) = self.pending_read.take() {
                    let _ = pending.resp.send(Err(KnxError::Timeout));
                }
            }
        }

        if let Some(deadline) = self.heartbeat_deadline {
            if deadline <= now {
                if self.heartbeat_awaiting_ack {
                    // CONNECTIONSTATE_REQUEST went unanswered within
                    // HEARTBEAT_ACK_TIMEOUT: counts the same as an explicit
                    // negative response (§4.5).
                    self.note_heartbeat_failure().await;
                } else {
                    self.send_heartbeat().await;
                }
            }
        }

        if let Some(deadline) = self.reconnect_deadline {
            if deadline <= now {
                self.handle_reconnect_deadline().await;
            }
        }
    }

    async fn handle_write_timeout(&mut self) {
        let Some(mut pending) = self.pending_write.take() else {
            return;
        };
        if pending.retries_left > 0 {
            pending.retries_left -= 1;
            pending.deadline = self.scheduler.now() + ACK_TIMEOUT;
            if let Ok(frame) = self.client.build_tunneling_request(&pending.cemi_data) {
                let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
            }
            self.pending_write = Some(pending);
        } else {
            let _ = pending.resp.send(Err(KnxError::tunneling_ack_failed()));
            self.on_tunnel_stalled().await;
        }
    }

    /// §4.5: the ack-retransmit budget is exhausted, or the heartbeat has
    /// missed `HEARTBEAT_FAILURES_BEFORE_LOST` in a row. Either way the
    /// gateway has gone silent: fail outstanding work with `TunnelStalled`,
    /// surface it via `on_error`, and force a local teardown that leaves
    /// `handle_reconnect_deadline`/`on_disconnect_response` to schedule the
    /// auto-reconnect once the teardown completes.
    async fn on_tunnel_stalled(&mut self) {
        crate::pico_log!(error, "tunnel stalled: ack/heartbeat budget exhausted, tearing down");
        if let Some(pending) = self.pending_write.take() {
            let _ = pending.resp.send(Err(KnxError::connection_stalled()));
        }
        for queued in self.write_queue.drain(..) {
            let _ = queued.resp.send(Err(KnxError::connection_stalled()));
        }
        if let Some(pending) = self.pending_read.take() {
            let _ = pending.resp.send(Err(KnxError::connection_stalled()));
        }
        if let Some(cb) = self.config.handlers.on_error {
            cb(&KnxError::connection_stalled());
        }

        self.heartbeat_deadline = None;
        self.heartbeat_awaiting_ack = false;
        self.heartbeat_failures = 0;
        self.stalled = true;

        if let Ok(frame) = self.client.build_disconnect_request() {
            let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
        }
        let _ = self.state_tx.send(ConnectionState::Disconnecting);
        self.reconnect_deadline = Some(self.scheduler.now() + DISCONNECT_TIMEOUT);
    }

    async fn send_heartbeat(&mut self) {
        if !self.client.is_connected() {
            self.heartbeat_deadline = None;
            return;
        }
        if let Ok(frame) = self.client.build_connectionstate_request() {
            let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
        }
        self.heartbeat_awaiting_ack = true;
        self.heartbeat_deadline = Some(self.scheduler.now() + HEARTBEAT_ACK_TIMEOUT);
    }

    async fn handle_reconnect_deadline(&mut self) {
        self.reconnect_deadline = None;
        if self.client.state() == ConnectionState::Connecting {
            // Initial connect sequence timed out.
            self.connect_attempts_left = self.connect_attempts_left.saturating_sub(1);
            if self.connect_attempts_left == 0 {
                self.client.reset();
                let _ = self.state_tx.send(ConnectionState::Disconnected);
                for resp in self.pending_connect.drain(..) {
                    let _ = resp.send(Err(KnxError::connection_timeout()));
                }
            } else {
                self.send_connect_request().await;
            }
            return;
        }
        if self.client.state() == ConnectionState::Disconnecting {
            // Gateway never answered DISCONNECT_REQUEST; tear down locally.
            self.client.reset();
            let _ = self.state_tx.send(ConnectionState::Disconnected);
            for resp in self.pending_disconnect.drain(..) {
                let _ = resp.send(Ok(()));
            }
            if let Some(cb) = self.config.handlers.on_disconnected {
                cb();
            }
            self.maybe_schedule_reconnect();
            return;
        }
        if self.client.state() == ConnectionState::Disconnected && !self.config.manual_connect {
            // Auto-reconnect backoff elapsed.
            self.connect_attempts_left = CONNECT_ATTEMPTS;
            self.send_connect_request().await;
        }
    }

    async fn send_disconnect_request(&mut self) -> Result<()> {
        if self.client.is_connected() {
            if let Ok(frame) = self.client.build_disconnect_request() {
                let _ = self.transport.send_to(frame, self.gateway_endpoint).await;
            }
        }
        Ok(())
    }
}

fn extract_apdu_payload(ldata: &crate::protocol::cemi::LDataFrame<'_>) -> Vec<u8> {
    if ldata.data.is_empty() {
        vec![ldata.packed_value]
    } else {
        ldata.data.to_vec()
    }
}

/// Sleep until `deadline` on `scheduler`'s clock, or forever if `deadline` is
/// `None`. Lets the engine multiplex several optional timers behind one
/// `select!` branch instead of constructing one future per timer.
async fn sleep_until<S: Scheduler>(scheduler: &S, deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            let now = scheduler.now();
            if deadline > now {
                scheduler.sleep(deadline - now).await;
            }
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::mock_transport::MockTransport;
    use crate::scheduler::VirtualScheduler;

    fn test_config() -> ConnectionConfig {
        ConnectionConfig::new(
            crate::net::Ipv4Addr::new(192, 168, 1, 10),
            3671,
            IndividualAddress::new(1, 1, 1).unwrap(),
        )
        .with_manual_connect(true)
    }

    fn connect_response_frame(channel_id: u8) -> Vec<u8> {
        let body = [
            channel_id, 0x00, 0x08, 0x01, 192, 168, 1, 10, 0x0E, 0x57, 0x04, 0x04, 0x02, 0x00,
        ];
        let mut buf = [0u8; 64];
        let len = crate::protocol::frame::FrameBuilder::new(
            crate::protocol::constants::ServiceType::ConnectResponse,
            &body,
        )
        .build(&mut buf)
        .unwrap();
        buf[..len].to_vec()
    }

    #[tokio::test]
    async fn test_engine_starts_disconnected() {
        let transport = MockTransport::new();
        let scheduler = VirtualScheduler::new();
        let connection = Connection::with_transport_and_scheduler(test_config(), transport, scheduler)
            .await
            .unwrap();
        assert_eq!(connection.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_success_transitions_to_connected() {
        let mut transport = MockTransport::new();
        transport.add_response(connect_response_frame(5));
        let scheduler = VirtualScheduler::new();
        let connection = Connection::with_transport_and_scheduler(test_config(), transport, scheduler)
            .await
            .unwrap();

        connection.request_connect().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(connection.state(), ConnectionState::Connected);
    }
}
