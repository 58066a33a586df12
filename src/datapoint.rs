//! Binds a [`GroupAddress`] and a DPT codec to a live [`Connection`].
//!
//! A [`Datapoint`] is the ergonomic layer above [`Connection::write_group`]/
//! [`Connection::read_group`]: it remembers the last value seen for its group
//! address (with a timestamp), can keep itself fresh with a `GroupValue_Read`
//! on every `(re)connect` (`autoread`), and lets callers register `fn`
//! listeners instead of polling.

use crate::addressing::GroupAddress;
use crate::connection::{Connection, ConnectionState, GroupEvent};
use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Fixed capacity for a [`Datapoint`]'s `on_change`/`on_event` listener
/// slots. Plain `fn` pointers rather than `Box<dyn Fn>`, matching
/// [`crate::config::ConnectionHandlers`]'s avoidance of heap-allocated
/// dynamic dispatch for callbacks.
const MAX_LISTENERS: usize = 4;

/// Callback invoked after a [`Datapoint`]'s tracked value changes.
pub type ChangeListener<T> = fn(GroupAddress, &T);
/// Callback invoked on every [`GroupEvent`] addressed to this datapoint,
/// including ones that did not change the decoded value (a repeated write of
/// the same value, or an `L_Data.con` confirmation).
pub type EventListener = fn(&GroupEvent);

struct Shared<T> {
    value: Mutex<Option<(T, Instant)>>,
    on_change: Mutex<heapless::Vec<ChangeListener<T>, MAX_LISTENERS>>,
    on_event: Mutex<heapless::Vec<EventListener, MAX_LISTENERS>>,
}

/// A `GroupAddress` + DPT codec pair bound to a [`Connection`].
///
/// Cloning a [`Datapoint`] shares the same tracked value and listener slots
/// and the same background listener task; dropping the last clone stops the
/// task.
pub struct Datapoint<D, T> {
    connection: Connection,
    ga: GroupAddress,
    codec: D,
    shared: Arc<Shared<T>>,
    _task: Arc<JoinHandle<()>>,
}

impl<D, T> Clone for Datapoint<D, T>
where
    D: Clone,
{
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            ga: self.ga,
            codec: self.codec.clone(),
            shared: Arc::clone(&self.shared),
            _task: Arc::clone(&self._task),
        }
    }
}

impl<D, T> Datapoint<D, T>
where
    D: DptEncode<T> + DptDecode<T> + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Bind `ga` to `codec` over `connection`. If `autoread` is set, a
    /// `GroupValue_Read` is issued immediately and again every time the
    /// connection reaches [`ConnectionState::Connected`] (including after an
    /// auto-reconnect).
    #[must_use]
    pub fn new(connection: Connection, ga: GroupAddress, codec: D, autoread: bool) -> Self {
        let shared = Arc::new(Shared {
            value: Mutex::new(None),
            on_change: Mutex::new(heapless::Vec::new()),
            on_event: Mutex::new(heapless::Vec::new()),
        });

        let task = tokio::spawn(Self::run_listener(
            connection.clone(),
            ga,
            codec.clone(),
            Arc::clone(&shared),
            autoread,
        ));

        Self {
            connection,
            ga,
            codec,
            shared,
            _task: Arc::new(task),
        }
    }

    /// The bound group address.
    #[must_use]
    pub const fn group_address(&self) -> GroupAddress {
        self.ga
    }

    /// The last known value and when it was observed, if any has arrived yet.
    #[must_use]
    pub fn current_value(&self) -> Option<(T, Instant)> {
        self.shared.value.lock().expect("datapoint value mutex poisoned").clone()
    }

    /// Register an `fn` to run whenever the decoded value changes.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Config` if the listener slots are already full
    /// (see [`MAX_LISTENERS`]).
    pub fn on_change(&self, listener: ChangeListener<T>) -> Result<()> {
        self.shared
            .on_change
            .lock()
            .expect("datapoint on_change mutex poisoned")
            .push(listener)
            .map_err(|_| KnxError::listener_capacity_exceeded())
    }

    /// Register an `fn` to run on every group telegram seen for this
    /// datapoint's group address, decoded or not.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Config` if the listener slots are already full.
    pub fn on_event(&self, listener: EventListener) -> Result<()> {
        self.shared
            .on_event
            .lock()
            .expect("datapoint on_event mutex poisoned")
            .push(listener)
            .map_err(|_| KnxError::listener_capacity_exceeded())
    }

    /// Encode `value` and send a `GroupValue_Write`.
    ///
    /// Resolves once the gateway's `TUNNELING_ACK` confirms delivery onto the
    /// bus; it does not itself wait for the `L_Data.con` application
    /// confirmation (see [`GroupEvent::is_confirmation`] if the caller needs
    /// to observe that separately).
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Dpt` if `value` cannot be encoded for this
    /// datapoint's DPT, or whatever [`Connection::write_group`] returns for a
    /// disconnected, stalled, or unacknowledged tunnel.
    pub async fn write(&self, value: T) -> Result<()> {
        let mut buf = [0u8; crate::protocol::constants::MAX_CEMI_SIZE];
        let len = self.codec.encode(value.clone(), &mut buf)?;
        self.connection.write_group(self.ga, &buf[..len]).await?;
        self.store_and_notify(value);
        Ok(())
    }

    /// Send a `GroupValue_Read` and decode the first matching response.
    ///
    /// Updates `current_value()` and fires `on_change` listeners the same
    /// way an unsolicited `GroupValue_Write`/`_Response` would.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Timeout` if no response arrives in time, or
    /// `KnxError::Dpt` if the response cannot be decoded for this datapoint's
    /// DPT.
    pub async fn read(&self) -> Result<T> {
        let data = self.connection.read_group(self.ga).await?;
        let value = self.codec.decode(&data)?;
        self.store_and_notify(value.clone());
        Ok(value)
    }

    fn store_and_notify(&self, value: T) {
        let now = Instant::now();
        let mut slot = self.shared.value.lock().expect("datapoint value mutex poisoned");
        *slot = Some((value.clone(), now));
        drop(slot);
        for listener in self.shared.on_change.lock().expect("datapoint on_change mutex poisoned").iter() {
            listener(self.ga, &value);
        }
    }

    async fn run_listener(
        connection: Connection,
        ga: GroupAddress,
        codec: D,
        shared: Arc<Shared<T>>,
        autoread: bool,
    ) {
        let mut events = connection.subscribe();
        let mut state = connection.watch_state();

        if autoread {
            let _ = connection.read_group(ga).await;
        }

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Ok(event) = event else {
                        // Lagged or closed: re-sync by reading the current
                        // value rather than risk acting on a gap.
                        if autoread {
                            let _ = connection.read_group(ga).await;
                        }
                        continue;
                    };
                    if event.ga != ga {
                        continue;
                    }
                    for listener in shared.on_event.lock().expect("datapoint on_event mutex poisoned").iter() {
                        listener(&event);
                    }
                    if event.is_confirmation() {
                        continue;
                    }
                    if let Ok(value) = codec.decode(&event.data) {
                        let now = Instant::now();
                        *shared.value.lock().expect("datapoint value mutex poisoned") = Some((value.clone(), now));
                        for listener in shared.on_change.lock().expect("datapoint on_change mutex poisoned").iter() {
                            listener(ga, &value);
                        }
                    }
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if autoread && *state.borrow() == ConnectionState::Connected {
                        let _ = connection.read_group(ga).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::IndividualAddress;
    use crate::config::ConnectionConfig;
    use crate::dpt::Dpt1;
    use crate::net::mock_transport::MockTransport;
    use crate::scheduler::VirtualScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    fn tunneling_ack_frame(channel_id: u8, sequence: u8) -> Vec<u8> {
        use crate::protocol::services::{ConnectionHeader, TunnelingAck};
        let mut buf = [0u8; 16];
        let len = TunnelingAck::new(ConnectionHeader::new(channel_id, sequence), 0)
            .build(&mut buf)
            .unwrap();
        buf[..len].to_vec()
    }

    /// Connects with `extra_responses` already queued behind the
    /// `CONNECT_RESPONSE`, so a test can drive one more round-trip (e.g. a
    /// `TUNNELING_ACK` for a write) without needing to inject packets after
    /// the engine has taken ownership of the transport.
    async fn connected_fixture(extra_responses: Vec<Vec<u8>>) -> Connection {
        let mut transport = MockTransport::new();
        transport.add_response(connect_response_frame(5));
        for response in extra_responses {
            transport.add_response(response);
        }
        let scheduler = VirtualScheduler::new();
        let connection = Connection::with_transport_and_scheduler(test_config(), transport, scheduler)
            .await
            .unwrap();
        connection.request_connect().await.unwrap();
        connection
    }

    #[tokio::test]
    async fn test_datapoint_starts_with_no_value() {
        let connection = connected_fixture(Vec::new()).await;
        let ga = GroupAddress::new(1, 2, 3).unwrap();
        let dp = Datapoint::new(connection, ga, Dpt1::Switch, false);
        assert!(dp.current_value().is_none());
    }

    #[tokio::test]
    async fn test_write_updates_current_value_and_fires_on_change() {
        static SEEN: AtomicUsize = AtomicUsize::new(0);
        SEEN.store(0, Ordering::SeqCst);

        let connection = connected_fixture(vec![tunneling_ack_frame(5, 0)]).await;
        let ga = GroupAddress::new(1, 2, 3).unwrap();
        let dp = Datapoint::new(connection, ga, Dpt1::Switch, false);
        dp.on_change(|_ga, value: &bool| {
            if *value {
                SEEN.fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        dp.write(true).await.unwrap();
        assert_eq!(dp.current_value().map(|(v, _)| v), Some(true));
        assert_eq!(SEEN.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_on_change_capacity_exceeded() {
        let connection = connected_fixture(Vec::new()).await;
        let ga = GroupAddress::new(1, 2, 3).unwrap();
        let dp = Datapoint::new(connection, ga, Dpt1::Switch, false);
        for _ in 0..MAX_LISTENERS {
            dp.on_change(|_, _| {}).unwrap();
        }
        assert!(dp.on_change(|_, _| {}).is_err());
    }
}
