//! Connection configuration for the `std` tunneling facade.
//!
//! Replaces the board-specific WiFi/gateway stub that used to live in
//! `configuration.rs`. Follows the crate's existing convention of a `const
//! fn new(...)` constructor plus chainable `with_*` setters (see
//! [`crate::protocol::frame::Hpai::new`], [`crate::protocol::cemi::ControlField1::new`])
//! rather than a derive-macro builder the rest of the crate never depended on.

use crate::addressing::IndividualAddress;
use crate::error::{KnxError, Result};
use crate::net::Ipv4Addr;
use std::time::Duration;

/// Transport-level host protocol a [`ConnectionConfig`] can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostProtocol {
    /// Point-to-point tunneling over a dedicated channel (the default).
    Tunneling,
    /// Multicast routing (`ROUTING_INDICATION`, no channel/ACK).
    Routing,
}

/// Verbosity passed to the crate's [`pico_log!`](crate::pico_log) macro.
/// [`LogLevel::apply`] additionally installs this as the `log` crate's
/// global max level, which only matters when the `usb-logger` feature is
/// enabled (otherwise nothing has registered a `log` subscriber to filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No logging.
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[cfg(feature = "usb-logger")]
impl LogLevel {
    fn to_log_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }

    /// Install this level as the `log` crate's max level.
    pub fn apply(self) {
        log::set_max_level(self.to_log_level_filter());
    }
}

/// Callback invoked when a connection attempt starts.
pub type ConnectingHandler = fn();
/// Callback invoked once `CONNECT_RESPONSE` is accepted.
pub type ConnectedHandler = fn();
/// Callback invoked when the connection is torn down (requested or lost).
pub type DisconnectedHandler = fn();
/// Callback invoked on any [`KnxError`] surfaced by the background engine
/// that is not already returned to a waiting caller (e.g. a dropped
/// unsolicited indication, a stalled heartbeat).
pub type ErrorHandler = fn(&KnxError);

/// Lifecycle callbacks for a [`crate::connection::Connection`].
///
/// Plain `fn` pointers, not `Box<dyn Fn>`: matches the crate's existing
/// avoidance of heap-allocated dynamic dispatch (see `datapoint.rs`'s typed
/// listener registry for the same reasoning applied to per-GA callbacks).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionHandlers {
    /// Fired when a CONNECT_REQUEST is about to be sent.
    pub on_connecting: Option<ConnectingHandler>,
    /// Fired once the tunnel is established.
    pub on_connected: Option<ConnectedHandler>,
    /// Fired when the tunnel is disconnected (requested, lost, or stalled).
    pub on_disconnected: Option<DisconnectedHandler>,
    /// Fired on background errors not already surfaced to a caller.
    pub on_error: Option<ErrorHandler>,
}

/// Configuration for a [`crate::connection::Connection`].
///
/// Mirrors spec-level fields: gateway endpoint, our own physical address (used
/// as the cEMI source address), log verbosity, lifecycle handlers, and the
/// connection engine's timing knobs.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub(crate) gateway_addr: Ipv4Addr,
    pub(crate) gateway_port: u16,
    pub(crate) phys_addr: IndividualAddress,
    pub(crate) log_level: LogLevel,
    pub(crate) handlers: ConnectionHandlers,
    pub(crate) manual_connect: bool,
    pub(crate) minimum_delay: Duration,
    pub(crate) force_tunneling: bool,
    pub(crate) host_protocol: HostProtocol,
    pub(crate) max_queue_age: Duration,
}

impl ConnectionConfig {
    /// Create a new configuration for a gateway at `gateway_addr:gateway_port`,
    /// identifying ourselves on the bus as `phys_addr`.
    pub const fn new(gateway_addr: Ipv4Addr, gateway_port: u16, phys_addr: IndividualAddress) -> Self {
        Self {
            gateway_addr,
            gateway_port,
            phys_addr,
            log_level: LogLevel::Info,
            handlers: ConnectionHandlers {
                on_connecting: None,
                on_connected: None,
                on_disconnected: None,
                on_error: None,
            },
            manual_connect: false,
            minimum_delay: Duration::from_millis(0),
            force_tunneling: false,
            host_protocol: HostProtocol::Tunneling,
            max_queue_age: Duration::from_secs(30),
        }
    }

    /// Set the log verbosity applied via [`LogLevel::apply`] on connect.
    #[must_use]
    pub const fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Set the lifecycle callbacks.
    #[must_use]
    pub const fn with_handlers(mut self, handlers: ConnectionHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// If `true`, the engine does not connect automatically on construction
    /// and does not auto-reconnect after the connection is lost; the caller
    /// must drive `connect()` itself.
    #[must_use]
    pub const fn with_manual_connect(mut self, manual_connect: bool) -> Self {
        self.manual_connect = manual_connect;
        self
    }

    /// Minimum delay enforced between consecutive outbound writes.
    #[must_use]
    pub const fn with_minimum_delay(mut self, minimum_delay: Duration) -> Self {
        self.minimum_delay = minimum_delay;
        self
    }

    /// Force tunneling even when a gateway also advertises routing support.
    #[must_use]
    pub const fn with_force_tunneling(mut self, force_tunneling: bool) -> Self {
        self.force_tunneling = force_tunneling;
        self
    }

    /// Select tunneling vs. multicast routing as the transport.
    #[must_use]
    pub const fn with_host_protocol(mut self, host_protocol: HostProtocol) -> Self {
        self.host_protocol = host_protocol;
        self
    }

    /// Maximum age a queued write is allowed to reach before it is dropped
    /// with [`KnxError::Expired`] instead of being sent.
    #[must_use]
    pub const fn with_max_queue_age(mut self, max_queue_age: Duration) -> Self {
        self.max_queue_age = max_queue_age;
        self
    }

    /// Validate the configuration, surfacing the same [`crate::error::ConfigError`]
    /// kinds spec.md's `ConfigError` maps onto.
    ///
    /// # Errors
    ///
    /// Returns `KnxError::Config` if the gateway port is zero (no gateway
    /// configured) or if `max_queue_age` is zero (a queue that expires
    /// everything instantly is never useful and is almost certainly a typo).
    pub fn validate(&self) -> Result<()> {
        if self.gateway_port == 0 {
            return Err(KnxError::missing_gateway());
        }
        if self.max_queue_age.is_zero() {
            return Err(KnxError::invalid_timeout());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_phys_addr() -> IndividualAddress {
        IndividualAddress::new(1, 1, 1).unwrap()
    }

    #[test]
    fn test_new_defaults() {
        let cfg = ConnectionConfig::new(Ipv4Addr::new(192, 168, 1, 10), 3671, test_phys_addr());
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert!(!cfg.manual_connect);
        assert!(!cfg.force_tunneling);
        assert_eq!(cfg.host_protocol, HostProtocol::Tunneling);
        assert_eq!(cfg.max_queue_age, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_chain() {
        let cfg = ConnectionConfig::new(Ipv4Addr::new(192, 168, 1, 10), 3671, test_phys_addr())
            .with_manual_connect(true)
            .with_force_tunneling(true)
            .with_host_protocol(HostProtocol::Routing)
            .with_minimum_delay(Duration::from_millis(50))
            .with_max_queue_age(Duration::from_secs(10));

        assert!(cfg.manual_connect);
        assert!(cfg.force_tunneling);
        assert_eq!(cfg.host_protocol, HostProtocol::Routing);
        assert_eq!(cfg.minimum_delay, Duration::from_millis(50));
        assert_eq!(cfg.max_queue_age, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_missing_gateway() {
        let cfg = ConnectionConfig::new(Ipv4Addr::UNSPECIFIED, 0, test_phys_addr());
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, KnxError::Config(_)));
    }

    #[test]
    fn test_validate_zero_queue_age() {
        let cfg = ConnectionConfig::new(Ipv4Addr::new(192, 168, 1, 10), 3671, test_phys_addr())
            .with_max_queue_age(Duration::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let cfg = ConnectionConfig::new(Ipv4Addr::new(192, 168, 1, 10), 3671, test_phys_addr());
        assert!(cfg.validate().is_ok());
    }
}
