#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![allow(dead_code)]
#![doc = include_str!("../README.md")]

//! # knx-pico
//!
//! KNXnet/IP protocol implementation for embedded and hosted systems.
//!
//! This crate provides a `no_std`-compatible implementation of the KNXnet/IP
//! tunneling protocol, usable both on embedded microcontrollers (Embassy async
//! runtime) and on hosted platforms through the `std` feature's Tokio-backed
//! connection facade.
//!
//! ## Features
//!
//! - KNXnet/IP tunneling support, including heartbeat and auto-reconnect
//! - Common Datapoint Types (DPT)
//! - Individual and Group addressing
//! - Zero-copy parsing
//! - Async/await with Embassy on embedded targets, Tokio under `std`
//!
//! ## Example
//!
//! ```rust
//! use knx_pico::GroupAddress;
//!
//! let addr = GroupAddress::new(1, 2, 3).unwrap();
//! assert_eq!(addr.to_string_3level().as_str(), "1/2/3");
//! ```

pub mod addressing;
pub mod dpt;
pub mod error;
pub mod logging;
pub mod net;
pub mod protocol;

// The Tokio-backed `Connection`/`Datapoint` facade and its supporting
// `config`/`scheduler` modules are `std`-only, the same way
// `net::std_transport` is: they have no embedded counterpart, unlike
// `protocol::async_tunnel` which serves the Embassy target directly.
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod connection;
#[cfg(feature = "std")]
pub mod datapoint;
#[cfg(feature = "std")]
pub mod scheduler;

// Macro module (must be declared before use)
#[macro_use]
pub mod macros;

// Re-export commonly used types
pub use addressing::{GroupAddress, IndividualAddress};
#[cfg(feature = "std")]
pub use config::ConnectionConfig;
#[cfg(feature = "std")]
pub use connection::Connection;
#[cfg(feature = "std")]
pub use datapoint::Datapoint;
pub use dpt::{Dpt1, Dpt5, Dpt9, DptDecode, DptEncode};
pub use error::{KnxError, Result};
