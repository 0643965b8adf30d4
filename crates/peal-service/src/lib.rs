//! xPL application service
//!
//! The protocol engine for one xPL node: owns the broadcast socket,
//! keeps the two-phase heartbeat going, watches for its own echo to
//! detect a relaying hub, and dispatches inbound messages to
//! registered handlers.
//!
//! This crate provides:
//! - The service event loop ([`AppService`]) and its cloneable
//!   send/probe handle ([`ServiceHandle`])
//! - Heartbeat scheduling ([`Cadence`], [`Phase`])
//! - Timing and addressing configuration ([`ServiceConfig`])

pub mod cadence;
pub mod config;
pub mod error;
pub mod service;

pub use cadence::{Cadence, Phase};
pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use service::{AppService, ServiceHandle};
