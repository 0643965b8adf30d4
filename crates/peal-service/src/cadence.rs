//! Heartbeat scheduling
//!
//! An xPL node announces itself aggressively until it sees a hub relay
//! its own heartbeat back, backs off if no hub ever answers, and
//! settles into a slow steady beat once connected. [`Cadence`] tracks
//! which of those phases the node is in and computes the delay to the
//! next beat.

use std::time::Duration;

use crate::config::ServiceConfig;

/// Heartbeat phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Frequent beats while waiting for the first hub echo
    Discovery,
    /// Slow probing after discovery ran out without an echo
    Lonely,
    /// Steady-state announcements
    Connected,
}

/// Computes the delay until the next heartbeat.
///
/// Call [`after_beat`](Self::after_beat) once per beat actually sent;
/// it advances the phase and returns how long to wait before the next
/// one. Exactly one beat is sent per tick in every phase.
#[derive(Debug)]
pub struct Cadence {
    discovery_period: Duration,
    lonely_period: Duration,
    heartbeat_period: Duration,
    max_discovery: u32,
    phase: Phase,
    sent: u32,
}

impl Cadence {
    pub fn new(config: &ServiceConfig) -> Self {
        let period_ms = config.discovery_period.as_millis().max(1);
        let max_discovery = (config.discovery_window.as_millis() / period_ms).max(1) as u32;
        Self {
            discovery_period: config.discovery_period,
            lonely_period: config.lonely_period,
            heartbeat_period: config.heartbeat_period,
            max_discovery,
            phase: Phase::Discovery,
            sent: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of discovery beats before the node gives up and goes lonely
    pub fn max_discovery(&self) -> u32 {
        self.max_discovery
    }

    /// Record one sent beat and return the delay until the next.
    ///
    /// `connected` is the node's current view of the hub: once true the
    /// cadence moves to [`Phase::Connected`] and stays there.
    pub fn after_beat(&mut self, connected: bool) -> Duration {
        match self.phase {
            Phase::Connected => self.heartbeat_period,
            _ if connected => {
                self.phase = Phase::Connected;
                self.heartbeat_period
            }
            Phase::Discovery => {
                self.sent += 1;
                if self.sent >= self.max_discovery {
                    self.phase = Phase::Lonely;
                    self.lonely_period
                } else {
                    self.discovery_period
                }
            }
            Phase::Lonely => self.lonely_period,
        }
    }
}
