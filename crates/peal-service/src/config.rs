//! Application service configuration

use std::net::SocketAddr;
use std::time::Duration;

use peal_proto::XPL_PORT;

/// Timing and addressing for the application service.
///
/// Defaults follow xPL convention: messages go to the broadcast
/// address on port 3865, discovery beats every 3 s for at most 120 s,
/// lonely beats every 30 s, steady-state beats every 5 min.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Where heartbeats and outbound messages are sent
    pub hub_addr: SocketAddr,
    /// Beat period before any hub echo has been seen
    pub discovery_period: Duration,
    /// Beat period after discovery gives up without an echo
    pub lonely_period: Duration,
    /// Steady-state beat period once the hub echo has been seen
    pub heartbeat_period: Duration,
    /// Ceiling on the total time spent in the discovery phase
    pub discovery_window: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            hub_addr: SocketAddr::from(([255, 255, 255, 255], XPL_PORT)),
            discovery_period: Duration::from_secs(3),
            lonely_period: Duration::from_secs(30),
            heartbeat_period: Duration::from_secs(300),
            discovery_window: Duration::from_secs(120),
        }
    }
}

impl ServiceConfig {
    /// Override the hub destination, mainly for loopback test setups
    pub fn with_hub_addr(mut self, addr: SocketAddr) -> Self {
        self.hub_addr = addr;
        self
    }

    /// Override the steady-state heartbeat period
    pub fn with_heartbeat_period(mut self, period: Duration) -> Self {
        self.heartbeat_period = period;
        self
    }

    /// Override the discovery beat period and window together
    pub fn with_discovery(mut self, period: Duration, window: Duration) -> Self {
        self.discovery_period = period;
        self.discovery_window = window;
        self
    }

    /// Override the lonely beat period
    pub fn with_lonely_period(mut self, period: Duration) -> Self {
        self.lonely_period = period;
        self
    }
}
