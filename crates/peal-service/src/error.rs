//! Service error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Transport failures. Any of these aborts the service loop; malformed
/// protocol traffic is dropped silently and never surfaces here.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("socket bind failed: {0}")]
    Bind(#[source] std::io::Error),

    #[error("send failed: {0}")]
    Send(#[source] std::io::Error),

    #[error("receive failed: {0}")]
    Recv(#[source] std::io::Error),
}
