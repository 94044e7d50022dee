//! Error types for topology operations

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{HostnameError, PortError, RoleError};
use crate::matrix::MatrixError;
use crate::naming::NamingError;
use crate::service::ServiceError;

/// Umbrella error for topology operations
///
/// Library modules raise their own typed errors; this is the crate-level
/// aggregation for callers that drive several stages in one pass.
///
/// # Examples
///
/// ```rust
/// use cim_cluster_topology::{compile, TopologyConfig, TopologyResult};
///
/// fn plan() -> TopologyResult<usize> {
///     let resolved = TopologyConfig::default().resolve()?;
///     let compilation = compile(&resolved.registry, &resolved.matrix)?;
///     Ok(compilation.rules.len())
/// }
/// # assert!(plan().unwrap() > 0);
/// ```
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Role taxonomy or registry error
    #[error("Role error: {0}")]
    Role(#[from] RoleError),

    /// Port validation error
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Hostname validation error
    #[error("Hostname error: {0}")]
    Hostname(#[from] HostnameError),

    /// Connection matrix validation error
    #[error("Matrix validation error: {0}")]
    Matrix(#[from] MatrixError),

    /// Naming resolver error
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Configuration load error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provisioning service error
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;
