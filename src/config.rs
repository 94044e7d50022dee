// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Configuration
//!
//! Serde-deserializable descriptors for the three inputs the core consumes:
//! the role registry, the connection matrix, and the zone name. Descriptors
//! carry raw strings and integers; `resolve` parses them into validated
//! domain types, with every error naming the entry that caused it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Hostname, HostnameError, Port, PortError, Role, RoleError, RoleRegistry};
use crate::matrix::{ConnectionMatrix, ConnectionRule, ConnectionScope};
use crate::reference;

/// Configuration load/parse errors, naming the offending entry
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse topology config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Role entry #{index}: {source}")]
    Role {
        index: usize,
        #[source]
        source: RoleError,
    },

    #[error("Role registry: {0}")]
    Registry(RoleError),

    #[error("Connection entry #{index}: {source}")]
    ConnectionRole {
        index: usize,
        #[source]
        source: RoleError,
    },

    #[error("Connection entry #{index}: {source}")]
    Port {
        index: usize,
        #[source]
        source: PortError,
    },

    #[error("Invalid zone name: {0}")]
    Zone(#[from] HostnameError),
}

/// One role registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub kind: String,
    pub cardinality: u32,
}

/// One connection matrix entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub source: String,
    pub dest: String,
    pub ports: Vec<u32>,
    pub scope: ConnectionScope,
}

/// Declarative topology descriptor
///
/// The `Default` value is the reference search-cluster deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// DNS suffix logical names are published under
    pub zone: String,
    pub roles: Vec<RoleEntry>,
    pub connections: Vec<ConnectionEntry>,
}

/// Validated domain inputs resolved from a descriptor
#[derive(Debug, Clone)]
pub struct ResolvedTopology {
    pub zone: Hostname,
    pub registry: RoleRegistry,
    pub matrix: ConnectionMatrix,
}

impl TopologyConfig {
    /// Parse a JSON descriptor
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse descriptor strings and integers into validated domain types
    pub fn resolve(&self) -> Result<ResolvedTopology, ConfigError> {
        let zone = Hostname::new(self.zone.as_str())?;

        let mut roles = Vec::with_capacity(self.roles.len());
        for (index, entry) in self.roles.iter().enumerate() {
            let kind = entry
                .kind
                .parse()
                .map_err(|source| ConfigError::Role { index, source })?;
            let role = Role::new(kind, entry.cardinality)
                .map_err(|source| ConfigError::Role { index, source })?;
            roles.push(role);
        }
        let registry = RoleRegistry::new(roles).map_err(ConfigError::Registry)?;

        let mut rules = Vec::with_capacity(self.connections.len());
        for (index, entry) in self.connections.iter().enumerate() {
            let source = entry
                .source
                .parse()
                .map_err(|source| ConfigError::ConnectionRole { index, source })?;
            let dest = entry
                .dest
                .parse()
                .map_err(|source| ConfigError::ConnectionRole { index, source })?;
            let mut ports = Vec::with_capacity(entry.ports.len());
            for &raw in &entry.ports {
                let port =
                    Port::new(raw).map_err(|source| ConfigError::Port { index, source })?;
                ports.push(port);
            }
            rules.push(ConnectionRule {
                source,
                dest,
                ports,
                scope: entry.scope,
            });
        }

        Ok(ResolvedTopology {
            zone,
            registry,
            matrix: ConnectionMatrix::from_rules(rules),
        })
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        reference::reference_config()
    }
}
