// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connection Matrix - Declarative Cross-Role Access Requirements
//!
//! The matrix is an append-only table of directed access requirements
//! between roles, each carrying one or more ports and a source scope. It is
//! fully specified before compilation; validation checks every rule against
//! the role registry and rejects the whole matrix on the first violation.
//!
//! # Scope Semantics
//!
//! - `member`: any instance of `source` may reach any instance of `dest`
//!   on the listed ports. Requires `source != dest`.
//! - `internal`: intra-role-group traffic (replication, cluster bundle
//!   ports). Requires `source == dest`.
//! - `public`: any IPv4 origin may reach `dest`. The source role is not
//!   part of the compiled output; entries are written per-dest with
//!   `source == dest` by convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::{Port, RoleKind, RoleRegistry};

/// Matrix validation error, carrying the offending rule's identity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Rule #{rule} references role {role} not present in the registry")]
    UnknownRole { rule: usize, role: RoleKind },

    #[error("Rule #{rule} ({source} -> {dest}): scope {scope} requires distinct source and dest roles")]
    SelfEdgeNotInternal {
        rule: usize,
        source: RoleKind,
        dest: RoleKind,
        scope: ConnectionScope,
    },

    #[error("Rule #{rule} ({source} -> {dest}): internal scope requires source == dest")]
    InternalAcrossRoles {
        rule: usize,
        source: RoleKind,
        dest: RoleKind,
    },

    #[error("Rule #{rule} ({source} -> {dest}) lists no ports")]
    EmptyPorts {
        rule: usize,
        source: RoleKind,
        dest: RoleKind,
    },
}

/// Allowed traffic origin for a connection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionScope {
    /// Any instance of the source role
    Member,
    /// Any member of the same role group (self-edge)
    Internal,
    /// The public internet (any IPv4 origin)
    Public,
}

impl fmt::Display for ConnectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Internal => write!(f, "internal"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// A directed access requirement between roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRule {
    pub source: RoleKind,
    pub dest: RoleKind,
    pub ports: Vec<Port>,
    pub scope: ConnectionScope,
}

impl ConnectionRule {
    /// Cross-role edge: any `source` instance to any `dest` instance
    pub fn member(source: RoleKind, dest: RoleKind, ports: Vec<Port>) -> Self {
        Self {
            source,
            dest,
            ports,
            scope: ConnectionScope::Member,
        }
    }

    /// Intra-role-group edge (peer replication, cluster bundle ports)
    pub fn internal(role: RoleKind, ports: Vec<Port>) -> Self {
        Self {
            source: role,
            dest: role,
            ports,
            scope: ConnectionScope::Internal,
        }
    }

    /// Public-internet edge to `dest`; the source field is unused
    pub fn public(dest: RoleKind, ports: Vec<Port>) -> Self {
        Self {
            source: dest,
            dest,
            ports,
            scope: ConnectionScope::Public,
        }
    }
}

/// Append-only table of connection rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMatrix {
    rules: Vec<ConnectionRule>,
}

impl ConnectionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<ConnectionRule>) -> Self {
        Self { rules }
    }

    /// Append a rule. Rules are never removed or reordered.
    pub fn push(&mut self, rule: ConnectionRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ConnectionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate every rule against the registry
    ///
    /// All-or-nothing: the first violation fails the whole matrix, with the
    /// rule's index and roles in the error.
    pub fn validate(&self, registry: &RoleRegistry) -> Result<(), MatrixError> {
        for (idx, rule) in self.rules.iter().enumerate() {
            for role in [rule.source, rule.dest] {
                if !registry.contains(role) {
                    return Err(MatrixError::UnknownRole { rule: idx, role });
                }
            }

            match rule.scope {
                ConnectionScope::Internal if rule.source != rule.dest => {
                    return Err(MatrixError::InternalAcrossRoles {
                        rule: idx,
                        source: rule.source,
                        dest: rule.dest,
                    });
                }
                ConnectionScope::Member if rule.source == rule.dest => {
                    return Err(MatrixError::SelfEdgeNotInternal {
                        rule: idx,
                        source: rule.source,
                        dest: rule.dest,
                        scope: rule.scope,
                    });
                }
                _ => {}
            }

            if rule.ports.is_empty() {
                return Err(MatrixError::EmptyPorts {
                    rule: idx,
                    source: rule.source,
                    dest: rule.dest,
                });
            }
        }

        Ok(())
    }
}
