// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cluster Role Taxonomy and Registry
//!
//! Defines the fixed set of functional node kinds in a multi-tier search
//! cluster and the registry that records how many instances of each kind a
//! deployment carries. The role set is closed: membership is known at
//! compile time and autoscaled roles are out of scope.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by role parsing and registry construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role kind: {0}")]
    UnknownKind(String),

    #[error("Duplicate role in registry: {0}")]
    DuplicateRole(RoleKind),

    #[error("Role {0} must have cardinality >= 1")]
    ZeroCardinality(RoleKind),
}

/// Functional node kind within the cluster
///
/// Each variant carries a canonical kebab-case name used in descriptors and
/// a short DNS label used for logical hostnames (`mn`, `sh2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleKind {
    /// Cluster master / coordination node
    MasterNode,
    /// Configuration deployer for the search head tier
    Deployer,
    /// Search head (query tier)
    SearchHead,
    /// Indexer (storage/ingest tier)
    Indexer,
    /// Heavy forwarder feeding the indexer tier
    HeavyForwarder,
    /// License master
    LicenseMaster,
    /// Monitoring console
    MonitoringConsole,
}

impl RoleKind {
    /// All role kinds, in canonical order
    pub const ALL: [RoleKind; 7] = [
        RoleKind::MasterNode,
        RoleKind::Deployer,
        RoleKind::SearchHead,
        RoleKind::Indexer,
        RoleKind::HeavyForwarder,
        RoleKind::LicenseMaster,
        RoleKind::MonitoringConsole,
    ];

    /// Canonical kebab-case name used in descriptors
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MasterNode => "master-node",
            Self::Deployer => "deployer",
            Self::SearchHead => "search-head",
            Self::Indexer => "indexer",
            Self::HeavyForwarder => "heavy-forwarder",
            Self::LicenseMaster => "license-master",
            Self::MonitoringConsole => "monitoring-console",
        }
    }

    /// Short DNS label used when building logical hostnames
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::MasterNode => "mn",
            Self::Deployer => "dp",
            Self::SearchHead => "sh",
            Self::Indexer => "idx",
            Self::HeavyForwarder => "hf",
            Self::LicenseMaster => "lm",
            Self::MonitoringConsole => "mc",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// RoleKind appears as a named `source`/`dest` field inside MatrixError's
// thiserror variants, which makes the derive require a std::error::Error
// bound on the field type. RoleKind is not itself a failure, so the impl is
// empty (Display + Debug are already provided above).
impl std::error::Error for RoleKind {}

impl FromStr for RoleKind {
    type Err = RoleError;

    // Strict parse: an unrecognized kind is an error, not a catch-all
    // variant, because matrix validation depends on registry membership.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "master-node" | "mn" => Ok(Self::MasterNode),
            "deployer" | "dp" => Ok(Self::Deployer),
            "search-head" | "sh" => Ok(Self::SearchHead),
            "indexer" | "idx" => Ok(Self::Indexer),
            "heavy-forwarder" | "hf" => Ok(Self::HeavyForwarder),
            "license-master" | "lm" => Ok(Self::LicenseMaster),
            "monitoring-console" | "mc" => Ok(Self::MonitoringConsole),
            other => Err(RoleError::UnknownKind(other.to_string())),
        }
    }
}

/// A role and the number of node instances it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub kind: RoleKind,
    pub cardinality: u32,
}

impl Role {
    pub fn new(kind: RoleKind, cardinality: u32) -> Result<Self, RoleError> {
        if cardinality == 0 {
            return Err(RoleError::ZeroCardinality(kind));
        }
        Ok(Self { kind, cardinality })
    }

    /// Single-instance role
    pub fn singleton(kind: RoleKind) -> Self {
        Self { kind, cardinality: 1 }
    }
}

/// Registry of the roles a deployment runs
///
/// Owns the `Role` values. Kinds are unique; iteration order is canonical
/// (`RoleKind` order) regardless of insertion order, so every consumer sees
/// the same enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRegistry {
    roles: Vec<Role>,
}

impl RoleRegistry {
    /// Build a registry, enforcing kind uniqueness and cardinality >= 1
    pub fn new(mut roles: Vec<Role>) -> Result<Self, RoleError> {
        roles.sort_by_key(|r| r.kind);
        for pair in roles.windows(2) {
            if pair[0].kind == pair[1].kind {
                return Err(RoleError::DuplicateRole(pair[0].kind));
            }
        }
        for role in &roles {
            if role.cardinality == 0 {
                return Err(RoleError::ZeroCardinality(role.kind));
            }
        }
        Ok(Self { roles })
    }

    /// Whether the registry carries the given kind
    pub fn contains(&self, kind: RoleKind) -> bool {
        self.roles.iter().any(|r| r.kind == kind)
    }

    /// Look up a role by kind
    pub fn get(&self, kind: RoleKind) -> Option<&Role> {
        self.roles.iter().find(|r| r.kind == kind)
    }

    /// Roles in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    /// Total node instances across all roles
    pub fn node_count(&self) -> u32 {
        self.roles.iter().map(|r| r.cardinality).sum()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
