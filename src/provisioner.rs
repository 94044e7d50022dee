// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioner Adapter - External Collaborator Contract
//!
//! The topology core does not create cloud resources; it produces a
//! deterministic compiled rule set and node list and hands them to a
//! provisioner. This module defines only the contract that collaborator
//! must satisfy.
//!
//! # Requirements placed on implementations
//!
//! - **Retriability**: `apply` called twice with the same compiled input
//!   must not create duplicate resources. The core guarantees the input is
//!   byte-identical across runs; reconciliation is the adapter's job.
//! - **Per-node outcomes**: a failing node must not poison the batch.
//!   `apply` reports an address or a failure for every node it was given.
//! - **Binding overwrite**: `bind_name` publishes or replaces the record
//!   for one logical name. Callers never issue concurrent `bind_name`
//!   calls for the same name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

use crate::compiler::CompiledRule;
use crate::naming::{NameBinding, Node, NodeId};

/// Per-node failure reported by a provisioner
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("provisioning {node} failed: {reason}")]
pub struct ProvisionError {
    pub node: NodeId,
    pub reason: String,
}

impl ProvisionError {
    pub fn new(node: NodeId, reason: impl Into<String>) -> Self {
        Self {
            node,
            reason: reason.into(),
        }
    }
}

/// Outcome of provisioning one node: its address, or why it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProvision {
    pub node: NodeId,
    pub outcome: Result<IpAddr, ProvisionError>,
}

impl NodeProvision {
    pub fn provisioned(node: NodeId, address: IpAddr) -> Self {
        Self {
            node,
            outcome: Ok(address),
        }
    }

    pub fn failed(node: NodeId, reason: impl Into<String>) -> Self {
        Self {
            node,
            outcome: Err(ProvisionError::new(node, reason)),
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        self.outcome.as_ref().ok().copied()
    }
}

impl fmt::Display for NodeProvision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(addr) => write!(f, "{} -> {}", self.node, addr),
            Err(err) => write!(f, "{}", err),
        }
    }
}

/// Contract for the external system that realizes a compiled topology
///
/// Both operations are opaque, potentially slow remote calls; the core
/// issues them concurrently across independent nodes but never for the
/// same logical name at once.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create or reconcile network policy objects and compute instances
    /// for the given compiled rule set and node list
    ///
    /// Must return one [`NodeProvision`] per input node, in input order.
    /// Partial failure is a first-class outcome, not an error of the call.
    async fn apply(&self, rules: &[CompiledRule], nodes: &[Node]) -> Vec<NodeProvision>;

    /// Publish or update one name-to-address mapping
    ///
    /// The binding is guaranteed resolvable (address present) by the
    /// caller. Safe to retry.
    async fn bind_name(&self, binding: &NameBinding) -> Result<(), ProvisionError>;

    /// Get the name of this provisioner
    fn name(&self) -> &str;
}
