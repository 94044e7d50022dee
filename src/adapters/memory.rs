// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Provisioner
//!
//! Deterministic [`Provisioner`] implementation backed by process memory.
//! Addresses are handed out sequentially from a configurable base, a node
//! keeps its address across repeated applies, and name records overwrite
//! in place — the same reconciliation semantics the contract demands from
//! a real cloud adapter, observable without one.
//!
//! Per-node failures can be injected for both `apply` and `bind_name`,
//! which is how the partial-failure paths are exercised in tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::net::{IpAddr, Ipv4Addr};
use tokio::sync::Mutex;
use tracing::debug;

use crate::compiler::CompiledRule;
use crate::domain::Hostname;
use crate::naming::{NameBinding, Node, NodeId};
use crate::provisioner::{NodeProvision, ProvisionError, Provisioner};

#[derive(Debug, Default)]
struct MemoryState {
    assigned: BTreeMap<NodeId, IpAddr>,
    records: BTreeMap<Hostname, IpAddr>,
    applied_rules: Vec<CompiledRule>,
    apply_calls: usize,
    next_host: u32,
}

/// Deterministic in-memory provisioner
pub struct MemoryProvisioner {
    base: Ipv4Addr,
    fail_apply: BTreeSet<NodeId>,
    fail_bind: BTreeSet<NodeId>,
    state: Mutex<MemoryState>,
}

impl MemoryProvisioner {
    /// Provisioner allocating from 10.0.0.0
    pub fn new() -> Self {
        Self::with_base(Ipv4Addr::new(10, 0, 0, 0))
    }

    /// Provisioner allocating sequential host addresses above `base`
    pub fn with_base(base: Ipv4Addr) -> Self {
        Self {
            base,
            fail_apply: BTreeSet::new(),
            fail_bind: BTreeSet::new(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Make `apply` fail for the given node
    pub fn fail_apply_for(mut self, node: NodeId) -> Self {
        self.fail_apply.insert(node);
        self
    }

    /// Make `bind_name` fail for the given node
    pub fn fail_bind_for(mut self, node: NodeId) -> Self {
        self.fail_bind.insert(node);
        self
    }

    /// Snapshot of the published name records
    pub async fn records(&self) -> BTreeMap<Hostname, IpAddr> {
        self.state.lock().await.records.clone()
    }

    /// Snapshot of the last applied rule set
    pub async fn applied_rules(&self) -> Vec<CompiledRule> {
        self.state.lock().await.applied_rules.clone()
    }

    /// Number of times `apply` has been called
    pub async fn apply_calls(&self) -> usize {
        self.state.lock().await.apply_calls
    }

    fn allocate(&self, state: &mut MemoryState) -> IpAddr {
        state.next_host += 1;
        let addr = u32::from(self.base) + state.next_host;
        IpAddr::V4(Ipv4Addr::from(addr))
    }
}

impl Default for MemoryProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provisioner for MemoryProvisioner {
    async fn apply(&self, rules: &[CompiledRule], nodes: &[Node]) -> Vec<NodeProvision> {
        let mut state = self.state.lock().await;
        state.apply_calls += 1;
        // Reconcile, don't append: re-applying the same compiled input
        // leaves the rule set unchanged.
        state.applied_rules = rules.to_vec();

        let mut outcomes = Vec::with_capacity(nodes.len());
        for node in nodes {
            if self.fail_apply.contains(&node.id) {
                outcomes.push(NodeProvision::failed(node.id, "injected apply failure"));
                continue;
            }
            let address = match state.assigned.get(&node.id) {
                Some(&existing) => existing,
                None => {
                    let fresh = self.allocate(&mut state);
                    state.assigned.insert(node.id, fresh);
                    fresh
                }
            };
            debug!(node = %node.id, %address, "memory provisioner assigned address");
            outcomes.push(NodeProvision::provisioned(node.id, address));
        }
        outcomes
    }

    async fn bind_name(&self, binding: &NameBinding) -> Result<(), ProvisionError> {
        if self.fail_bind.contains(&binding.node) {
            return Err(ProvisionError::new(binding.node, "injected bind failure"));
        }
        let address = binding
            .address
            .ok_or_else(|| ProvisionError::new(binding.node, "binding carries no address"))?;

        let mut state = self.state.lock().await;
        state.records.insert(binding.name.clone(), address);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
