// Copyright (c) 2025 - Cowboy AI, Inc.
//! Naming Resolver - Stable Logical Names for Node Instances
//!
//! Enumerates the concrete node instances a role registry implies and gives
//! each a stable logical name under a DNS zone, independent of whatever
//! ephemeral identifier the provisioner assigns. Enumeration is
//! deterministic: role kinds in canonical order, ordinals 1..=cardinality,
//! so re-running assignment for an unchanged registry reproduces identical
//! names.
//!
//! Name shape: `<short-label><ordinal>.<zone>`, with the ordinal omitted
//! for single-instance roles (`lm.<zone>`, not `lm1.<zone>`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

use crate::domain::{Hostname, HostnameError, RoleKind, RoleRegistry};

/// Naming errors
///
/// A name conflict is structurally impossible under deterministic ordinal
/// assignment; seeing one means a registry invariant was violated upstream,
/// so it is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("Logical name {name} resolves to both {first} and {second}")]
    NameConflict {
        name: Hostname,
        first: NodeId,
        second: NodeId,
    },

    #[error("No binding exists for node {0}")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Hostname(#[from] HostnameError),
}

/// Identity of one node instance: role kind plus 1-based ordinal
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId {
    pub kind: RoleKind,
    pub ordinal: u32,
}

impl NodeId {
    pub fn new(kind: RoleKind, ordinal: u32) -> Self {
        Self { kind, ordinal }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.ordinal)
    }
}

/// One concrete instance of a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// DNS label for this node (`sh2`; ordinal omitted for singletons)
    pub label: String,
    /// Populated by the provisioner after creation
    pub address: Option<IpAddr>,
}

impl Node {
    pub fn role(&self) -> RoleKind {
        self.id.kind
    }
}

/// Mapping from a stable logical name to a node's current address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameBinding {
    pub name: Hostname,
    pub node: NodeId,
    pub address: Option<IpAddr>,
    pub bound_at: Option<DateTime<Utc>>,
}

impl NameBinding {
    /// Whether the binding has an address and can be published
    pub fn is_resolvable(&self) -> bool {
        self.address.is_some()
    }
}

/// Deterministically enumerate the nodes a registry implies
///
/// Ordering: role kinds in canonical order, then ordinal ascending.
pub fn enumerate_nodes(registry: &RoleRegistry) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(registry.node_count() as usize);
    for role in registry.iter() {
        for ordinal in 1..=role.cardinality {
            nodes.push(Node {
                id: NodeId::new(role.kind, ordinal),
                label: node_label(role.kind, ordinal, role.cardinality),
                address: None,
            });
        }
    }
    nodes
}

/// DNS label for a node: short role label plus ordinal, ordinal omitted
/// when the role runs a single instance
pub fn node_label(kind: RoleKind, ordinal: u32, cardinality: u32) -> String {
    if cardinality == 1 {
        kind.short_label().to_string()
    } else {
        format!("{}{}", kind.short_label(), ordinal)
    }
}

/// Owns the name bindings for a topology
///
/// Planning (re)derives the full binding set from a registry; address
/// recording touches exactly one binding and never disturbs the others.
#[derive(Debug, Clone)]
pub struct NamingResolver {
    zone: Hostname,
    bindings: BTreeMap<NodeId, NameBinding>,
}

impl NamingResolver {
    pub fn new(zone: Hostname) -> Self {
        Self {
            zone,
            bindings: BTreeMap::new(),
        }
    }

    pub fn zone(&self) -> &Hostname {
        &self.zone
    }

    /// Derive bindings for every node the registry implies
    ///
    /// Idempotent for an unchanged registry: names are recomputed to the
    /// same values and already-recorded addresses are preserved. Returns
    /// the enumerated nodes for the provisioning step.
    pub fn plan(&mut self, registry: &RoleRegistry) -> Result<Vec<Node>, NamingError> {
        let nodes = enumerate_nodes(registry);

        let mut fresh: BTreeMap<NodeId, NameBinding> = BTreeMap::new();
        let mut by_name: BTreeMap<Hostname, NodeId> = BTreeMap::new();
        for node in &nodes {
            let name = self.zone.child(&node.label)?;
            if let Some(&first) = by_name.get(&name) {
                return Err(NamingError::NameConflict {
                    name,
                    first,
                    second: node.id,
                });
            }
            by_name.insert(name.clone(), node.id);

            let previous = self.bindings.get(&node.id);
            fresh.insert(
                node.id,
                NameBinding {
                    name,
                    node: node.id,
                    address: previous.and_then(|b| b.address),
                    bound_at: previous.and_then(|b| b.bound_at),
                },
            );
        }

        self.bindings = fresh;
        Ok(nodes)
    }

    /// Record (or overwrite) the address for one node's binding
    ///
    /// Other bindings are never touched.
    pub fn record_address(
        &mut self,
        node: NodeId,
        address: IpAddr,
    ) -> Result<&NameBinding, NamingError> {
        let binding = self
            .bindings
            .get_mut(&node)
            .ok_or(NamingError::UnknownNode(node))?;
        binding.address = Some(address);
        binding.bound_at = Some(Utc::now());
        Ok(binding)
    }

    /// Binding for one node
    pub fn binding(&self, node: NodeId) -> Option<&NameBinding> {
        self.bindings.get(&node)
    }

    /// All bindings in deterministic (node id) order
    pub fn bindings(&self) -> impl Iterator<Item = &NameBinding> {
        self.bindings.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn zone() -> Hostname {
        Hostname::new("cluster.example.com").unwrap()
    }

    fn registry() -> RoleRegistry {
        RoleRegistry::new(vec![
            Role::new(RoleKind::SearchHead, 3).unwrap(),
            Role::singleton(RoleKind::LicenseMaster),
        ])
        .unwrap()
    }

    #[test]
    fn test_names_are_stable_and_ordinal_free_for_singletons() {
        let mut resolver = NamingResolver::new(zone());
        resolver.plan(&registry()).unwrap();

        let names: Vec<String> = resolver.bindings().map(|b| b.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "sh1.cluster.example.com",
                "sh2.cluster.example.com",
                "sh3.cluster.example.com",
                "lm.cluster.example.com",
            ]
        );
    }

    #[test]
    fn test_replanning_reproduces_identical_names() {
        let mut resolver = NamingResolver::new(zone());
        resolver.plan(&registry()).unwrap();
        let first: Vec<NameBinding> = resolver.bindings().cloned().collect();

        resolver.plan(&registry()).unwrap();
        let second: Vec<NameBinding> = resolver.bindings().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_address_touches_exactly_one_binding() {
        let mut resolver = NamingResolver::new(zone());
        resolver.plan(&registry()).unwrap();

        let target = NodeId::new(RoleKind::SearchHead, 2);
        let addr: IpAddr = "10.0.0.7".parse().unwrap();
        resolver.record_address(target, addr).unwrap();

        for binding in resolver.bindings() {
            if binding.node == target {
                assert_eq!(binding.address, Some(addr));
                assert!(binding.bound_at.is_some());
            } else {
                assert_eq!(binding.address, None);
                assert!(binding.bound_at.is_none());
            }
        }
    }

    #[test]
    fn test_replanning_preserves_recorded_addresses() {
        let mut resolver = NamingResolver::new(zone());
        resolver.plan(&registry()).unwrap();

        let target = NodeId::new(RoleKind::LicenseMaster, 1);
        let addr: IpAddr = "10.0.0.4".parse().unwrap();
        resolver.record_address(target, addr).unwrap();

        resolver.plan(&registry()).unwrap();
        assert_eq!(resolver.binding(target).unwrap().address, Some(addr));
    }

    #[test]
    fn test_recording_for_unplanned_node_fails() {
        let mut resolver = NamingResolver::new(zone());
        resolver.plan(&registry()).unwrap();

        let stranger = NodeId::new(RoleKind::Indexer, 1);
        let err = resolver
            .record_address(stranger, "10.0.0.9".parse().unwrap())
            .unwrap_err();
        assert_eq!(err, NamingError::UnknownNode(stranger));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(
            NodeId::new(RoleKind::SearchHead, 2).to_string(),
            "search-head#2"
        );
    }
}
