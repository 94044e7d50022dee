// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Compilation and Naming
//!
//! These properties must hold for every valid (registry, matrix) pair, not
//! just the reference deployment: the compiler is a pure function with
//! stable output, its output carries no duplicate triples, and it covers
//! everything the matrix implies.

use proptest::prelude::*;

use cim_cluster_topology::compiler::implied_pairs;
use cim_cluster_topology::{
    compile, ConnectionMatrix, ConnectionRule, Hostname, NamingResolver, Port, Role, RoleKind,
    RoleRegistry,
};

// ============================================================================
// Strategies
// ============================================================================

/// Generate a registry carrying a non-empty subset of the role taxonomy
/// with small cardinalities
fn registry_strategy() -> impl Strategy<Value = RoleRegistry> {
    prop::collection::vec(0u32..=3, RoleKind::ALL.len())
        .prop_filter("at least one role present", |cards| {
            cards.iter().any(|&c| c > 0)
        })
        .prop_map(|cards| {
            let roles: Vec<Role> = RoleKind::ALL
                .iter()
                .zip(cards)
                .filter(|(_, c)| *c > 0)
                .map(|(&kind, cardinality)| Role::new(kind, cardinality).unwrap())
                .collect();
            RoleRegistry::new(roles).unwrap()
        })
}

/// Generate a valid matrix over the given role kinds
///
/// Scope constraints are repaired rather than filtered: a member rule that
/// would be a self-edge becomes internal, so every generated matrix
/// validates.
fn matrix_strategy(kinds: Vec<RoleKind>) -> impl Strategy<Value = ConnectionMatrix> {
    let n = kinds.len();
    prop::collection::vec(
        (
            0..n,
            0..n,
            prop::collection::vec(1u32..=65535, 1..4),
            0usize..3,
        ),
        0..12,
    )
    .prop_map(move |entries| {
        let rules = entries
            .into_iter()
            .map(|(s, d, raw_ports, scope)| {
                let ports: Vec<Port> =
                    raw_ports.into_iter().map(|p| Port::new(p).unwrap()).collect();
                let source = kinds[s];
                let dest = kinds[d];
                match scope {
                    0 => ConnectionRule::internal(source, ports),
                    1 => ConnectionRule::public(dest, ports),
                    _ if source != dest => ConnectionRule::member(source, dest, ports),
                    _ => ConnectionRule::internal(source, ports),
                }
            })
            .collect();
        ConnectionMatrix::from_rules(rules)
    })
}

/// Generate a consistent (registry, matrix) pair
fn topology_strategy() -> impl Strategy<Value = (RoleRegistry, ConnectionMatrix)> {
    registry_strategy().prop_flat_map(|registry| {
        let kinds: Vec<RoleKind> = registry.iter().map(|r| r.kind).collect();
        matrix_strategy(kinds).prop_map(move |matrix| (registry.clone(), matrix))
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: compilation is deterministic
    ///
    /// The same registry and matrix must always produce byte-identical
    /// output, including serialized form.
    #[test]
    fn prop_compilation_is_deterministic((registry, matrix) in topology_strategy()) {
        let first = compile(&registry, &matrix).unwrap();
        let second = compile(&registry, &matrix).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Property: the output carries no duplicate (dest, selector, port)
    /// triples and is emitted in sorted order
    #[test]
    fn prop_output_is_sorted_and_duplicate_free((registry, matrix) in topology_strategy()) {
        let compilation = compile(&registry, &matrix).unwrap();
        for pair in compilation.rules.windows(2) {
            prop_assert!(pair[0] < pair[1], "unsorted or duplicate: {} / {}", pair[0], pair[1]);
        }
    }

    /// Property: every (dest, port) pair the matrix implies is covered by
    /// at least one compiled rule
    #[test]
    fn prop_compilation_is_complete((registry, matrix) in topology_strategy()) {
        let compilation = compile(&registry, &matrix).unwrap();
        for (dest, port) in implied_pairs(&matrix) {
            prop_assert!(
                compilation.rules.iter().any(|r| r.dest == dest && r.port == port),
                "no compiled rule covers ({}, {})", dest, port
            );
        }
    }

    /// Property: redundancy warnings never make compilation fail, and every
    /// flagged triple is still present in the output
    #[test]
    fn prop_warnings_do_not_remove_rules((registry, matrix) in topology_strategy()) {
        let compilation = compile(&registry, &matrix).unwrap();
        for warning in &compilation.warnings {
            prop_assert!(compilation.rules.iter().any(|r| r.dest == warning.dest
                && r.selector == warning.selector
                && r.port == warning.port));
        }
    }

    /// Property: name assignment is deterministic for an unchanged registry
    #[test]
    fn prop_naming_is_deterministic(registry in registry_strategy()) {
        let zone = Hostname::new("cluster.example.com").unwrap();

        let mut first = NamingResolver::new(zone.clone());
        first.plan(&registry).unwrap();
        let mut second = NamingResolver::new(zone);
        second.plan(&registry).unwrap();

        let first_names: Vec<String> = first.bindings().map(|b| b.name.to_string()).collect();
        let second_names: Vec<String> = second.bindings().map(|b| b.name.to_string()).collect();
        prop_assert_eq!(&first_names, &second_names);

        // One binding per node, names unique across the topology.
        prop_assert_eq!(first_names.len(), registry.node_count() as usize);
        let mut deduped = first_names.clone();
        deduped.sort();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), first_names.len());
    }
}
