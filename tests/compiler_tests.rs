// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for matrix compilation
//!
//! These tests verify the complete compile flow: registry + matrix in,
//! stable-ordered permission edges and diagnostics out.

use pretty_assertions::assert_eq;

use cim_cluster_topology::{
    compile, CompiledRule, ConnectionMatrix, ConnectionRule, MatrixError, Port, Role, RoleKind,
    RoleRegistry, SourceSelector,
};

fn port(p: u32) -> Port {
    Port::new(p).unwrap()
}

/// Test: the minimal master/indexer scenario compiles to a single edge
#[test]
fn test_master_to_indexer_scenario() {
    let registry = RoleRegistry::new(vec![
        Role::singleton(RoleKind::MasterNode),
        Role::new(RoleKind::Indexer, 3).unwrap(),
    ])
    .unwrap();
    let matrix = ConnectionMatrix::from_rules(vec![ConnectionRule::member(
        RoleKind::MasterNode,
        RoleKind::Indexer,
        vec![port(8089)],
    )]);

    let compilation = compile(&registry, &matrix).unwrap();

    assert_eq!(
        compilation.rules,
        vec![CompiledRule {
            dest: RoleKind::Indexer,
            selector: SourceSelector::Role(RoleKind::MasterNode),
            port: port(8089),
        }]
    );
    assert_eq!(compilation.warnings, vec![]);
}

/// Test: an internal self-edge compiles to a self selector, and the same
/// edge with member scope is rejected outright
#[test]
fn test_internal_self_edge_versus_member_self_edge() {
    let registry =
        RoleRegistry::new(vec![Role::new(RoleKind::SearchHead, 3).unwrap()]).unwrap();

    let internal = ConnectionMatrix::from_rules(vec![ConnectionRule::internal(
        RoleKind::SearchHead,
        vec![port(9200)],
    )]);
    let compilation = compile(&registry, &internal).unwrap();
    assert_eq!(
        compilation.rules,
        vec![CompiledRule {
            dest: RoleKind::SearchHead,
            selector: SourceSelector::SelfGroup,
            port: port(9200),
        }]
    );

    let member = ConnectionMatrix::from_rules(vec![ConnectionRule::member(
        RoleKind::SearchHead,
        RoleKind::SearchHead,
        vec![port(9200)],
    )]);
    let err = compile(&registry, &member).unwrap_err();
    assert!(matches!(err, MatrixError::SelfEdgeNotInternal { rule: 0, .. }));
}

/// Test: a role-scoped rule shadowed by a public grant on the same
/// (dest, port) is flagged but still present in the output
#[test]
fn test_redundancy_is_detected_but_not_rejected() {
    let registry = RoleRegistry::new(vec![
        Role::new(RoleKind::Indexer, 3).unwrap(),
        Role::new(RoleKind::SearchHead, 3).unwrap(),
    ])
    .unwrap();
    let matrix = ConnectionMatrix::from_rules(vec![
        ConnectionRule::public(RoleKind::Indexer, vec![port(22)]),
        ConnectionRule::member(RoleKind::SearchHead, RoleKind::Indexer, vec![port(22)]),
    ]);

    let compilation = compile(&registry, &matrix).unwrap();

    assert_eq!(
        compilation.rules,
        vec![
            CompiledRule {
                dest: RoleKind::Indexer,
                selector: SourceSelector::Role(RoleKind::SearchHead),
                port: port(22),
            },
            CompiledRule {
                dest: RoleKind::Indexer,
                selector: SourceSelector::AnyIpv4,
                port: port(22),
            },
        ]
    );
    assert_eq!(compilation.warnings.len(), 1);
    assert_eq!(compilation.warnings[0].dest, RoleKind::Indexer);
    assert_eq!(
        compilation.warnings[0].selector,
        SourceSelector::Role(RoleKind::SearchHead)
    );
    assert_eq!(compilation.rules_for(RoleKind::Indexer).count(), 2);
}

/// Test: validation failures surface the offending rule and abort with no
/// partial output
#[test]
fn test_unknown_role_aborts_compilation() {
    let registry =
        RoleRegistry::new(vec![Role::new(RoleKind::Indexer, 3).unwrap()]).unwrap();
    let matrix = ConnectionMatrix::from_rules(vec![
        ConnectionRule::internal(RoleKind::Indexer, vec![port(9100)]),
        ConnectionRule::member(RoleKind::HeavyForwarder, RoleKind::Indexer, vec![port(8089)]),
    ]);

    let err = compile(&registry, &matrix).unwrap_err();
    assert_eq!(
        err,
        MatrixError::UnknownRole {
            rule: 1,
            role: RoleKind::HeavyForwarder
        }
    );
}

/// Test: ports listed on one rule each become their own edge, ordered
/// ascending within the (dest, selector) group
#[test]
fn test_multi_port_rules_fan_out() {
    let registry =
        RoleRegistry::new(vec![Role::new(RoleKind::SearchHead, 3).unwrap()]).unwrap();
    let matrix = ConnectionMatrix::from_rules(vec![ConnectionRule::internal(
        RoleKind::SearchHead,
        vec![port(9200), port(8089), port(8191)],
    )]);

    let compilation = compile(&registry, &matrix).unwrap();
    let ports: Vec<u16> = compilation.rules.iter().map(|r| r.port.get()).collect();
    assert_eq!(ports, vec![8089, 8191, 9200]);
}
