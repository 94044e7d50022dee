// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Compiler - Matrix Expansion and Validation
//!
//! Pure, deterministic compilation of the connection matrix into flattened
//! permission edges. No side effects beyond diagnostics: the same registry
//! and matrix always produce byte-identical output, which is what lets a
//! provisioner treat repeated applies as idempotent.
//!
//! # Algorithm
//!
//! 1. Validate the matrix against the registry (all-or-nothing; no partial
//!    output on failure).
//! 2. Expand each rule's scope into a source selector and emit one
//!    `(dest, selector, port)` triple per listed port.
//! 3. Deduplicate exact triples via set semantics.
//! 4. Flag redundancy: a role- or self-scoped triple whose `(dest, port)`
//!    is already granted to any-ipv4 is shadowed. Shadowed triples stay in
//!    the output; the warning is a diagnostic, not a rejection.
//! 5. Emit in stable order: dest role, then selector, then port ascending.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

use crate::domain::{Port, RoleKind, RoleRegistry};
use crate::matrix::{ConnectionMatrix, ConnectionScope, MatrixError};

/// Allowed traffic source of a compiled rule
///
/// The derived `Ord` (role selectors first, then `self`, then `any-ipv4`)
/// is part of the output contract: it fixes the emission order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SourceSelector {
    /// Any instance of the given role
    Role(RoleKind),
    /// Any member of the destination's own role group
    SelfGroup,
    /// Any IPv4 origin
    AnyIpv4,
}

impl fmt::Display for SourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role(kind) => write!(f, "{}", kind),
            Self::SelfGroup => write!(f, "self"),
            Self::AnyIpv4 => write!(f, "any-ipv4"),
        }
    }
}

/// Flattened, deduplicated permission edge
///
/// Field order matters: the derived `Ord` groups by dest role, then
/// selector, then port, which is the stable output ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CompiledRule {
    pub dest: RoleKind,
    pub selector: SourceSelector,
    pub port: Port,
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allow {} -> {}:{}", self.selector, self.dest, self.port)
    }
}

/// Non-fatal diagnostic: a rule shadowed by a broader grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundancyWarning {
    pub dest: RoleKind,
    pub selector: SourceSelector,
    pub port: Port,
}

impl fmt::Display for RedundancyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule ({} -> {}:{}) is shadowed by an any-ipv4 grant on the same port",
            self.selector, self.dest, self.port
        )
    }
}

/// Compiler output: stable-ordered rules plus redundancy diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    pub rules: Vec<CompiledRule>,
    pub warnings: Vec<RedundancyWarning>,
}

impl Compilation {
    /// Rules targeting the given destination role
    pub fn rules_for(&self, dest: RoleKind) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(move |r| r.dest == dest)
    }
}

/// Compile the connection matrix into flattened permission edges
///
/// Deterministic and side-effect free; fails without partial output if the
/// matrix does not validate against the registry.
pub fn compile(
    registry: &RoleRegistry,
    matrix: &ConnectionMatrix,
) -> Result<Compilation, MatrixError> {
    matrix.validate(registry)?;

    let mut set: BTreeSet<CompiledRule> = BTreeSet::new();
    for rule in matrix.rules() {
        let selector = match rule.scope {
            ConnectionScope::Member => SourceSelector::Role(rule.source),
            ConnectionScope::Internal => SourceSelector::SelfGroup,
            ConnectionScope::Public => SourceSelector::AnyIpv4,
        };
        for &port in &rule.ports {
            set.insert(CompiledRule {
                dest: rule.dest,
                selector,
                port,
            });
        }
    }

    let mut warnings = Vec::new();
    for rule in &set {
        if rule.selector == SourceSelector::AnyIpv4 {
            continue;
        }
        let public_twin = CompiledRule {
            dest: rule.dest,
            selector: SourceSelector::AnyIpv4,
            port: rule.port,
        };
        if set.contains(&public_twin) {
            let warning = RedundancyWarning {
                dest: rule.dest,
                selector: rule.selector,
                port: rule.port,
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    Ok(Compilation {
        rules: set.into_iter().collect(),
        warnings,
    })
}

/// Shorthand for the set of distinct (dest, port) pairs a matrix implies
///
/// Used by completeness checks: every pair here must be covered by at least
/// one compiled rule.
pub fn implied_pairs(matrix: &ConnectionMatrix) -> BTreeSet<(RoleKind, Port)> {
    matrix
        .rules()
        .iter()
        .flat_map(|rule| rule.ports.iter().map(move |&p| (rule.dest, p)))
        .collect()
}
