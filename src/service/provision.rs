// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Service
//!
//! Drives one topology pass end to end:
//!
//! ```text
//! RoleRegistry + ConnectionMatrix
//!        │ compile (pure, all-or-nothing)
//!        ▼
//! CompiledRules + Node plan + pending NameBindings
//!        │ Provisioner::apply (per-node outcomes)
//!        ▼
//! addresses recorded ── Provisioner::bind_name (concurrent per node)
//!        │
//!        ▼
//! TopologyReport (per-node status, never one opaque failure)
//! ```
//!
//! # Transaction Semantics
//!
//! Compilation and name planning are all-or-nothing; nothing is sent to the
//! provisioner if either fails. Past that point there is no rollback:
//! partially provisioned state is reported per node, and nodes that
//! succeeded keep their addresses and bindings even when siblings fail.
//!
//! Bind calls run concurrently across nodes. Each logical name is bound at
//! most once per pass, and resolver mutations happen serially after the
//! awaits, so same-name writes are never in flight together.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::compiler::{compile, Compilation, RedundancyWarning};
use crate::domain::{Hostname, RoleRegistry};
use crate::matrix::{ConnectionMatrix, MatrixError};
use crate::naming::{NameBinding, NamingError, NamingResolver, NodeId};
use crate::provisioner::{ProvisionError, Provisioner};

/// Errors that abort a provisioning pass before anything is applied
///
/// Per-node provisioning failures are not service errors; they are carried
/// in the [`TopologyReport`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Matrix/registry validation failed during compilation
    #[error("Topology compilation failed: {0}")]
    Compile(#[from] MatrixError),

    /// Name planning failed
    #[error("Name planning failed: {0}")]
    Naming(#[from] NamingError),
}

/// Final state of one node after a provisioning pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Instance created and logical name published
    Bound { address: IpAddr, name: Hostname },
    /// Instance created but the name record could not be published
    BindFailed {
        address: IpAddr,
        error: ProvisionError,
    },
    /// The provisioner could not create the instance
    ProvisionFailed { error: ProvisionError },
}

/// Per-node entry of a topology report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    pub node: NodeId,
    pub status: NodeStatus,
}

/// Outcome of one provisioning pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyReport {
    pub correlation_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub rule_count: usize,
    pub warnings: Vec<RedundancyWarning>,
    pub nodes: Vec<NodeReport>,
}

impl TopologyReport {
    /// Nodes fully provisioned and bound
    pub fn bound(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| matches!(n.status, NodeStatus::Bound { .. }))
    }

    /// Nodes that failed provisioning or binding
    pub fn failed(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes
            .iter()
            .filter(|n| !matches!(n.status, NodeStatus::Bound { .. }))
    }

    pub fn is_fully_bound(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Application service driving compile → apply → bind passes
pub struct ProvisioningService<P: Provisioner> {
    provisioner: P,
    resolver: NamingResolver,
}

impl<P: Provisioner> ProvisioningService<P> {
    pub fn new(provisioner: P, zone: Hostname) -> Self {
        Self {
            provisioner,
            resolver: NamingResolver::new(zone),
        }
    }

    /// Current name bindings
    pub fn resolver(&self) -> &NamingResolver {
        &self.resolver
    }

    /// The underlying provisioner
    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Compile without provisioning
    ///
    /// Exposed so callers can inspect the rule set and warnings a matrix
    /// produces before committing to a pass.
    pub fn plan(
        &self,
        registry: &RoleRegistry,
        matrix: &ConnectionMatrix,
    ) -> Result<Compilation, ServiceError> {
        Ok(compile(registry, matrix)?)
    }

    /// Run one full provisioning pass
    pub async fn provision(
        &mut self,
        registry: &RoleRegistry,
        matrix: &ConnectionMatrix,
    ) -> Result<TopologyReport, ServiceError> {
        let correlation_id = Uuid::now_v7();
        let started_at = Utc::now();

        let compilation = compile(registry, matrix)?;
        info!(
            rules = compilation.rules.len(),
            warnings = compilation.warnings.len(),
            %correlation_id,
            "topology compiled"
        );

        let nodes = self.resolver.plan(registry)?;
        debug!(nodes = nodes.len(), zone = %self.resolver.zone(), "node plan ready");

        let provisions = self
            .provisioner
            .apply(&compilation.rules, &nodes)
            .await;

        // Record addresses serially, in provisioner-reported order. The
        // binding returned by the resolver is captured here so the bind
        // stage works from a consistent snapshot.
        let mut provisioned: Vec<(IpAddr, NameBinding)> = Vec::new();
        let mut failures: Vec<(NodeId, ProvisionError)> = Vec::new();
        for provision in provisions {
            match provision.outcome {
                Ok(address) => {
                    let binding = self.resolver.record_address(provision.node, address)?;
                    provisioned.push((address, binding.clone()));
                }
                Err(error) => {
                    warn!(node = %provision.node, %error, "node provisioning failed");
                    failures.push((provision.node, error));
                }
            }
        }

        // Bind names concurrently; each logical name appears at most once
        // per pass, so no two in-flight binds share a name.
        let bind_outcomes = join_all(provisioned.iter().map(|(_, binding)| {
            let provisioner = &self.provisioner;
            async move { provisioner.bind_name(binding).await }
        }))
        .await;

        let mut reports: Vec<NodeReport> = Vec::with_capacity(nodes.len());
        for ((address, binding), outcome) in provisioned.iter().zip(bind_outcomes) {
            let status = match outcome {
                Ok(()) => NodeStatus::Bound {
                    address: *address,
                    name: binding.name.clone(),
                },
                Err(error) => {
                    warn!(node = %binding.node, %error, "name binding failed");
                    NodeStatus::BindFailed {
                        address: *address,
                        error,
                    }
                }
            };
            reports.push(NodeReport {
                node: binding.node,
                status,
            });
        }
        for (node, error) in failures {
            reports.push(NodeReport {
                node,
                status: NodeStatus::ProvisionFailed { error },
            });
        }
        reports.sort_by_key(|r| r.node);

        let report = TopologyReport {
            correlation_id,
            started_at,
            completed_at: Utc::now(),
            rule_count: compilation.rules.len(),
            warnings: compilation.warnings,
            nodes: reports,
        };
        info!(
            bound = report.bound().count(),
            failed = report.failed().count(),
            %correlation_id,
            "provisioning pass complete"
        );
        Ok(report)
    }
}
