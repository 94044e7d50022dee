//! Cluster network topology compiler for the Composable Information Machine
//!
//! This crate models the network topology of a fixed-role, multi-tier
//! search/indexing cluster as data and compiles it into the minimal set of
//! permission edges and name bindings an external provisioner needs.
//!
//! # Components
//!
//! - [`domain`] - validated value objects: role taxonomy and registry,
//!   ports, hostnames
//! - [`matrix`] - the declarative connection matrix (who reaches whom, on
//!   which ports, from which scope)
//! - [`compiler`] - pure, deterministic expansion of the matrix into
//!   deduplicated `(dest, selector, port)` permission edges
//! - [`naming`] - stable logical names for node instances under a DNS zone
//! - [`provisioner`] - the contract the external provisioning collaborator
//!   must satisfy
//! - [`service`] - the provisioning pass: compile → apply → bind, with
//!   per-node outcome reporting
//! - [`adapters`] - concrete provisioner implementations
//! - [`config`] - serde descriptors for registry, matrix, and zone
//! - [`reference`] - the built-in reference search-cluster deployment
//!
//! # Data Flow
//!
//! ```text
//! RoleRegistry + ConnectionMatrix ──compile──> [CompiledRule]
//!        │                                          │
//!        └──plan──> [Node] + [NameBinding] ──apply/bind──> Provisioner
//! ```

pub mod adapters;
pub mod compiler;
pub mod config;
pub mod domain;
pub mod errors;
pub mod matrix;
pub mod naming;
pub mod provisioner;
pub mod reference;
pub mod service;

// Re-export commonly used types
pub use compiler::{compile, Compilation, CompiledRule, RedundancyWarning, SourceSelector};
pub use config::{ConfigError, ResolvedTopology, TopologyConfig};
pub use domain::{Hostname, Port, Role, RoleKind, RoleRegistry};
pub use errors::{TopologyError, TopologyResult};
pub use matrix::{ConnectionMatrix, ConnectionRule, ConnectionScope, MatrixError};
pub use naming::{enumerate_nodes, NameBinding, NamingError, NamingResolver, Node, NodeId};
pub use provisioner::{NodeProvision, ProvisionError, Provisioner};
pub use service::{NodeReport, NodeStatus, ProvisioningService, ServiceError, TopologyReport};
