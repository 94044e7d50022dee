// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Topology Provisioning
//!
//! Coordinates the pure core (compiler, naming resolver) with the external
//! provisioner collaborator and reports per-node outcomes.

pub mod provision;

pub use provision::{NodeReport, NodeStatus, ProvisioningService, ServiceError, TopologyReport};
