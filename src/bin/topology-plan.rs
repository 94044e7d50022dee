// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Plan
//!
//! Compiles a topology descriptor and runs a dry provisioning pass against
//! the in-memory provisioner, logging the rule set, redundancy warnings,
//! and the resulting name bindings.
//!
//! Run with: cargo run --bin topology-plan
//!
//! Set TOPOLOGY_CONFIG to a JSON descriptor path to plan something other
//! than the built-in reference deployment.

use anyhow::{Context, Result};
use cim_cluster_topology::{
    adapters::MemoryProvisioner, ProvisioningService, TopologyConfig,
};
use tracing::{info, warn};

fn load_config() -> Result<TopologyConfig> {
    match std::env::var("TOPOLOGY_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading topology config from {path}"))?;
            TopologyConfig::from_json(&json)
                .with_context(|| format!("parsing topology config from {path}"))
        }
        Err(_) => Ok(TopologyConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = load_config()?;
    let resolved = config.resolve().context("resolving topology descriptor")?;
    info!(
        zone = %resolved.zone,
        roles = resolved.registry.len(),
        nodes = resolved.registry.node_count(),
        "topology descriptor loaded"
    );

    let mut service = ProvisioningService::new(MemoryProvisioner::new(), resolved.zone.clone());

    let compilation = service.plan(&resolved.registry, &resolved.matrix)?;
    info!(rules = compilation.rules.len(), "compiled rule set:");
    for rule in &compilation.rules {
        info!("  {rule}");
    }
    for warning in &compilation.warnings {
        warn!("  {warning}");
    }

    let report = service
        .provision(&resolved.registry, &resolved.matrix)
        .await?;
    info!(
        bound = report.bound().count(),
        failed = report.failed().count(),
        correlation_id = %report.correlation_id,
        "dry provisioning pass complete"
    );
    for binding in service.resolver().bindings() {
        match binding.address {
            Some(address) => info!("  {} -> {}", binding.name, address),
            None => warn!("  {} unbound", binding.name),
        }
    }

    Ok(())
}
