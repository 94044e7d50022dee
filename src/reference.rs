// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reference Deployment - Multi-Tier Search Cluster
//!
//! The built-in descriptor for the fixed-role search/indexing cluster this
//! crate was written around: one master node, one deployer, three search
//! heads, three indexers, one heavy forwarder, one license master, and one
//! monitoring console. The connection table exercises every scope variant.
//!
//! Management traffic (8089) dominates the matrix; the indexer and search
//! head tiers additionally need their intra-group replication ports, and
//! every role exposes the web UI and SSH to any IPv4 origin. The public
//! breadth is deliberate data, not policy: it is written out per role so
//! the compiler's redundancy pass can see and report what it shadows.

use crate::config::{ConnectionEntry, RoleEntry, TopologyConfig};
use crate::matrix::ConnectionScope;

/// Management/REST port used for nearly all cross-role traffic
pub const MANAGEMENT: u32 = 8089;
/// Indexer-to-indexer replication port
pub const INDEX_REPLICATION: u32 = 9100;
/// Search-head-to-search-head replication port
pub const SEARCH_REPLICATION: u32 = 9200;
/// Search head KV store port
pub const KV_STORE: u32 = 8191;
/// Web UI port, exposed publicly
pub const WEB_UI: u32 = 8000;
/// SSH, exposed publicly
pub const SSH: u32 = 22;

/// Zone the reference deployment publishes names under
pub const DEFAULT_ZONE: &str = "cluster.example.com";

fn member(source: &str, dest: &str, ports: &[u32]) -> ConnectionEntry {
    ConnectionEntry {
        source: source.into(),
        dest: dest.into(),
        ports: ports.to_vec(),
        scope: ConnectionScope::Member,
    }
}

fn internal(role: &str, ports: &[u32]) -> ConnectionEntry {
    ConnectionEntry {
        source: role.into(),
        dest: role.into(),
        ports: ports.to_vec(),
        scope: ConnectionScope::Internal,
    }
}

fn public(dest: &str, ports: &[u32]) -> ConnectionEntry {
    ConnectionEntry {
        source: dest.into(),
        dest: dest.into(),
        ports: ports.to_vec(),
        scope: ConnectionScope::Public,
    }
}

/// The reference cluster descriptor
pub fn reference_config() -> TopologyConfig {
    let roles = [
        ("master-node", 1),
        ("deployer", 1),
        ("search-head", 3),
        ("indexer", 3),
        ("heavy-forwarder", 1),
        ("license-master", 1),
        ("monitoring-console", 1),
    ]
    .into_iter()
    .map(|(kind, cardinality)| RoleEntry {
        kind: kind.into(),
        cardinality,
    })
    .collect();

    let mut connections = vec![
        // Indexer tier
        internal("indexer", &[INDEX_REPLICATION, MANAGEMENT]),
        member("indexer", "master-node", &[MANAGEMENT]),
        member("indexer", "license-master", &[MANAGEMENT]),
        // Search head tier
        internal("search-head", &[SEARCH_REPLICATION, MANAGEMENT, KV_STORE]),
        member("search-head", "master-node", &[MANAGEMENT]),
        member("search-head", "license-master", &[MANAGEMENT]),
        member("search-head", "indexer", &[MANAGEMENT]),
        member("search-head", "deployer", &[MANAGEMENT]),
        // Master node
        member("master-node", "indexer", &[MANAGEMENT]),
        member("master-node", "license-master", &[MANAGEMENT]),
        // Deployer
        member("deployer", "license-master", &[MANAGEMENT]),
        member("deployer", "search-head", &[MANAGEMENT]),
        // Heavy forwarder
        member("heavy-forwarder", "indexer", &[MANAGEMENT]),
        member("heavy-forwarder", "license-master", &[MANAGEMENT]),
        // Monitoring console reaches every other role
        member("monitoring-console", "search-head", &[MANAGEMENT]),
        member("monitoring-console", "license-master", &[MANAGEMENT]),
        member("monitoring-console", "master-node", &[MANAGEMENT]),
        member("monitoring-console", "indexer", &[MANAGEMENT]),
        member("monitoring-console", "deployer", &[MANAGEMENT]),
        member("monitoring-console", "heavy-forwarder", &[MANAGEMENT]),
    ];

    // Web UI and SSH to the world, spelled out per role.
    for role in [
        "search-head",
        "license-master",
        "master-node",
        "indexer",
        "deployer",
        "heavy-forwarder",
        "monitoring-console",
    ] {
        connections.push(public(role, &[WEB_UI]));
        connections.push(public(role, &[SSH]));
    }

    TopologyConfig {
        zone: DEFAULT_ZONE.into(),
        roles,
        connections,
    }
}
