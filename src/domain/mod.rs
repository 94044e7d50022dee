// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Core value objects for the cluster topology model. Everything here is
//! immutable and validated on construction.
//!
//! - [`RoleKind`] / [`Role`] / [`RoleRegistry`] - the fixed role taxonomy
//!   and per-role instance counts
//! - [`Port`] - validated TCP port (1-65535)
//! - [`Hostname`] - DNS-validated hostnames (RFC 1123), used for zones and
//!   logical node names

pub mod hostname;
pub mod port;
pub mod role;

pub use hostname::{Hostname, HostnameError};
pub use port::{Port, PortError};
pub use role::{Role, RoleError, RoleKind, RoleRegistry};
