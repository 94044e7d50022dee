// Copyright (c) 2025 - Cowboy AI, Inc.

//! Provisioner implementations
//!
//! This module contains concrete implementations of the [`Provisioner`]
//! contract. Cloud-backed adapters live with the deployment glue that owns
//! their credentials; the in-memory adapter here is the deterministic
//! stand-in used by tests and dry runs.
//!
//! [`Provisioner`]: crate::provisioner::Provisioner

pub mod memory;

pub use memory::MemoryProvisioner;
