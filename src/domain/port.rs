// Copyright (c) 2025 - Cowboy AI, Inc.
//! TCP Port Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU16;
use thiserror::Error;

/// Port validation error
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    #[error("Port {0} is out of range (1-65535)")]
    OutOfRange(u32),
}

/// Validated TCP port (1..=65535)
///
/// The upper bound is carried by the representation; construction only has
/// to reject zero and anything that does not fit in 16 bits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Port(NonZeroU16);

impl Port {
    /// Create a port, validating the 1..=65535 range
    pub fn new(value: u32) -> Result<Self, PortError> {
        let narrowed = u16::try_from(value).map_err(|_| PortError::OutOfRange(value))?;
        NonZeroU16::new(narrowed)
            .map(Self)
            .ok_or(PortError::OutOfRange(value))
    }

    pub fn get(&self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Port {
    type Error = PortError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
