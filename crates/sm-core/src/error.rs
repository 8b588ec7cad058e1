use std::fmt;

use crate::emotion::RegionId;
use crate::entry::{EntryId, OwnerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// No emotion region with this name.
    RegionNotFound(String),
    /// No emotion region with this id.
    RegionIdNotFound(RegionId),
    EntryNotFound(EntryId),
    /// The operation is part of the contract but has no implementation yet.
    CapabilityNotImplemented {
        operation: &'static str,
        owner_id: OwnerId,
    },
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::RegionNotFound(name) => write!(f, "unknown emotion region: {name}"),
            CoordinateError::RegionIdNotFound(id) => write!(f, "unknown emotion region id: {id}"),
            CoordinateError::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            CoordinateError::CapabilityNotImplemented {
                operation,
                owner_id,
            } => write!(f, "{operation} is not implemented (owner {owner_id})"),
        }
    }
}

impl std::error::Error for CoordinateError {}

pub type Result<T> = std::result::Result<T, CoordinateError>;
