use thiserror::Error;

use crate::type_info::TypeInfo;

/// Error returned by [`any_cast`](crate::any_cast) and friends
/// when the requested type is not the one stored in the container.
///
/// An empty container reports [`TypeInfo::empty`] as its stored type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("failed conversion using any_cast: stored type {stored}, trying to cast to {target}")]
pub struct BadAnyCast {
    stored: TypeInfo,
    target: TypeInfo,
}

impl BadAnyCast {
    pub(crate) fn new(stored: TypeInfo, target: TypeInfo) -> Self {
        trace!(stored = %stored, target = %target, "rejected any_cast");
        BadAnyCast { stored, target }
    }

    /// Type of the value that is actually stored.
    pub fn stored_type(&self) -> TypeInfo {
        self.stored
    }

    /// Type that was requested.
    pub fn target_type(&self) -> TypeInfo {
        self.target
    }
}

/// Error returned when a value held by one container
/// does not fit into another container of smaller capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("stored type {stored} ({size} bytes, aligned to {align}) does not fit into capacity of {capacity} bytes")]
pub struct CapacityError {
    stored: TypeInfo,
    size: usize,
    align: usize,
    capacity: usize,
}

impl CapacityError {
    pub(crate) fn new(stored: TypeInfo, size: usize, align: usize, capacity: usize) -> Self {
        trace!(stored = %stored, size, align, capacity, "rejected cross-capacity conversion");
        CapacityError {
            stored,
            size,
            align,
            capacity,
        }
    }

    /// Type of the value that did not fit.
    pub fn stored_type(&self) -> TypeInfo {
        self.stored
    }

    /// Size of the value that did not fit.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Capacity of the destination container.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
