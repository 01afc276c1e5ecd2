//! Cloud pool driver boundary.
//!
//! A driver adapts one cloud API (or an in-memory fake) to the three
//! operations the controller needs. Retries against eventually
//! consistent APIs are the driver's business; the controller only sees
//! the final outcome of each call.

use std::future::Future;
use std::pin::Pin;

use fleet_core::{Machine, MachinePool};

use crate::error::DriverResult;

/// Boxed future alias for driver calls.
pub type DriverFuture<'a, T> = Pin<Box<dyn Future<Output = DriverResult<T>> + Send + 'a>>;

/// Operations a cloud-specific driver provides to the controller.
pub trait CloudPoolDriver: Send + Sync {
    /// Snapshot of every machine currently in the pool, including
    /// outstanding requests and machines on their way out.
    fn list_machines(&self) -> DriverFuture<'_, MachinePool>;

    /// Request `count` new machines.
    ///
    /// Returns the machines that were started. A partial start is reported
    /// as [`crate::DriverError::StartMachines`].
    fn start_machines(&self, count: u32) -> DriverFuture<'_, Vec<Machine>>;

    /// Terminate machines by id.
    ///
    /// If only some terminations succeed, the error is
    /// [`crate::DriverError::TerminateMachines`] listing both halves.
    fn terminate_machines(&self, ids: Vec<String>) -> DriverFuture<'_, ()>;
}
