//! fleet-controller — keeps a cloud machine pool at its desired size.
//!
//! Ties the pure planner to the outside world. A [`CloudPoolDriver`]
//! supplies pool snapshots and carries out start/terminate calls; the
//! [`PoolController`] runs the reconciliation loop:
//!
//! ```text
//! PoolController (every reconcile_interval)
//!   ├── driver.list_machines()         -> MachinePool
//!   ├── ResizePlanner(pool, policy)    -> ResizePlan
//!   └── executor::execute(plan)        -> ExecutionReport
//!       ├── driver.start_machines(n)
//!       └── driver.terminate_machines(ids)
//! ```
//!
//! Driver calls may partially succeed. The executor records what went
//! through and what failed instead of aborting, and the next tick plans
//! again from a fresh snapshot.

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod executor;

pub use config::PoolConfig;
pub use controller::{PoolController, PoolSizeSummary};
pub use driver::{CloudPoolDriver, DriverFuture};
pub use error::{DriverError, DriverResult, StartMachinesError, TerminateMachinesError};
pub use executor::{ExecutionReport, execute};
