//! Plan executor — applies a ResizePlan through a driver.
//!
//! Scale-out runs before scale-in, so replacements for disposable
//! machines are requested before the machines they replace go away.
//! A failure on one side never stops the other; the report says which
//! parts of the plan went through.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use fleet_core::Machine;
use fleet_planner::ResizePlan;

use crate::driver::CloudPoolDriver;
use crate::error::DriverError;

/// Outcome of executing a [`ResizePlan`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionReport {
    /// Machines started for the plan's scale-out.
    pub started: Vec<Machine>,
    /// Set when fewer machines than requested were started.
    pub start_error: Option<String>,
    /// Ids terminated for the plan's scale-in, in plan order.
    pub terminated: Vec<String>,
    /// Machine id → error message for terminations that failed.
    pub termination_failures: BTreeMap<String, String>,
}

impl ExecutionReport {
    /// Every action in the plan succeeded.
    pub fn is_complete(&self) -> bool {
        self.start_error.is_none() && self.termination_failures.is_empty()
    }
}

/// Apply `plan` using `driver` and report what happened.
pub async fn execute(plan: &ResizePlan, driver: &dyn CloudPoolDriver) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    if plan.has_scale_out_actions() {
        let count = plan.to_request();
        match driver.start_machines(count).await {
            Ok(started) => {
                info!(requested = count, started = started.len(), "machines started");
                report.started = started;
            }
            Err(DriverError::StartMachines(e)) => {
                warn!(
                    requested = e.requested,
                    started = e.started.len(),
                    error = %e.message,
                    "scale-out partially failed"
                );
                report.start_error = Some(e.to_string());
                report.started = e.started;
            }
            Err(e) => {
                warn!(requested = count, error = %e, "scale-out failed");
                report.start_error = Some(e.to_string());
            }
        }
    }

    if plan.has_scale_in_actions() {
        let ids = plan.terminate_ids();
        debug!(ids = ?ids, "terminating machines");
        match driver.terminate_machines(ids.clone()).await {
            Ok(()) => {
                info!(terminated = ids.len(), "machines terminated");
                report.terminated = ids;
            }
            Err(DriverError::TerminateMachines(e)) => {
                for (id, error) in &e.failures {
                    warn!(machine = %id, error = %error, "termination failed");
                }
                report.terminated = e.terminated;
                report.termination_failures = e.failures;
            }
            Err(e) => {
                warn!(error = %e, "scale-in failed");
                let message = e.to_string();
                report.termination_failures = ids
                    .into_iter()
                    .map(|id| (id, message.clone()))
                    .collect();
            }
        }
    }

    report
}
