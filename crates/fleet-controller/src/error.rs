//! Driver error types.
//!
//! Start and terminate calls are batch operations against an eventually
//! consistent cloud API, so their errors carry the part that succeeded.

use std::collections::BTreeMap;

use thiserror::Error;

use fleet_core::Machine;

/// Result type alias for driver calls.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors reported by a [`crate::CloudPoolDriver`].
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to list machines: {0}")]
    ListMachines(String),

    #[error(transparent)]
    StartMachines(#[from] StartMachinesError),

    #[error(transparent)]
    TerminateMachines(#[from] TerminateMachinesError),
}

/// A start request that was only partially fulfilled.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("started {} of {requested} machines: {message}", .started.len())]
pub struct StartMachinesError {
    pub requested: u32,
    /// Machines that were started before the failure.
    pub started: Vec<Machine>,
    pub message: String,
}

/// A batch termination in which some machines could not be terminated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to terminate {} machine(s): {}", .failures.len(), failed_ids(.failures))]
pub struct TerminateMachinesError {
    /// Ids that were terminated.
    pub terminated: Vec<String>,
    /// Machine id → error message.
    pub failures: BTreeMap<String, String>,
}

fn failed_ids(failures: &BTreeMap<String, String>) -> String {
    failures.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::MachineState;

    #[test]
    fn start_error_message_counts_started() {
        let err = StartMachinesError {
            requested: 3,
            started: vec![Machine::new("i-1", MachineState::Pending)],
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "started 1 of 3 machines: quota exceeded");
    }

    #[test]
    fn terminate_error_lists_failed_ids() {
        let err = TerminateMachinesError {
            terminated: vec!["i-1".to_string()],
            failures: BTreeMap::from([
                ("i-3".to_string(), "not found".to_string()),
                ("i-2".to_string(), "throttled".to_string()),
            ]),
        };
        assert_eq!(
            DriverError::from(err).to_string(),
            "failed to terminate 2 machine(s): i-2, i-3"
        );
    }
}
