//! Resize plan — the output of one planning cycle.

use serde::{Deserialize, Serialize};

use fleet_core::Machine;

/// How many machines to request and which machines to terminate.
///
/// `to_terminate` is in termination priority order, highest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResizePlan {
    to_request: u32,
    to_terminate: Vec<Machine>,
}

impl ResizePlan {
    pub fn new(to_request: u32, to_terminate: impl IntoIterator<Item = Machine>) -> Self {
        Self {
            to_request,
            to_terminate: to_terminate.into_iter().collect(),
        }
    }

    /// A plan that does nothing.
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn to_request(&self) -> u32 {
        self.to_request
    }

    pub fn to_terminate(&self) -> &[Machine] {
        &self.to_terminate
    }

    /// Ids of the machines to terminate, in termination order.
    pub fn terminate_ids(&self) -> Vec<String> {
        self.to_terminate.iter().map(|m| m.id().to_string()).collect()
    }

    pub fn has_scale_out_actions(&self) -> bool {
        self.to_request > 0
    }

    pub fn has_scale_in_actions(&self) -> bool {
        !self.to_terminate.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::MachineState;

    #[test]
    fn noop_has_no_actions() {
        let plan = ResizePlan::noop();
        assert!(!plan.has_scale_out_actions());
        assert!(!plan.has_scale_in_actions());
        assert_eq!(plan, ResizePlan::new(0, None));
    }

    #[test]
    fn action_queries() {
        let plan = ResizePlan::new(
            2,
            vec![
                Machine::new("b", MachineState::Running),
                Machine::new("a", MachineState::Running),
            ],
        );
        assert!(plan.has_scale_out_actions());
        assert!(plan.has_scale_in_actions());
        assert_eq!(plan.terminate_ids(), ["b", "a"]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = Machine::new("a", MachineState::Running);
        let b = Machine::new("b", MachineState::Running);
        assert_eq!(
            ResizePlan::new(0, vec![a.clone(), b.clone()]),
            ResizePlan::new(0, vec![a.clone(), b.clone()])
        );
        assert_ne!(
            ResizePlan::new(0, vec![a.clone(), b.clone()]),
            ResizePlan::new(0, vec![b, a])
        );
    }
}
