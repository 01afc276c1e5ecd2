//! Resize planner — decides how many machines to add and which to remove.
//!
//! The planner borrows a pool snapshot and never mutates it, so the same
//! `(pool, policy, desired)` always yields the same plan and a planner can
//! be shared across threads freely.

use tracing::{debug, warn};

use fleet_core::{Machine, MachinePool, MachineState};

use crate::error::{ResizeError, ResizeResult};
use crate::plan::ResizePlan;
use crate::victim::VictimSelectionPolicy;

/// Computes [`ResizePlan`]s for one pool snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ResizePlanner<'a> {
    pool: &'a MachinePool,
    policy: VictimSelectionPolicy,
}

impl<'a> ResizePlanner<'a> {
    pub fn new(pool: &'a MachinePool, policy: VictimSelectionPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn pool(&self) -> &'a MachinePool {
        self.pool
    }

    pub fn policy(&self) -> VictimSelectionPolicy {
        self.policy
    }

    /// Number of machines counted as active capacity.
    pub fn active_size(&self) -> usize {
        self.pool.active_size()
    }

    /// Compute the plan that moves the pool towards `desired_size`.
    ///
    /// Disposable machines are always terminated. Blessed and
    /// awaiting-service machines are never terminated, even if that leaves
    /// the pool above `desired_size`.
    pub fn calculate_resize_plan(&self, desired_size: i64) -> ResizeResult<ResizePlan> {
        if desired_size < 0 {
            return Err(ResizeError::InvalidArgument(format!(
                "desired size must be non-negative, got {desired_size}"
            )));
        }
        let desired = u32::try_from(desired_size).map_err(|_| {
            ResizeError::InvalidArgument(format!(
                "desired size {desired_size} exceeds {}",
                u32::MAX
            ))
        })?;

        let mut to_terminate: Vec<Machine> = self.mandatory_replacements().cloned().collect();
        let active = self.active_size();
        let mut to_request = 0;

        if desired as usize >= active {
            to_request = desired - active as u32;
        } else {
            let deficit = active - desired as usize;
            let victims = self.victim_candidates();
            if victims.len() < deficit {
                warn!(
                    active,
                    desired,
                    evictable = victims.len(),
                    "not enough evictable machines to reach desired size"
                );
            }
            to_terminate.extend(victims.into_iter().take(deficit).cloned());
        }

        debug!(
            active,
            desired,
            to_request,
            to_terminate = to_terminate.len(),
            policy = %self.policy,
            "resize plan calculated"
        );

        Ok(ResizePlan::new(to_request, to_terminate))
    }

    /// Disposable machines that still hold resources.
    fn mandatory_replacements(&self) -> impl Iterator<Item = &'a Machine> {
        self.pool
            .machines()
            .iter()
            .filter(|m| m.is_allocated() && m.membership_status().is_disposable())
    }

    /// Evictable scale-in candidates, highest termination priority first.
    ///
    /// Requested machines come before started ones since they carry no
    /// sunk infrastructure cost. Within each tier the victim policy decides,
    /// with snapshot order as the tie-break.
    fn victim_candidates(&self) -> Vec<&'a Machine> {
        let (mut requested, mut started): (Vec<&Machine>, Vec<&Machine>) = self
            .pool
            .machines()
            .iter()
            .filter(|m| {
                let status = m.membership_status();
                m.is_allocated() && status.is_evictable() && !status.is_disposable()
            })
            .partition(|m| m.machine_state() == MachineState::Requested);

        self.policy.sort(&mut requested);
        self.policy.sort(&mut started);
        requested.extend(started);
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::MembershipStatus;

    const NOW: u64 = 1_700_000_000;

    fn running(id: &str, age_secs: u64) -> Machine {
        Machine::new(id, MachineState::Running).with_launch_time(NOW - age_secs)
    }

    fn pool(machines: Vec<Machine>) -> MachinePool {
        MachinePool::new(machines, NOW).unwrap()
    }

    #[test]
    fn negative_desired_size_is_rejected() {
        let p = pool(vec![]);
        let planner = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest);
        let err = planner.calculate_resize_plan(-1).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidArgument(_)));
    }

    #[test]
    fn oversized_desired_size_is_rejected() {
        let p = pool(vec![]);
        let planner = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest);
        let err = planner
            .calculate_resize_plan(i64::from(u32::MAX) + 1)
            .unwrap_err();
        assert!(matches!(err, ResizeError::InvalidArgument(_)));
    }

    #[test]
    fn scale_out_from_empty_pool() {
        let p = pool(vec![]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(2)
            .unwrap();
        assert_eq!(plan, ResizePlan::new(2, None));
    }

    #[test]
    fn at_desired_size_is_noop() {
        let p = pool(vec![running("a", 60), running("b", 30)]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(2)
            .unwrap();
        assert_eq!(plan, ResizePlan::noop());
    }

    #[test]
    fn disposable_machine_is_replaced() {
        let p = pool(vec![
            running("a", 60),
            running("b", 30).with_membership_status(MembershipStatus::disposable()),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(2)
            .unwrap();
        assert_eq!(plan.to_request(), 1);
        assert_eq!(plan.terminate_ids(), ["b"]);
    }

    #[test]
    fn terminal_disposable_is_not_terminated_again() {
        let p = pool(vec![
            Machine::new("gone", MachineState::Terminated)
                .with_membership_status(MembershipStatus::disposable()),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(0)
            .unwrap();
        assert_eq!(plan, ResizePlan::noop());
    }

    #[test]
    fn awaiting_service_is_neither_counted_nor_terminated() {
        let p = pool(vec![
            running("a", 60).with_membership_status(MembershipStatus::awaiting_service()),
        ]);
        let planner = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest);
        assert_eq!(planner.active_size(), 0);

        let plan = planner.calculate_resize_plan(1).unwrap();
        assert_eq!(plan.to_request(), 1);
        assert!(!plan.has_scale_in_actions());
    }

    #[test]
    fn blessed_machines_are_skipped_as_victims() {
        let p = pool(vec![
            running("old", 300).with_membership_status(MembershipStatus::blessed()),
            running("mid", 200),
            running("new", 100),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(1)
            .unwrap();
        assert_eq!(plan.terminate_ids(), ["mid", "new"]);
        assert_eq!(plan.to_request(), 0);
    }

    #[test]
    fn shrink_stops_at_protected_machines() {
        let p = pool(vec![
            running("a", 300).with_membership_status(MembershipStatus::blessed()),
            running("b", 200),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(0)
            .unwrap();
        assert_eq!(plan.terminate_ids(), ["b"]);
        assert_eq!(plan.to_request(), 0);
    }

    #[test]
    fn disposables_come_before_scale_in_victims() {
        let p = pool(vec![
            running("a", 300),
            running("d", 10).with_membership_status(MembershipStatus::disposable()),
            running("b", 200),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(1)
            .unwrap();
        assert_eq!(plan.terminate_ids(), ["d", "a"]);
    }

    #[test]
    fn pending_without_launch_time_goes_last_under_oldest() {
        let p = pool(vec![
            Machine::new("p", MachineState::Pending),
            running("r", 100),
        ]);
        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Oldest)
            .calculate_resize_plan(1)
            .unwrap();
        assert_eq!(plan.terminate_ids(), ["r"]);

        let plan = ResizePlanner::new(&p, VictimSelectionPolicy::Newest)
            .calculate_resize_plan(1)
            .unwrap();
        assert_eq!(plan.terminate_ids(), ["p"]);
    }
}
