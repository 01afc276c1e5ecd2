//! Domain types for machine pool snapshots.
//!
//! These types are values: a driver builds them from what the cloud
//! reports, and nothing downstream mutates them. A fresh snapshot is
//! fetched on every reconciliation cycle instead.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Unique identifier for a machine within a pool.
pub type MachineId = String;

// ── Machine state ─────────────────────────────────────────────────

/// Lifecycle state of a machine as reported by the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineState {
    /// Asked for but not yet granted (e.g. an open spot request).
    Requested,
    /// Granted and booting.
    Pending,
    Running,
    Terminating,
    Terminated,
    /// The cloud refused the request.
    Rejected,
}

impl MachineState {
    /// Requested, pending or running.
    pub fn is_active_state(self) -> bool {
        matches!(self, Self::Requested | Self::Pending | Self::Running)
    }

    /// On its way out, or never coming.
    pub fn is_terminal(self) -> bool {
        !self.is_active_state()
    }

    /// Infrastructure has been allocated (pending or running).
    pub fn is_started(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Requested => "REQUESTED",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Terminating => "TERMINATING",
            Self::Terminated => "TERMINATED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Operational state as seen by health checking. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceState {
    #[default]
    Unknown,
    Booting,
    InService,
    Unhealthy,
    OutOfService,
}

// ── Membership ────────────────────────────────────────────────────

/// Pool membership policy attached to a machine.
///
/// `active` decides whether the machine counts towards the pool's active
/// size; `evictable` decides whether it may ever be chosen for
/// termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipStatus {
    active: bool,
    evictable: bool,
}

impl MembershipStatus {
    pub const fn new(active: bool, evictable: bool) -> Self {
        Self { active, evictable }
    }

    /// Ordinary member: counted and evictable.
    pub const fn default_status() -> Self {
        Self::new(true, true)
    }

    /// Counted as capacity, but never terminated by the planner.
    pub const fn blessed() -> Self {
        Self::new(true, false)
    }

    /// Not counted, not terminated. Waits for an operator.
    pub const fn awaiting_service() -> Self {
        Self::new(false, false)
    }

    /// Not counted, always scheduled for termination and replacement.
    pub const fn disposable() -> Self {
        Self::new(false, true)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_evictable(&self) -> bool {
        self.evictable
    }

    pub fn is_disposable(&self) -> bool {
        *self == Self::disposable()
    }

    /// Compact JSON form, as stored in instance tags/metadata by drivers.
    pub fn to_tag_value(&self) -> String {
        serde_json::json!({ "active": self.active, "evictable": self.evictable }).to_string()
    }

    /// Parse the compact JSON form produced by [`Self::to_tag_value`].
    pub fn from_tag_value(value: &str) -> CoreResult<Self> {
        serde_json::from_str(value)
            .map_err(|e| CoreError::InvalidMembershipStatus(format!("{value:?}: {e}")))
    }
}

impl Default for MembershipStatus {
    fn default() -> Self {
        Self::default_status()
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.active, self.evictable) {
            (true, true) => "default",
            (true, false) => "blessed",
            (false, false) => "awaiting_service",
            (false, true) => "disposable",
        };
        f.write_str(name)
    }
}

// ── Machine ───────────────────────────────────────────────────────

/// A single pool member as observed at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    id: MachineId,
    machine_state: MachineState,
    #[serde(default)]
    membership_status: MembershipStatus,
    #[serde(default)]
    service_state: ServiceState,
    /// Unix timestamp (seconds) when the machine was launched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    launch_time: Option<u64>,
    /// Unix timestamp (seconds) when the machine was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_time: Option<u64>,
    /// Driver-specific data, opaque to the planner.
    #[serde(default)]
    metadata: serde_json::Value,
}

impl Machine {
    /// Create a machine with default membership and no timestamps.
    pub fn new(id: impl Into<MachineId>, machine_state: MachineState) -> Self {
        Self {
            id: id.into(),
            machine_state,
            membership_status: MembershipStatus::default(),
            service_state: ServiceState::default(),
            launch_time: None,
            request_time: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_membership_status(mut self, status: MembershipStatus) -> Self {
        self.membership_status = status;
        self
    }

    pub fn with_service_state(mut self, state: ServiceState) -> Self {
        self.service_state = state;
        self
    }

    pub fn with_launch_time(mut self, launch_time: u64) -> Self {
        self.launch_time = Some(launch_time);
        self
    }

    pub fn with_request_time(mut self, request_time: u64) -> Self {
        self.request_time = Some(request_time);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn machine_state(&self) -> MachineState {
        self.machine_state
    }

    pub fn membership_status(&self) -> MembershipStatus {
        self.membership_status
    }

    pub fn service_state(&self) -> ServiceState {
        self.service_state
    }

    pub fn launch_time(&self) -> Option<u64> {
        self.launch_time
    }

    pub fn request_time(&self) -> Option<u64> {
        self.request_time
    }

    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    /// Counts towards active size: non-terminal state and active membership.
    pub fn is_active(&self) -> bool {
        self.machine_state.is_active_state() && self.membership_status.is_active()
    }

    /// Holds (or is about to hold) cloud resources, whatever its membership.
    pub fn is_allocated(&self) -> bool {
        self.machine_state.is_active_state()
    }

    /// Seconds since launch, or `None` if the machine never launched.
    pub fn uptime_secs(&self, now: u64) -> Option<u64> {
        self.launch_time.map(|t| now.saturating_sub(t))
    }
}

// ── Pool ──────────────────────────────────────────────────────────

/// Ordered snapshot of a machine pool at a point in time.
///
/// Machine ids are unique within a snapshot; construction and
/// deserialization both reject duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoolSnapshot")]
pub struct MachinePool {
    machines: Vec<Machine>,
    /// Unix timestamp (seconds) of observation.
    timestamp: u64,
}

/// Unvalidated wire form of a [`MachinePool`].
#[derive(Deserialize)]
struct PoolSnapshot {
    #[serde(default)]
    machines: Vec<Machine>,
    timestamp: u64,
}

impl TryFrom<PoolSnapshot> for MachinePool {
    type Error = CoreError;

    fn try_from(raw: PoolSnapshot) -> CoreResult<Self> {
        Self::new(raw.machines, raw.timestamp)
    }
}

impl MachinePool {
    pub fn new(machines: Vec<Machine>, timestamp: u64) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(machines.len());
        for machine in &machines {
            if !seen.insert(machine.id()) {
                return Err(CoreError::DuplicateMachine(machine.id().to_string()));
            }
        }
        Ok(Self {
            machines,
            timestamp,
        })
    }

    pub fn empty(timestamp: u64) -> Self {
        Self {
            machines: Vec::new(),
            timestamp,
        }
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id() == id)
    }

    /// Machines counted as active capacity.
    pub fn active_machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.iter().filter(|m| m.is_active())
    }

    /// Machines in a non-terminal state, regardless of membership.
    pub fn allocated_machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.iter().filter(|m| m.is_allocated())
    }

    /// Machines that are pending or running.
    pub fn started_machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines
            .iter()
            .filter(|m| m.machine_state().is_started())
    }

    pub fn active_size(&self) -> usize {
        self.active_machines().count()
    }

    pub fn allocated_size(&self) -> usize {
        self.allocated_machines().count()
    }
}
