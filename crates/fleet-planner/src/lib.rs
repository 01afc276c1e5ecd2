//! fleet-planner — resize decisions for a machine pool.
//!
//! Turns a `MachinePool` snapshot, a desired size and a victim selection
//! policy into a [`ResizePlan`]: how many machines to request and which
//! machines to terminate, in termination order. The planner is a pure
//! function of its inputs; it never touches the network or a clock.
//!
//! # Algorithm
//!
//! ```text
//! active     = machines in REQUESTED/PENDING/RUNNING with active membership
//! terminate  = every disposable machine (always replaced)
//! candidates = evictable active machines, REQUESTED first, then
//!              PENDING/RUNNING, each tier sorted by the victim policy
//!
//! if desired >= active:
//!     request = desired - active
//! else:
//!     terminate += first (active - desired) candidates
//!     request    = 0
//! ```
//!
//! Running short of candidates (everything left is blessed) is not an
//! error: the plan shrinks as far as policy allows and the next
//! reconciliation tries again.

pub mod error;
pub mod plan;
pub mod planner;
pub mod victim;

pub use error::{ResizeError, ResizeResult};
pub use plan::ResizePlan;
pub use planner::ResizePlanner;
pub use victim::VictimSelectionPolicy;
