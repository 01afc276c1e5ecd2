//! fleet-core — snapshot data model for machine pools.
//!
//! A [`MachinePool`] is an immutable, point-in-time view of a fleet as
//! reported by a cloud driver. Each [`Machine`] carries its lifecycle
//! [`MachineState`] and a [`MembershipStatus`] that tells the resize
//! planner whether the machine counts as capacity and whether it may be
//! terminated.
//!
//! # Membership
//!
//! ```text
//!                 active   evictable
//! default          yes       yes      ordinary member
//! blessed          yes       no       never a victim
//! awaiting_service no        no       kept, not counted
//! disposable       no        yes      always replaced
//! ```

pub mod clock;
pub mod error;
pub mod types;

pub use clock::{Clock, FrozenClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use types::*;
