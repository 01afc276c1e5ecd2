//! Victim selection policies — which machine goes first on scale-in.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use fleet_core::Machine;

/// Termination priority ordering over machines.
///
/// The machine that sorts first under [`VictimSelectionPolicy::compare`]
/// is the first to be terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VictimSelectionPolicy {
    /// Earliest launch time first.
    #[default]
    Oldest,
    /// Latest launch time first.
    Newest,
}

impl VictimSelectionPolicy {
    /// Compare two machines by termination priority.
    ///
    /// A machine without a launch time is treated as launched after every
    /// machine that has one, so it is the last victim under `Oldest` and the
    /// first under `Newest`. Ties compare equal; callers rely on a stable
    /// sort to keep snapshot order among them.
    pub fn compare(&self, a: &Machine, b: &Machine) -> Ordering {
        let by_launch = launch_order(a, b);
        match self {
            Self::Oldest => by_launch,
            Self::Newest => by_launch.reverse(),
        }
    }

    /// Sort machines in place, highest termination priority first.
    pub fn sort(&self, machines: &mut [&Machine]) {
        machines.sort_by(|a, b| self.compare(a, b));
    }
}

fn launch_order(a: &Machine, b: &Machine) -> Ordering {
    match (a.launch_time(), b.launch_time()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for VictimSelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oldest => f.write_str("OLDEST"),
            Self::Newest => f.write_str("NEWEST"),
        }
    }
}

impl FromStr for VictimSelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OLDEST" => Ok(Self::Oldest),
            "NEWEST" => Ok(Self::Newest),
            other => Err(format!("unknown victim selection policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::MachineState;

    fn launched(id: &str, at: u64) -> Machine {
        Machine::new(id, MachineState::Running).with_launch_time(at)
    }

    fn ids(machines: &[&Machine]) -> Vec<String> {
        machines.iter().map(|m| m.id().to_string()).collect()
    }

    #[test]
    fn oldest_sorts_earliest_first() {
        let (a, b, c) = (launched("a", 300), launched("b", 100), launched("c", 200));
        let mut v = vec![&a, &b, &c];
        VictimSelectionPolicy::Oldest.sort(&mut v);
        assert_eq!(ids(&v), ["b", "c", "a"]);
    }

    #[test]
    fn newest_sorts_latest_first() {
        let (a, b, c) = (launched("a", 300), launched("b", 100), launched("c", 200));
        let mut v = vec![&a, &b, &c];
        VictimSelectionPolicy::Newest.sort(&mut v);
        assert_eq!(ids(&v), ["a", "c", "b"]);
    }

    #[test]
    fn unlaunched_machines_count_as_newest() {
        let a = launched("a", 100);
        let p = Machine::new("p", MachineState::Pending);

        assert_eq!(VictimSelectionPolicy::Oldest.compare(&a, &p), Ordering::Less);
        assert_eq!(VictimSelectionPolicy::Newest.compare(&a, &p), Ordering::Greater);
    }

    #[test]
    fn ties_keep_input_order() {
        let (x, y, z) = (launched("x", 5), launched("y", 5), launched("z", 5));
        for policy in [VictimSelectionPolicy::Oldest, VictimSelectionPolicy::Newest] {
            let mut v = vec![&y, &z, &x];
            policy.sort(&mut v);
            assert_eq!(ids(&v), ["y", "z", "x"]);
        }
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("oldest".parse::<VictimSelectionPolicy>(), Ok(VictimSelectionPolicy::Oldest));
        assert_eq!(" NEWEST ".parse::<VictimSelectionPolicy>(), Ok(VictimSelectionPolicy::Newest));
        assert!("random".parse::<VictimSelectionPolicy>().is_err());
        assert_eq!(VictimSelectionPolicy::Newest.to_string(), "NEWEST");
        assert_eq!(VictimSelectionPolicy::default(), VictimSelectionPolicy::Oldest);
    }

    #[test]
    fn serializes_uppercase() {
        let json = serde_json::to_string(&VictimSelectionPolicy::Newest).unwrap();
        assert_eq!(json, "\"NEWEST\"");
        let back: VictimSelectionPolicy = serde_json::from_str("\"OLDEST\"").unwrap();
        assert_eq!(back, VictimSelectionPolicy::Oldest);
    }
}
