use std::collections::BTreeSet;
use std::fmt;
use std::io;

use chrono::{Datelike, Timelike};
use tokio::process::Command;
use tracing::warn;

/// One time field of a crontab entry: the `*` wildcard or an explicit set
/// of accepted values.
///
/// The wildcard is its own variant rather than a fully populated set so a
/// caller can tell "matches everything" apart from "matches these values"
/// even when the two would answer every query identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeField {
    /// The `*` wildcard — accepts every candidate value.
    Any,
    /// Accepts exactly the listed values.
    Values(BTreeSet<u32>),
}

impl TimeField {
    /// Build an explicit value set.
    pub fn values<I: IntoIterator<Item = u32>>(values: I) -> Self {
        TimeField::Values(values.into_iter().collect())
    }

    /// Membership test. `Any` accepts everything without materializing the
    /// field's domain.
    pub fn contains(&self, value: u32) -> bool {
        match self {
            TimeField::Any => true,
            TimeField::Values(set) => set.contains(&value),
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Any => write!(f, "*"),
            TimeField::Values(set) => {
                for (i, v) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}

/// Deferred work bound to a crontab entry at construction time.
///
/// Implementations must be cheap to call from the tick loop: launch and
/// return, never block on completion.
pub trait Action: Send + Sync {
    /// Invoke the bound work. Errors are reported to the caller but must
    /// carry no obligation to retry.
    fn fire(&self) -> io::Result<()>;

    /// Identity of the action for diagnostic logging.
    fn describe(&self) -> String;
}

/// Closures can stand in for an action; whatever they capture at
/// construction time is what `fire` runs with.
impl<F> Action for F
where
    F: Fn() -> io::Result<()> + Send + Sync,
{
    fn fire(&self) -> io::Result<()> {
        self()
    }

    fn describe(&self) -> String {
        "<closure>".to_string()
    }
}

/// Launches a shell command line, fire-and-forget.
///
/// The child is spawned through `sh -c` with inherited stdio and its handle
/// is dropped immediately: the scheduler never waits on it, never records
/// its exit status, and puts no bound on how many children are outstanding.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    command: String,
}

impl ShellCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The verbatim command text.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Action for ShellCommand {
    fn fire(&self) -> io::Result<()> {
        Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .spawn()
            .map(drop)
    }

    fn describe(&self) -> String {
        self.command.clone()
    }
}

/// One parsed crontab line: five time fields plus the action to fire.
///
/// Immutable once constructed; the engine holds the entry list for the life
/// of the process. Field domains: minute 0–59, hour 0–23, day-of-month 1–31
/// (no calendar-validity check — day 31 in February simply never matches),
/// month 1–12, weekday 1–7 with 1 = Monday and 7 = Sunday (ISO).
pub struct Entry {
    pub minutes: TimeField,
    pub hours: TimeField,
    pub days: TimeField,
    pub months: TimeField,
    pub weekdays: TimeField,
    action: Box<dyn Action>,
}

impl Entry {
    pub fn new(
        action: impl Action + 'static,
        minutes: TimeField,
        hours: TimeField,
        days: TimeField,
        months: TimeField,
        weekdays: TimeField,
    ) -> Self {
        Self {
            minutes,
            hours,
            days,
            months,
            weekdays,
            action: Box::new(action),
        }
    }

    /// True iff all five fields accept the corresponding components of `t`.
    pub fn matches<T: Datelike + Timelike>(&self, t: &T) -> bool {
        self.minutes.contains(t.minute())
            && self.hours.contains(t.hour())
            && self.days.contains(t.day())
            && self.months.contains(t.month())
            && self.weekdays.contains(t.weekday().number_from_monday())
    }

    /// Fire the bound action. A launch failure is logged and contained —
    /// it never reaches the tick loop or other entries.
    pub fn fire(&self) {
        if let Err(e) = self.action.fire() {
            warn!(entry = %self, error = %e, "action failed to launch");
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.minutes,
            self.hours,
            self.days,
            self.months,
            self.weekdays,
            self.action.describe()
        )
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({self})")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn any_accepts_the_whole_domain() {
        assert!((1..=366).all(|v| TimeField::Any.contains(v)));
    }

    #[test]
    fn values_accept_only_their_members() {
        let field = TimeField::values([1, 15, 30]);
        assert!(field.contains(15));
        assert!(!field.contains(16));
    }

    #[test]
    fn field_display() {
        assert_eq!(TimeField::Any.to_string(), "*");
        assert_eq!(TimeField::values([30, 1, 15]).to_string(), "1,15,30");
    }

    #[test]
    fn entry_matches_all_five_fields() {
        // 2016-03-14 was a Monday.
        let entry = Entry::new(
            || -> io::Result<()> { Ok(()) },
            TimeField::values([43]),
            TimeField::values([8]),
            TimeField::values([14]),
            TimeField::values([3]),
            TimeField::values([1]),
        );
        assert!(entry.matches(&at(2016, 3, 14, 8, 43, 12)));
        assert!(entry.matches(&at(2016, 3, 14, 8, 43, 0)));
        // 2015-03-14 was a Saturday, so the weekday test fails.
        assert!(!entry.matches(&at(2015, 3, 14, 8, 43, 12)));
        assert!(!entry.matches(&at(2016, 3, 14, 8, 44, 12)));
    }

    #[test]
    fn fire_invokes_the_bound_closure_with_its_captures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let bound = Arc::clone(&calls);
        let step = 7usize;
        let entry = Entry::new(
            move || -> io::Result<()> {
                bound.fetch_add(step, Ordering::SeqCst);
                Ok(())
            },
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
        );
        entry.fire();
        entry.fire();
        assert_eq!(calls.load(Ordering::SeqCst), 14);
    }

    #[test]
    fn fire_contains_action_failures() {
        let entry = Entry::new(
            || -> io::Result<()> { Err(io::Error::other("no such command")) },
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
            TimeField::Any,
        );
        // Must not panic or propagate.
        entry.fire();
    }

    #[test]
    fn entry_display_names_fields_and_action() {
        let entry = Entry::new(
            ShellCommand::new("echo hi"),
            TimeField::values([0]),
            TimeField::values([0]),
            TimeField::Any,
            TimeField::Any,
            TimeField::values([1]),
        );
        assert_eq!(entry.to_string(), "0 0 * * 1 echo hi");
    }

    #[tokio::test]
    async fn shell_command_spawns_detached() {
        ShellCommand::new("true").fire().expect("spawn failed");
    }
}
