//! Profiled Command Data Model
//!
//! Input shape delivered by a Redis client's command-profiling hook: one
//! record per already-completed command, with the timestamps and endpoint
//! the client observed at execution time.

use std::fmt;
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

/// Client-side execution modifiers attached to a command at issue time.
///
/// Plain u32 bit set. Rendering order is pinned by the `NAMES` table and
/// never depends on any platform's bit-iteration behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFlags(u32);

impl CommandFlags {
    pub const NONE: CommandFlags = CommandFlags(0);
    pub const FIRE_AND_FORGET: CommandFlags = CommandFlags(1 << 0);
    pub const PREFER_MASTER: CommandFlags = CommandFlags(1 << 1);
    pub const PREFER_REPLICA: CommandFlags = CommandFlags(1 << 2);
    pub const DEMAND_MASTER: CommandFlags = CommandFlags(1 << 3);
    pub const DEMAND_REPLICA: CommandFlags = CommandFlags(1 << 4);
    pub const NO_REDIRECT: CommandFlags = CommandFlags(1 << 5);
    pub const NO_SCRIPT_CACHE: CommandFlags = CommandFlags(1 << 6);

    /// Canonical declaration order used for rendering.
    const NAMES: [(CommandFlags, &'static str); 7] = [
        (Self::FIRE_AND_FORGET, "FireAndForget"),
        (Self::PREFER_MASTER, "PreferMaster"),
        (Self::PREFER_REPLICA, "PreferReplica"),
        (Self::DEMAND_MASTER, "DemandMaster"),
        (Self::DEMAND_REPLICA, "DemandReplica"),
        (Self::NO_REDIRECT, "NoRedirect"),
        (Self::NO_SCRIPT_CACHE, "NoScriptCache"),
    ];

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: CommandFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Render the set flags as a comma-separated name list, e.g.
    /// `"FireAndForget, NoRedirect"`, in declaration order.
    pub fn render(self) -> String {
        let mut out = String::new();
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !out.is_empty() {
                    out.push_str(", ");
                }
                out.push_str(name);
            }
        }
        out
    }
}

impl std::ops::BitOr for CommandFlags {
    type Output = CommandFlags;

    #[inline]
    fn bitor(self, rhs: CommandFlags) -> CommandFlags {
        CommandFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CommandFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: CommandFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for CommandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Network endpoint that served a profiled command.
///
/// The absent case is modeled as `Option::<Endpoint>::None` on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Resolved socket address. Both the server and network-peer attribute
    /// pairs apply.
    Ip { addr: IpAddr, port: u16 },
    /// DNS name, not yet resolved at profiling time. Only the server pair
    /// applies.
    Name { host: String, port: u16 },
    /// Free-form endpoint with no port concept, e.g. a unix socket path.
    Other(String),
}

/// One already-completed command as reported by the profiling hook.
///
/// `command` and `created_at` are mandatory by contract with the profiler;
/// everything else may be absent and degrades to omitted span attributes.
#[derive(Debug, Clone)]
pub struct ProfiledCommand {
    /// Command verb, e.g. `"SET"`. Doubles as the span name.
    pub command: String,
    /// Wall-clock instant the command was issued.
    pub created_at: SystemTime,
    /// Measured execution time.
    pub elapsed: Duration,
    pub flags: CommandFlags,
    pub endpoint: Option<Endpoint>,
    /// Logical database index. `Some(0)` is a real database, not "unset".
    pub db: Option<i64>,
    /// Instant the command entered the client's send queue.
    pub enqueued_at: Option<SystemTime>,
    /// Instant the command was written to the socket.
    pub sent_at: Option<SystemTime>,
    /// Instant the response arrived.
    pub response_received_at: Option<SystemTime>,
}

impl ProfiledCommand {
    pub fn new(command: impl Into<String>, created_at: SystemTime, elapsed: Duration) -> Self {
        ProfiledCommand {
            command: command.into(),
            created_at,
            elapsed,
            flags: CommandFlags::NONE,
            endpoint: None,
            db: None,
            enqueued_at: None,
            sent_at: None,
            response_received_at: None,
        }
    }

    pub fn with_flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_db(mut self, db: i64) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_enqueued_at(mut self, at: SystemTime) -> Self {
        self.enqueued_at = Some(at);
        self
    }

    pub fn with_sent_at(mut self, at: SystemTime) -> Self {
        self.sent_at = Some(at);
        self
    }

    pub fn with_response_received_at(mut self, at: SystemTime) -> Self {
        self.response_received_at = Some(at);
        self
    }

    /// Instant the command finished: `created_at + elapsed`.
    pub fn completed_at(&self) -> SystemTime {
        self.created_at + self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_flags_render_to_empty_string() {
        assert!(CommandFlags::NONE.is_empty());
        assert_eq!(CommandFlags::NONE.render(), "");
    }

    #[test]
    fn single_flag_renders_its_name() {
        assert_eq!(CommandFlags::FIRE_AND_FORGET.render(), "FireAndForget");
        assert_eq!(CommandFlags::NO_SCRIPT_CACHE.render(), "NoScriptCache");
    }

    #[test]
    fn flags_render_in_declaration_order() {
        // Declaration order, never insertion or bit-iteration order.
        let flags = CommandFlags::NO_REDIRECT | CommandFlags::FIRE_AND_FORGET;
        assert_eq!(flags.render(), "FireAndForget, NoRedirect");

        let flags = CommandFlags::NO_SCRIPT_CACHE
            | CommandFlags::DEMAND_MASTER
            | CommandFlags::PREFER_REPLICA;
        assert_eq!(flags.render(), "PreferReplica, DemandMaster, NoScriptCache");
    }

    #[test]
    fn display_matches_render() {
        let flags = CommandFlags::FIRE_AND_FORGET | CommandFlags::PREFER_MASTER;
        assert_eq!(flags.to_string(), flags.render());
    }

    #[test]
    fn contains_requires_all_bits() {
        let flags = CommandFlags::FIRE_AND_FORGET | CommandFlags::NO_REDIRECT;
        assert!(flags.contains(CommandFlags::FIRE_AND_FORGET));
        assert!(flags.contains(CommandFlags::NO_REDIRECT));
        assert!(!flags.contains(CommandFlags::DEMAND_REPLICA));
        assert!(!CommandFlags::FIRE_AND_FORGET.contains(flags));
    }

    #[test]
    fn completed_at_adds_elapsed() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let record = ProfiledCommand::new("GET", start, Duration::from_millis(250));
        assert_eq!(record.completed_at(), start + Duration::from_millis(250));
    }
}
