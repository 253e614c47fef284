//! Change Status
//!
//! [`Status`] describes the most recent change event: when it happened, where
//! it came from, and which keys it touched. There is a single current value,
//! overwritten on each change — consumers needing history must observe every
//! transition via the hub's status listeners rather than polling.
//!
//! External changes carry a [`ChangeReason`] decoded from a transport-specific
//! integer code. The reason enumeration is closed; unrecognized codes decode
//! to "reason unknown" (`None`) instead of failing.

use std::fmt;

use chrono::{DateTime, Utc};

/// Why an external change happened, per the sync transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// A value changed on the server side.
    ServerChange,
    /// First sync after the local store came up.
    InitialSyncChange,
    /// The backing store hit its quota.
    QuotaViolationChange,
    /// The associated account changed.
    AccountChange,
}

impl ChangeReason {
    /// Decode a transport reason code; unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::ServerChange),
            1 => Some(Self::InitialSyncChange),
            2 => Some(Self::QuotaViolationChange),
            3 => Some(Self::AccountChange),
            _ => None,
        }
    }

    /// The transport code for this reason.
    pub fn code(self) -> i64 {
        match self {
            Self::ServerChange => 0,
            Self::InitialSyncChange => 1,
            Self::QuotaViolationChange => 2,
            Self::AccountChange => 3,
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ServerChange => "server change",
            Self::InitialSyncChange => "initial sync change",
            Self::QuotaViolationChange => "quota violation change",
            Self::AccountChange => "account change",
        };
        f.write_str(text)
    }
}

/// Where a change originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// No change has happened yet; the hub's starting state.
    Initial,
    /// An in-process write through the hub.
    LocalChange,
    /// A store mutation detected outside this process's own write path.
    /// `None` means the transport's reason code was unrecognized.
    ExternalChange(Option<ChangeReason>),
}

/// Descriptor of the most recent change event.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// When the change was observed.
    pub at: DateTime<Utc>,
    /// Where it came from.
    pub source: ChangeSource,
    /// The keys it affected.
    pub keys: Vec<String>,
}

impl Status {
    /// The hub's starting status: no change yet, no keys.
    pub fn initial() -> Self {
        Self {
            at: Utc::now(),
            source: ChangeSource::Initial,
            keys: Vec::new(),
        }
    }

    pub(crate) fn local(keys: Vec<String>) -> Self {
        Self {
            at: Utc::now(),
            source: ChangeSource::LocalChange,
            keys,
        }
    }

    pub(crate) fn external(reason: Option<ChangeReason>, keys: Vec<String>) -> Self {
        Self {
            at: Utc::now(),
            source: ChangeSource::ExternalChange(reason),
            keys,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.at.format("%H:%M:%S");
        let keys = self.keys.join(", ");

        match &self.source {
            ChangeSource::Initial => write!(f, "[{time}] Initial"),
            ChangeSource::LocalChange => write!(f, "[{time}] Local change: {keys}"),
            ChangeSource::ExternalChange(Some(reason)) => {
                write!(f, "[{time}] External change ({reason}): {keys}")
            }
            ChangeSource::ExternalChange(None) => {
                write!(f, "[{time}] External change (unknown): {keys}")
            }
        }
    }
}
