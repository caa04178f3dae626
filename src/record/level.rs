use std::fmt;

/// Standard severity ladder (RFC 5424 ordering, numeric gaps kept for custom levels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = 100,
    Info = 200,
    Notice = 250,
    Warning = 300,
    Error = 400,
    Critical = 500,
    Alert = 600,
    Emergency = 700,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    pub const fn value(self) -> u16 {
        self as u16
    }

    /// Upper-case name used in rendered output
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
            Level::Emergency => "EMERGENCY",
        }
    }

    /// Exact match only; values between rungs return `None`
    pub fn from_value(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
