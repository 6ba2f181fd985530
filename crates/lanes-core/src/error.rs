use std::fmt;

/// Machine-readable error codes surfaced by the `lanes` front end.
///
/// The layout engine itself never fails. These cover the front end's I/O,
/// its config files, and listings refused by the order checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputReadFailed,
    InputParseError,
    OrderViolation,
    OutputWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputReadFailed => "E2001",
            Self::InputParseError => "E2002",
            Self::OrderViolation => "E2003",
            Self::OutputWriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputReadFailed => "Could not read entry listing",
            Self::InputParseError => "Malformed entry listing",
            Self::OrderViolation => "Entries are not in child-before-parent order",
            Self::OutputWriteFailed => "Output write failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => {
                Some("Fix the TOML syntax in the named config file and retry.")
            }
            Self::InputReadFailed => Some("Check the file path, or pipe entries on stdin."),
            Self::InputParseError => {
                Some("Use one entry per line (`<id> [<parent>...]`) or pass --input-format.")
            }
            Self::OrderViolation => {
                Some("List every change above its parents, each id once, then retry.")
            }
            Self::OutputWriteFailed => {
                Some("Check that stdout is still open, or redirect output to a file.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
