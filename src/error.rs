use std::time::Duration;

use thiserror::Error;

/// Known adb stderr markers and the error each one maps to.
///
/// Detection is a case-sensitive substring match against stderr after every
/// invocation. adb prints these as free text, so an upstream wording change
/// would silently stop matching; the strings below are the ones current adb
/// emits.
pub const STDERR_MARKERS: &[(&str, MarkerKind)] = &[
    ("no devices/emulators found", MarkerKind::NoDevice),
    ("Warning: Activity not started", MarkerKind::ActivityNotStarted),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    NoDevice,
    ActivityNotStarted,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no device or emulator found")]
    NoDevice,

    #[error("activity not started, intent delivered to running top-most instance")]
    ActivityNotStarted,

    #[error("uiautomator hierarchy dump failed: {0}")]
    UiAutomator(String),

    #[error("failed to parse {what} from output: {output:?}")]
    Parse { what: &'static str, output: String },

    #[error("failed to spawn adb: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("hierarchy XML is malformed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("screenshot decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(what: &'static str, output: impl Into<String>) -> Self {
        let output = output.into();
        // Keep parse errors readable when the source dump is large. Cut on
        // char boundaries: adb output is lossy-decoded and can carry
        // multibyte characters.
        let output = if output.chars().count() > 200 {
            let mut truncated: String = output.chars().take(200).collect();
            truncated.push_str("...");
            truncated
        } else {
            output
        };
        Error::Parse { what, output }
    }
}

/// Map a captured stderr stream to a marker error, if any marker is present.
pub fn classify_stderr(stderr: &str) -> Option<Error> {
    for (marker, kind) in STDERR_MARKERS {
        if stderr.contains(marker) {
            return Some(match kind {
                MarkerKind::NoDevice => Error::NoDevice,
                MarkerKind::ActivityNotStarted => Error::ActivityNotStarted,
            });
        }
    }
    None
}

pub type Result<T> = std::result::Result<T, Error>;
