//! Sources of hierarchy XML: the on-device file dump, or an injected
//! uiautomator agent handle.

use std::time::Duration;

use tracing::warn;

use crate::adb::parse::parse_dump_file_path;
use crate::device::Device;
use crate::error::{Error, Result};

/// Where `uiautomator dump` writes when its output does not announce a path.
pub const DEFAULT_DUMP_PATH: &str = "/sdcard/window_dump.xml";

const RESET_SETTLE_DELAY: Duration = Duration::from_secs(4);

pub trait HierarchyProvider {
    /// Produce one XML snapshot of the current UI tree.
    fn dump_hierarchy(&mut self) -> Result<String>;
}

/// Dumps the hierarchy to a file on the device and reads it back.
pub struct FileDumpProvider<'a> {
    device: &'a Device,
}

impl<'a> FileDumpProvider<'a> {
    pub fn new(device: &'a Device) -> Self {
        Self { device }
    }
}

impl HierarchyProvider for FileDumpProvider<'_> {
    fn dump_hierarchy(&mut self) -> Result<String> {
        let output = self.device.shell("uiautomator dump")?;
        let path = match parse_dump_file_path(&output) {
            Some(path) => path,
            None => {
                warn!(output = %output.trim(), "uiautomator dump reported no path");
                DEFAULT_DUMP_PATH.to_string()
            }
        };
        self.device.shell(&format!("cat {path}"))
    }
}

/// A richer automation agent that can serve hierarchy dumps directly
/// (uiautomator2-style) and restart its on-device server.
pub trait UiAutomatorHandle {
    fn dump_hierarchy(&mut self) -> std::result::Result<String, String>;
    fn reset_uiautomator(&mut self) -> std::result::Result<(), String>;
}

/// Wraps an injected [`UiAutomatorHandle`]. A failed dump resets the agent
/// best-effort, waits a fixed settle delay, and fails with
/// [`Error::UiAutomator`]; callers polling for a selector see the error
/// immediately instead of another attempt.
pub struct HandleProvider<H> {
    handle: H,
    settle: fn(Duration),
}

impl<H: UiAutomatorHandle> HandleProvider<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            settle: std::thread::sleep,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_settle(handle: H, settle: fn(Duration)) -> Self {
        Self { handle, settle }
    }
}

impl<H: UiAutomatorHandle> HierarchyProvider for HandleProvider<H> {
    fn dump_hierarchy(&mut self) -> Result<String> {
        match self.handle.dump_hierarchy() {
            Ok(xml) => Ok(xml),
            Err(message) => {
                warn!(error = %message, "hierarchy dump failed, resetting uiautomator");
                let _ = self.handle.reset_uiautomator();
                (self.settle)(RESET_SETTLE_DELAY);
                Err(Error::UiAutomator(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyHandle {
        dumps: usize,
        resets: usize,
    }

    impl UiAutomatorHandle for FlakyHandle {
        fn dump_hierarchy(&mut self) -> std::result::Result<String, String> {
            self.dumps += 1;
            Err("agent crashed".to_string())
        }

        fn reset_uiautomator(&mut self) -> std::result::Result<(), String> {
            self.resets += 1;
            Ok(())
        }
    }

    fn no_sleep(_: Duration) {}

    #[test]
    fn failed_dump_resets_then_errors() {
        let mut provider = HandleProvider::with_settle(
            FlakyHandle {
                dumps: 0,
                resets: 0,
            },
            no_sleep,
        );
        let err = provider.dump_hierarchy().expect_err("dump should fail");
        match err {
            Error::UiAutomator(message) => assert_eq!(message, "agent crashed"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.handle.dumps, 1);
        assert_eq!(provider.handle.resets, 1);
    }

    struct HealthyHandle;

    impl UiAutomatorHandle for HealthyHandle {
        fn dump_hierarchy(&mut self) -> std::result::Result<String, String> {
            Ok("<hierarchy/>".to_string())
        }

        fn reset_uiautomator(&mut self) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn healthy_handle_passes_xml_through() {
        let mut provider = HandleProvider::with_settle(HealthyHandle, no_sleep);
        assert_eq!(provider.dump_hierarchy().expect("dump"), "<hierarchy/>");
    }
}
