//! Scriptable Android device automation over adb.
//!
//! `oolong` drives a connected device through the `adb` command-line tool:
//! input injection (taps, swipes, key events, text), UI-hierarchy capture
//! with selector polling, screenshots, power and lock state, and package
//! queries. Every operation takes an explicit [`Device`] handle and is one
//! blocking adb invocation; nothing is shared or cached between calls.
//!
//! ```no_run
//! use std::time::Duration;
//! use oolong::{Device, Selector};
//!
//! fn main() -> oolong::Result<()> {
//!     let device = Device::new();
//!     if !device.is_connected()? {
//!         return Err(oolong::Error::NoDevice);
//!     }
//!     let ok_button = Selector::tag("node").attr("text", "OK");
//!     if let Some(root) = device.ui_hierarchy(Some(&ok_button), Duration::from_secs(2))? {
//!         let (x, y) = root.find(&ok_button).expect("matched").center()?;
//!         device.tap(x, y)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod adb;
pub mod apps;
pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod power;
pub mod screen;
pub mod ui;

pub use adb::parse::DeviceSummary;
pub use adb::runner::CommandOutput;
pub use config::BridgeConfig;
pub use device::Device;
pub use error::{Error, Result};
pub use input::{KEYCODE_ENTER, KEYCODE_POWER};
pub use screen::CropRect;
pub use ui::poll::{wait_for_hierarchy, POLL_STEP};
pub use ui::provider::{FileDumpProvider, HandleProvider, HierarchyProvider, UiAutomatorHandle};
pub use ui::{containers, parse_hierarchy, Bounds, Selector, UiNode};
