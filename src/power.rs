//! Power state, lock state and the unlock sequence.

use std::time::Duration;

use tracing::info;

use crate::adb::parse::{filter_dump_lines, parse_battery_level};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::input::{KEYCODE_ENTER, KEYCODE_POWER};

/// Present in the power dump while the display is held awake; its absence
/// means the screen is off.
pub const SUSPEND_BLOCKER_MARKER: &str = "mHoldingDisplaySuspendBlocker=true";

/// Present in the power dump while the keyguard overrides the activity
/// timeout; its absence means the device is locked.
pub const LOCK_OVERRIDE_MARKER: &str = "mUserActivityTimeoutOverrideFromWindowManager=-1";

const WAKE_SETTLE_DELAY: Duration = Duration::from_secs(1);
const UNLOCK_SWIPE_MS: u32 = 500;

impl Device {
    /// `dumpsys <subsystem>` split into lines, optionally keeping only
    /// lines containing `term`.
    pub fn dump(&self, subsystem: &str, term: Option<&str>) -> Result<Vec<String>> {
        let output = self.shell(&format!("dumpsys {subsystem}"))?;
        Ok(filter_dump_lines(&output, term))
    }

    /// Screen off (suspended) iff the suspend-blocker line is absent.
    pub fn is_suspended(&self) -> Result<bool> {
        Ok(self.dump("power", Some(SUSPEND_BLOCKER_MARKER))?.is_empty())
    }

    /// Locked iff the keyguard timeout-override line is absent.
    pub fn is_locked(&self) -> Result<bool> {
        Ok(self.dump("power", Some(LOCK_OVERRIDE_MARKER))?.is_empty())
    }

    pub fn battery_level(&self) -> Result<u8> {
        let output = self.shell("dumpsys battery")?;
        parse_battery_level(&output).ok_or_else(|| Error::parse("battery level", output))
    }

    /// Wake and unlock: power key, settle, power key again if the screen is
    /// still off, then an upward swipe from mid-screen; with a PIN, type it
    /// and confirm with enter.
    pub fn unlock(&self, pin: Option<&str>) -> Result<()> {
        info!("waking device");
        self.press_key(KEYCODE_POWER)?;
        std::thread::sleep(WAKE_SETTLE_DELAY);
        if self.is_suspended()? {
            self.press_key(KEYCODE_POWER)?;
        }
        let (width, height) = self.screen_size()?;
        let (width, height) = (width as i32, height as i32);
        self.swipe(width / 2, height / 2, width / 2, 0, UNLOCK_SWIPE_MS)?;
        if let Some(pin) = pin {
            self.insert_text(pin)?;
            self.press_key(KEYCODE_ENTER)?;
        }
        Ok(())
    }
}
