//! Input injection: key events, typed text, taps and swipes.

use crate::device::Device;
use crate::error::Result;

pub const KEYCODE_POWER: u32 = 26;
pub const KEYCODE_ENTER: u32 = 66;

impl Device {
    /// Send a key event, either a character code or a hardware button.
    pub fn press_key(&self, keycode: u32) -> Result<String> {
        self.shell(&build_keyevent(keycode))
    }

    /// Type text as if entered from an attached keyboard.
    pub fn insert_text(&self, text: &str) -> Result<()> {
        self.shell(&build_text(text))?;
        Ok(())
    }

    pub fn tap(&self, x: i32, y: i32) -> Result<()> {
        self.shell(&build_tap(x, y))?;
        Ok(())
    }

    /// Tap-and-hold, expressed as a same-point swipe of `hold_ms`. With a
    /// zero hold this degrades to a plain tap.
    pub fn long_press(&self, x: i32, y: i32, hold_ms: u32) -> Result<()> {
        if hold_ms > 0 {
            self.swipe(x, y, x, y, hold_ms)
        } else {
            self.tap(x, y)
        }
    }

    pub fn swipe(&self, x0: i32, y0: i32, x1: i32, y1: i32, duration_ms: u32) -> Result<()> {
        self.shell(&build_swipe(x0, y0, x1, y1, duration_ms))?;
        Ok(())
    }
}

fn build_keyevent(keycode: u32) -> String {
    format!("input keyevent {keycode}")
}

fn build_tap(x: i32, y: i32) -> String {
    format!("input tap {x} {y}")
}

fn build_swipe(x0: i32, y0: i32, x1: i32, y1: i32, duration_ms: u32) -> String {
    format!("input swipe {x0} {y0} {x1} {y1} {duration_ms}")
}

fn build_text(text: &str) -> String {
    format!("input text \"{}\"", escape_for_device_shell(text))
}

/// Escape the characters the device shell would interpret inside a
/// double-quoted string.
fn escape_for_device_shell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_keyevent_command() {
        assert_eq!(build_keyevent(KEYCODE_POWER), "input keyevent 26");
        assert_eq!(build_keyevent(KEYCODE_ENTER), "input keyevent 66");
    }

    #[test]
    fn builds_tap_and_swipe_commands() {
        assert_eq!(build_tap(120, 640), "input tap 120 640");
        assert_eq!(
            build_swipe(540, 960, 540, 0, 500),
            "input swipe 540 960 540 0 500"
        );
    }

    #[test]
    fn builds_quoted_text_command() {
        assert_eq!(build_text("hello"), "input text \"hello\"");
        assert_eq!(build_text("a b"), "input text \"a b\"");
    }

    #[test]
    fn escapes_shell_metacharacters() {
        assert_eq!(escape_for_device_shell("pa$s\"w`d\\"), "pa\\$s\\\"w\\`d\\\\");
    }
}
