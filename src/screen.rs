//! Screen geometry, brightness and screenshots.

use std::path::Path;

use image::RgbImage;

use crate::adb::parse::parse_screen_size;
use crate::device::Device;
use crate::error::{Error, Result};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Crop rectangle in screen pixels, left/top inclusive, right/bottom
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

impl Device {
    /// Physical screen size as `(width, height)`.
    pub fn screen_size(&self) -> Result<(u32, u32)> {
        let output = self.shell("wm size")?;
        parse_screen_size(&output).ok_or_else(|| Error::parse("screen size", output))
    }

    /// Capture the screen as an RGB image, optionally cropped.
    pub fn screenshot(&self, crop: Option<CropRect>) -> Result<RgbImage> {
        let bytes = self.exec_out("screencap -p")?;
        decode_screenshot(&bytes, crop)
    }

    pub fn screenshot_to_file(&self, path: &Path, crop: Option<CropRect>) -> Result<()> {
        let img = self.screenshot(crop)?;
        img.save(path)?;
        Ok(())
    }

    /// Set the screen brightness, 0-255.
    pub fn set_screen_brightness(&self, level: u8) -> Result<()> {
        self.shell(&format!("settings put system screen_brightness {level}"))?;
        Ok(())
    }
}

fn decode_screenshot(bytes: &[u8], crop: Option<CropRect>) -> Result<RgbImage> {
    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err(Error::parse(
            "PNG screenshot",
            format!("{} bytes without a PNG signature", bytes.len()),
        ));
    }
    let img = image::load_from_memory(bytes)?.to_rgb8();
    match crop {
        Some(rect) => Ok(image::imageops::crop_imm(
            &img,
            rect.left,
            rect.top,
            rect.width(),
            rect.height(),
        )
        .to_image()),
        None => Ok(img),
    }
}
