//! Package and activity queries, launch and force-stop.

use tracing::info;

use crate::adb::parse::{package_listed, parse_running_activity};
use crate::device::Device;
use crate::error::{Error, Result};

impl Device {
    /// True iff the package shows up in `pm list packages <name>` output.
    /// The match is a literal substring, so `com.foo` also matches when
    /// only `com.foo.bar` is installed.
    pub fn package_installed(&self, package_name: &str) -> Result<bool> {
        let name = package_name.trim();
        let output = self.shell(&format!("pm list packages {name}"))?;
        Ok(package_listed(&output, name))
    }

    /// `(package, activity)` of the focused window, or `None` when nothing
    /// has focus (lock screen, boot).
    pub fn running_activity(&self) -> Result<Option<(String, String)>> {
        let output = self.shell("dumpsys window | grep -E 'mCurrentFocus'")?;
        Ok(parse_running_activity(&output))
    }

    /// Force-stop a package; with `None`, force-stop whatever currently has
    /// focus.
    pub fn kill_app(&self, package: Option<&str>) -> Result<()> {
        let package = match package {
            Some(package) => package.to_string(),
            None => self
                .running_activity()?
                .map(|(package, _)| package)
                .ok_or_else(|| Error::parse("focused activity", "no focused window"))?,
        };
        info!(package = %package, "force-stopping");
        self.shell(&build_force_stop(&package))?;
        Ok(())
    }

    pub fn launch_activity(&self, package: &str, activity: &str) -> Result<()> {
        self.shell(&build_launch(package, activity))?;
        Ok(())
    }

    /// Open a URL with the default handler (usually the browser).
    pub fn open_url(&self, url: &str) -> Result<()> {
        self.shell(&build_view_intent(url))?;
        Ok(())
    }
}

fn build_force_stop(package: &str) -> String {
    format!("am force-stop {package}")
}

fn build_launch(package: &str, activity: &str) -> String {
    format!("am start -n {package}/{activity}")
}

fn build_view_intent(url: &str) -> String {
    format!("am start -a android.intent.action.VIEW -d {url}")
}
