use std::time::Duration;

use tracing::debug;

use crate::adb::locator::{resolve_adb_program, validate_adb_program};
use crate::adb::parse::{parse_devices, DeviceSummary};
use crate::adb::runner::{run_command, CommandOutput};
use crate::config::BridgeConfig;
use crate::error::{classify_stderr, Result};

/// Handle to one connected device. Every operation goes through this handle;
/// there is no implicit global target. Each call is one independent adb
/// invocation and nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Device {
    program: String,
    serial: Option<String>,
    shell_timeout: Duration,
    poll_step: Duration,
}

impl Device {
    pub fn new() -> Self {
        Self::from_config(&BridgeConfig::default())
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            program: resolve_adb_program(&config.adb_path),
            serial: config.serial.clone(),
            shell_timeout: Duration::from_secs(config.shell_timeout_secs),
            poll_step: Duration::from_millis(config.poll_step_ms),
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    pub(crate) fn poll_step(&self) -> Duration {
        self.poll_step
    }

    /// Verify the resolved adb program before first use: a configured path
    /// must exist and point to a file.
    pub fn check_adb(&self) -> Result<()> {
        validate_adb_program(&self.program).map_err(crate::error::Error::Config)
    }

    /// Run adb with the given tail arguments, scanning stderr for the known
    /// failure markers before handing the output back.
    pub(crate) fn exec(&self, tail: &[&str]) -> Result<CommandOutput> {
        let args = build_adb_args(self.serial.as_deref(), tail);
        debug!(program = %self.program, args = ?args, "adb invocation");
        let output = run_command(&self.program, &args, self.shell_timeout)?;
        if let Some(err) = classify_stderr(&output.stderr) {
            return Err(err);
        }
        Ok(output)
    }

    /// `adb shell <command>`, decoded as (lossy) UTF-8 text. The command is
    /// passed as a single argument, so device-shell quoting and pipes work.
    pub fn shell(&self, command: &str) -> Result<String> {
        Ok(self.exec(&["shell", command])?.stdout_text())
    }

    /// `adb exec-out <command>`, raw bytes. Used for binary payloads such as
    /// screenshots, where `shell`'s pty would mangle the stream.
    pub fn exec_out(&self, command: &str) -> Result<Vec<u8>> {
        let mut tail = vec!["exec-out"];
        tail.extend(command.split_whitespace());
        Ok(self.exec(&tail)?.stdout)
    }

    pub fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let output = self.exec(&["devices", "-l"])?;
        Ok(parse_devices(&output.stdout_text()))
    }

    /// True if at least one device shows up past the `adb devices` header.
    pub fn is_connected(&self) -> Result<bool> {
        Ok(!self.list_devices()?.is_empty())
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

fn build_adb_args(serial: Option<&str>, tail: &[&str]) -> Vec<String> {
    let mut args = Vec::with_capacity(tail.len() + 2);
    if let Some(serial) = serial {
        args.push("-s".to_string());
        args.push(serial.to_string());
    }
    args.extend(tail.iter().map(|arg| arg.to_string()));
    args
}
