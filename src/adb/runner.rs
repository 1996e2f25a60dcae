use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Captured output of one adb invocation. Stdout stays raw bytes because
/// some commands (screencap) emit binary data; stderr is only ever scanned
/// for text markers.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }
}

pub fn run_command(program: &str, args: &[String], timeout: Duration) -> Result<CommandOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain stdout/stderr in parallel; otherwise a chatty child can block
    // once the pipe buffer fills and we would incorrectly hit the timeout.
    let stdout_handle = drain_pipe(child.stdout.take());
    let stderr_handle = drain_pipe(child.stderr.take());

    let exit_code = wait_with_timeout(&mut child, timeout);
    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    let exit_code = exit_code?;

    Ok(CommandOutput {
        stdout,
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        exit_code,
    })
}

fn drain_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::<u8>::new();
        if let Some(mut reader) = pipe {
            let mut temp = [0u8; 4096];
            loop {
                match reader.read(&mut temp) {
                    Ok(0) => break,
                    Ok(count) => buffer.extend_from_slice(&temp[..count]),
                    Err(_) => break,
                }
            }
        }
        buffer
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<i32>> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status.code()),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::Timeout(timeout));
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(err) => return Err(Error::Spawn(err)),
        }
    }
}
