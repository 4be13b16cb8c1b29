//! Child processes with a bounded wait.

use anyhow::{Context, Result};
use log::debug;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::RealRuntime;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_with_timeout_impl(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Option<i32>> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("Failed to wait for {}", program))?
            {
                // Terminated by a signal has no exit code
                return Ok(Some(status.code().unwrap_or(-1)));
            }
            if Instant::now() >= deadline {
                debug!("{} still running after {:?}, not waiting", program, timeout);
                let program = program.to_string();
                thread::spawn(move || match child.wait() {
                    Ok(status) => debug!("{} finished late with {}", program, status),
                    Err(e) => debug!("Failed to reap {}: {}", program, e),
                });
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}
