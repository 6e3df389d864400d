//! Turns SIGINT/SIGTERM into cancellations for every philosopher.

use std::thread::{self, JoinHandle};

use libc::{SIGINT, SIGTERM};
use log::{info, warn};
use signal_hook::iterator::{Handle, Signals};

use crate::error::Result;
use crate::monitor::Monitor;

pub struct Shutdown {
    handle: Handle,
    thread: JoinHandle<()>,
}

impl Shutdown {
    /// Stops listening for signals.
    pub fn close(self) {
        self.handle.close();
        if self.thread.join().is_err() {
            warn!("signal listener panicked");
        }
    }
}

/// Listens for SIGINT and SIGTERM on a background thread. The first one interrupts
/// every philosopher; they finish their current step and leave the table.
pub fn install(monitor: Monitor) -> Result<Shutdown> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        let mut delivered = false;
        for sig in signals.forever() {
            if delivered {
                warn!("received signal {sig} again, still waiting for philosophers to leave");
                continue;
            }
            info!("received signal {sig}, asking philosophers to leave");
            for id in 0..monitor.len() {
                monitor.interrupt(id);
            }
            delivered = true;
        }
    });

    Ok(Shutdown { handle, thread })
}
