//! Keep-alive
//!
//! Background thread that sends heartbeats on a fixed cadence.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::SharedWriter;
use crate::protocol::FrameWriter;

/// Running heartbeat sender; stops when dropped
pub struct KeepAlive {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeepAlive {
    /// Start sending a heartbeat every `interval` through `writer`.
    ///
    /// The thread exits on the first failed send.
    pub fn spawn<W, F>(writer: SharedWriter<W>, encoder: F, interval: Duration) -> Self
    where
        W: Write + Send + 'static,
        F: FrameWriter + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut next = Instant::now() + interval;

            loop {
                if flag.load(Ordering::Acquire) {
                    break;
                }

                let now = Instant::now();
                if now < next {
                    thread::park_timeout(next - now);
                    continue;
                }

                if let Err(e) = writer.send_heartbeat(&encoder) {
                    tracing::debug!("Keep-alive stopped: {}", e);
                    break;
                }
                next += interval;
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Check if the sender thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop sending and wait for the thread
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}
