//! Worker pool for background image loading
//!
//! Crossbeam MPMC queue with closure-based task execution. Preload jobs
//! are enqueued here so decoding never blocks the caller's event loop;
//! completions come back over the preload channel in finish order.

use crossbeam_channel::{Sender, unbounded};
use log::{debug, error};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker pool for IO-bound load tasks.
///
/// Each submitted closure carries its own captured state. The pool is
/// created once per player and shared by every preload invocation.
///
/// # Example
/// ```ignore
/// let workers = Workers::new(4);
/// workers.execute(move || {
///     let result = loader.load(&source);
///     tx.send(result).ok();
/// });
/// ```
pub struct Workers {
    sender: Sender<Job>,
    _handles: Vec<thread::JoinHandle<()>>, // Held so the threads outlive the pool
}

impl Workers {
    /// Spin up `num_threads` workers (at least one).
    ///
    /// Recommended: [`Workers::default_threads`] (leave 25% for the
    /// caller's event loop).
    pub fn new(num_threads: usize) -> Self {
        let (tx, rx): (Sender<Job>, _) = unbounded();
        let mut handles = Vec::new();

        for worker_id in 0..num_threads.max(1) {
            let rx = rx.clone();

            let handle = thread::Builder::new()
                .name(format!("scrollplay-worker-{}", worker_id))
                .spawn(move || {
                    debug!("Worker {} up", worker_id);

                    // Drain jobs until the sender side goes away
                    while let Ok(job) = rx.recv() {
                        job();
                    }

                    debug!("Worker {} down", worker_id);
                })
                .expect("worker thread spawn");

            handles.push(handle);
        }

        debug!("Pool ready with {} worker threads", num_threads.max(1));

        Self {
            sender: tx,
            _handles: handles,
        }
    }

    /// Default pool size: three quarters of the available cores.
    pub fn default_threads() -> usize {
        (num_cpus::get() * 3 / 4).max(1)
    }

    /// Hand a closure to the pool; it runs on whichever worker picks it
    /// up first. Nothing comes back directly - results travel over a
    /// channel the closure captures.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.sender.send(Box::new(f)) {
            error!("Job queue rejected submission: {}", e);
        }
    }
}

// Drop: sender drops, channel closes, workers exit their recv() loop
impl Drop for Workers {
    fn drop(&mut self) {
        debug!("Releasing pool of {} worker threads", self._handles.len());
    }
}
