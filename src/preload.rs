//! Image preloading with fractional progress reporting
//!
//! **Why**: Scrubbing and autoplay need every frame decodable without
//! load latency, so all sources are requested up front. Loads run on the
//! worker pool; completions come back over a channel in finish order
//! (NOT request order - network/disk timing decides), one progress
//! emission per completed load, terminating with a single Done.
//!
//! **Used by**: Player (auto-preload on construction, `update()` pump),
//! demo binary (blocking preload before playback)
//!
//! # Failure policy
//!
//! A source that never loads must not stall the stream forever. A failed
//! or timed-out source is surfaced per the configured policy: fail-fast
//! (first failure aborts the stream) or skip-and-continue (count it,
//! keep going, report the count in Done).
//!
//! # Lifecycle
//!
//! A [`Preload`] is single-use: it owns a fresh [`PreloadSet`] and is
//! discarded once resolved. Starting another preload re-requests every
//! source - there is no dedup or caching across invocations.

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::PlayerError;
use crate::sequence::FrameSequence;
use crate::workers::Workers;

/// Metadata of a successfully decoded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
}

/// The injected image-loading primitive.
///
/// Runs on worker threads; implementations block until the source is
/// loaded or fails. In-flight loads are not cancellable.
pub trait SourceLoader: Send + Sync {
    fn load(&self, source: &str) -> Result<LoadedImage, PlayerError>;
}

/// Default loader: decodes image files from disk with the `image` crate.
#[derive(Debug, Default)]
pub struct FileLoader;

impl SourceLoader for FileLoader {
    fn load(&self, source: &str) -> Result<LoadedImage, PlayerError> {
        let img = image::open(source).map_err(|e| PlayerError::Load {
            source: source.to_string(),
            reason: e.to_string(),
        })?;
        trace!("Loaded {} ({}x{})", source, img.width(), img.height());
        Ok(LoadedImage {
            width: img.width(),
            height: img.height(),
        })
    }
}

/// Per-source load state, written by workers
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Pending,
    Loading,
    Loaded(LoadedImage),
    Failed(String),
}

/// Shared handle to one in-flight or completed load
#[derive(Debug, Clone)]
pub struct LoadHandle {
    status: Arc<Mutex<LoadStatus>>,
}

impl LoadHandle {
    fn new() -> Self {
        Self {
            status: Arc::new(Mutex::new(LoadStatus::Pending)),
        }
    }

    fn set(&self, status: LoadStatus) {
        if let Ok(mut guard) = self.status.lock() {
            *guard = status;
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or(LoadStatus::Failed("status lock poisoned".to_string()))
    }
}

/// One handle per source, created fresh for each preload invocation
#[derive(Debug, Default)]
pub struct PreloadSet {
    handles: Vec<(String, LoadHandle)>,
}

impl PreloadSet {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handle(&self, source: &str) -> Option<&LoadHandle> {
        self.handles
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, h)| h)
    }
}

/// How load failures and timeouts propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// First failure aborts the whole preload
    FailFast,
    /// Failures are counted and reported; the rest of the set proceeds
    #[default]
    SkipAndContinue,
}

/// Progress stream emissions, in completion order
#[derive(Debug, Clone, PartialEq)]
pub enum PreloadEvent {
    /// One source finished loading. `fraction` = loaded / total, in (0, 1].
    Loaded {
        completed: usize,
        total: usize,
        fraction: f64,
    },
    /// One source failed (or timed out)
    Failed { source: String, reason: String },
    /// Terminal: every source is accounted for
    Done { loaded: usize, failed: usize },
}

/// Final accounting of a resolved preload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreloadSummary {
    pub loaded: usize,
    pub failed: usize,
}

struct Completion {
    source: String,
    result: Result<LoadedImage, PlayerError>,
}

/// A single preload invocation: lazy, finite, non-restartable.
///
/// Created by [`Preload::start`]; pump it with [`poll`](Preload::poll)
/// from an event loop or block on
/// [`run_to_completion`](Preload::run_to_completion).
pub struct Preload {
    rx: Receiver<Completion>,
    set: PreloadSet,
    total: usize,
    loaded: usize,
    failed: usize,
    policy: LoadFailurePolicy,
    deadline: Option<Instant>,
    finished: bool,
    error: Option<PlayerError>,
}

impl Preload {
    /// Request every source in the sequence exactly once.
    ///
    /// Jobs are enqueued immediately on `workers`; the returned stream
    /// observes their completions. An empty sequence resolves on the
    /// first poll with `Done { 0, 0 }`.
    pub fn start(
        workers: &Workers,
        loader: Arc<dyn SourceLoader>,
        sequence: &FrameSequence,
        policy: LoadFailurePolicy,
        timeout: Option<Duration>,
    ) -> Self {
        let (tx, rx) = unbounded();
        let mut set = PreloadSet::default();

        for source in sequence.sources() {
            let handle = LoadHandle::new();
            set.handles.push((source.clone(), handle.clone()));

            let tx = tx.clone();
            let loader = loader.clone();
            let source = source.clone();
            workers.execute(move || {
                handle.set(LoadStatus::Loading);
                let result = loader.load(&source);
                match &result {
                    Ok(img) => handle.set(LoadStatus::Loaded(*img)),
                    Err(e) => handle.set(LoadStatus::Failed(e.to_string())),
                }
                // Receiver may already be gone (fail-fast abort); that's fine
                let _ = tx.send(Completion { source, result });
            });
        }

        debug!(
            "Preload started: {} sources, policy {:?}, timeout {:?}",
            sequence.len(),
            policy,
            timeout
        );

        Self {
            rx,
            set,
            total: sequence.len(),
            loaded: 0,
            failed: 0,
            policy,
            deadline: timeout.map(|t| Instant::now() + t),
            finished: false,
            error: None,
        }
    }

    /// Drain pending completions without blocking.
    ///
    /// Returns the events produced since the last poll; once `Done` (or
    /// a fail-fast abort) has been returned, subsequent polls are empty.
    pub fn poll(&mut self) -> Vec<PreloadEvent> {
        if self.finished {
            return Vec::new();
        }

        let mut events = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.account(completion, &mut events);
            if self.finished {
                return events;
            }
        }
        self.check_deadline(&mut events);
        self.check_done(&mut events);
        events
    }

    /// Block until the stream resolves, returning every emission.
    ///
    /// Under fail-fast the first failure resolves the stream early with
    /// the error recorded (retrievable via [`error`](Preload::error)).
    pub fn run_to_completion(&mut self) -> Vec<PreloadEvent> {
        let mut events = Vec::new();
        while !self.finished {
            let wait = match self.deadline {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(Duration::from_millis(50)),
                None => Duration::from_millis(50),
            };
            match self.rx.recv_timeout(wait) {
                Ok(completion) => self.account(completion, &mut events),
                Err(_) => self.check_deadline(&mut events),
            }
            self.check_done(&mut events);
        }
        events
    }

    fn account(&mut self, completion: Completion, events: &mut Vec<PreloadEvent>) {
        match completion.result {
            Ok(_) => {
                self.loaded += 1;
                events.push(PreloadEvent::Loaded {
                    completed: self.loaded,
                    total: self.total,
                    fraction: self.loaded as f64 / self.total as f64,
                });
            }
            Err(err) => {
                self.failed += 1;
                let reason = match &err {
                    PlayerError::Load { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                events.push(PreloadEvent::Failed {
                    source: completion.source.clone(),
                    reason,
                });
                if self.policy == LoadFailurePolicy::FailFast {
                    warn!("Preload aborted (fail-fast): {}", err);
                    self.error = Some(err);
                    self.finished = true;
                    return;
                }
                warn!("Preload skipping failed source '{}'", completion.source);
            }
        }
        self.check_done(events);
    }

    /// Past the deadline, everything still outstanding counts as failed.
    fn check_deadline(&mut self, events: &mut Vec<PreloadEvent>) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if Instant::now() < deadline || self.finished {
            return;
        }
        // Completions racing the deadline win: drain anything already
        // delivered before classifying stragglers, so a finished load is
        // never dropped or miscounted
        while let Ok(completion) = self.rx.try_recv() {
            self.account(completion, events);
            if self.finished {
                return;
            }
        }
        let outstanding: Vec<(String, LoadHandle)> = self
            .set
            .handles
            .iter()
            .filter(|(_, h)| matches!(h.status(), LoadStatus::Pending | LoadStatus::Loading))
            .cloned()
            .collect();
        for (source, handle) in outstanding {
            warn!("Preload timed out waiting for '{}'", source);
            handle.set(LoadStatus::Failed("load timed out".to_string()));
            self.failed += 1;
            events.push(PreloadEvent::Failed {
                source: source.clone(),
                reason: "load timed out".to_string(),
            });
            if self.policy == LoadFailurePolicy::FailFast {
                self.error = Some(PlayerError::Load {
                    source,
                    reason: "load timed out".to_string(),
                });
                self.finished = true;
                return;
            }
        }
    }

    fn check_done(&mut self, events: &mut Vec<PreloadEvent>) {
        if !self.finished && self.loaded + self.failed >= self.total {
            debug!(
                "Preload done: {} loaded, {} failed of {}",
                self.loaded, self.failed, self.total
            );
            events.push(PreloadEvent::Done {
                loaded: self.loaded,
                failed: self.failed,
            });
            self.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of sources loaded so far, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.loaded as f64 / self.total as f64
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// The fail-fast abort error, if the stream resolved that way.
    pub fn error(&self) -> Option<&PlayerError> {
        self.error.as_ref()
    }

    pub fn summary(&self) -> PreloadSummary {
        PreloadSummary {
            loaded: self.loaded,
            failed: self.failed,
        }
    }

    /// The per-source handles of this invocation.
    pub fn set(&self) -> &PreloadSet {
        &self.set
    }
}
