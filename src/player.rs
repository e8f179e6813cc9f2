//! Scroll-driven sequence player
//!
//! **Why**: One display surface, one ordered frame list, two ways to pick
//! the shown frame: continuous scroll position (scrubbing) or a fixed
//! 24 ticks/s autoplay clock. Preload runs first so neither mode stalls
//! on decode latency.
//!
//! **Used by**: Demo binary, host applications embedding the player
//!
//! # Timing Model
//!
//! Cooperative: the host calls [`ScrollPlayer::update`] from its event
//! loop. `update()` drains preload completions and steps the active
//! mode. Autoplay advances when 1/24 s has elapsed since the last tick
//! (best-effort, no catch-up on missed ticks).
//!
//! # Modes
//!
//! Scroll-driven and autoplay are mutually exclusive by construction: a
//! tagged mode state with a single active variant. Entering a mode
//! detaches whatever was active before; starting an already-active mode
//! is a no-op.

use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::PlayerError;
use crate::host::{FrameSink, Host, IndicatorStyle, ViewportMetrics};
use crate::preload::{LoadFailurePolicy, Preload, PreloadEvent, SourceLoader};
use crate::progress::ProgressIndicator;
use crate::scroll::{self, ScrollEvents, ScrollUnit};
use crate::sequence::FrameSequence;
use crate::workers::Workers;

/// Fixed autoplay cadence
pub const AUTOPLAY_TICKS_PER_SECOND: f64 = 24.0;

/// Construction-time configuration bundle.
///
/// Serde-derived with per-field defaults so a partial JSON bundle fills
/// in the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PlayerOptions {
    /// Begin preloading immediately on construction
    pub preload_on_init: bool,
    /// Render a progress indicator during preload
    pub show_progress: bool,
    /// Indicator fill color
    pub progress_color: String,
    /// Indicator bar height in pixels
    pub progress_height: u32,
    /// After preload, loop playback instead of attaching scroll selection
    pub autoplay: bool,
    /// Per-emission preload progress logs
    pub verbose: bool,
    /// How load failures propagate
    pub failure_policy: LoadFailurePolicy,
    /// Give up on sources still outstanding after this many milliseconds
    pub load_timeout_ms: Option<u64>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            preload_on_init: true,
            show_progress: true,
            progress_color: "#dadada".to_string(),
            progress_height: 10,
            autoplay: false,
            verbose: false,
            failure_policy: LoadFailurePolicy::default(),
            load_timeout_ms: None,
        }
    }
}

/// Single active variant: scroll selection and autoplay never coexist.
enum Mode {
    Idle,
    ScrollDriven { events: ScrollEvents },
    Autoplay { cursor: usize, last_tick: Option<Instant> },
}

/// Scroll-driven image sequence player.
///
/// Construction looks up the target surface (failing with
/// [`PlayerError::Configuration`] before any other side effect) and,
/// unless disabled, starts preloading. Pump with `update()`.
pub struct ScrollPlayer {
    host: Arc<dyn Host>,
    metrics: Arc<dyn ViewportMetrics>,
    loader: Arc<dyn SourceLoader>,
    workers: Workers,
    sink: Arc<dyn FrameSink>,
    target_id: String,
    sequence: FrameSequence,
    options: PlayerOptions,
    indicator: ProgressIndicator,
    preload: Option<Preload>,
    mode: Mode,
}

impl ScrollPlayer {
    pub fn new(
        host: Arc<dyn Host>,
        metrics: Arc<dyn ViewportMetrics>,
        loader: Arc<dyn SourceLoader>,
        target_id: &str,
        sequence: FrameSequence,
        options: PlayerOptions,
    ) -> Result<Self, PlayerError> {
        // Target lookup comes first: a bad id must fail before any
        // preload request goes out
        let sink = host.frame_sink(target_id).ok_or_else(|| {
            PlayerError::Configuration(format!(
                "no element '{}' - did you set the correct id?",
                target_id
            ))
        })?;

        if sequence.is_empty() {
            warn!("[{}] empty frame sequence, player is inert", target_id);
        }

        let style = IndicatorStyle {
            height_px: options.progress_height,
            color: options.progress_color.clone(),
        };

        let mut player = Self {
            host,
            metrics,
            loader,
            workers: Workers::new(Workers::default_threads()),
            sink,
            target_id: target_id.to_string(),
            sequence,
            options,
            indicator: ProgressIndicator::new(target_id, style),
            preload: None,
            mode: Mode::Idle,
        };

        if player.options.preload_on_init {
            player.preload();
        }

        Ok(player)
    }

    /// (Re)start the preload operation, returning the in-flight stream.
    ///
    /// A fresh request set is created every call - no dedup across
    /// invocations. Progress is consumed by `update()`: the indicator
    /// fill follows each emission and resets to 0 on completion. The
    /// returned handle serves fraction/status queries; `update()` also
    /// hands back the drained emissions for external observers.
    pub fn preload(&mut self) -> &Preload {
        if self.options.show_progress {
            self.indicator.create(self.host.as_ref());
            let _ = self.indicator.set_percent(0);
        }
        self.preload.insert(Preload::start(
            &self.workers,
            self.loader.clone(),
            &self.sequence,
            self.options.failure_policy,
            self.options.load_timeout_ms.map(Duration::from_millis),
        ))
    }

    /// Cooperative pump: drain preload progress, step the active mode.
    ///
    /// Returns the preload emissions drained by this call (empty once
    /// the preload has resolved), so consumers can observe the progress
    /// stream without a custom progress surface.
    pub fn update(&mut self) -> Vec<PreloadEvent> {
        let events = self.pump_preload();
        self.step_mode();
        events
    }

    fn pump_preload(&mut self) -> Vec<PreloadEvent> {
        let Some(preload) = self.preload.as_mut() else {
            return Vec::new();
        };

        let events = preload.poll();
        for event in &events {
            match event {
                PreloadEvent::Loaded { fraction, .. } => {
                    if self.options.verbose {
                        info!("[{}] preloaded {:.2} %", self.target_id, fraction * 100.0);
                    }
                    if self.options.show_progress {
                        let percent = (fraction * 100.0).round() as u32;
                        if let Err(e) = self.indicator.set_percent(percent) {
                            error!("{}", e);
                        }
                    }
                }
                PreloadEvent::Failed { source, reason } => {
                    debug!("[{}] load failed: {} ({})", self.target_id, source, reason);
                }
                PreloadEvent::Done { loaded, failed } => {
                    info!(
                        "[{}] preload done: {} loaded, {} failed",
                        self.target_id, loaded, failed
                    );
                    if self.options.show_progress {
                        let _ = self.indicator.set_percent(0);
                    }
                }
            }
        }

        if !preload.is_finished() {
            return events;
        }

        // Resolved: discard the request set and enter the configured mode
        let Some(preload) = self.preload.take() else {
            return events;
        };
        if let Some(err) = preload.error() {
            error!("[{}] preload aborted: {}", self.target_id, err);
            return events;
        }
        if self.options.autoplay {
            self.start_autoplay();
        } else {
            self.show_current_image();
            self.attach_scroll_selection();
        }
        events
    }

    fn step_mode(&mut self) {
        let mut tick_due = false;
        match &mut self.mode {
            Mode::Idle => {}
            Mode::ScrollDriven { events } => {
                // Every observed change is a synchronous sink write
                if let Some(fraction) = events.poll() {
                    if !self.sequence.is_empty() {
                        let index = scroll::frame_index_for(fraction, self.sequence.len());
                        if let Some(source) = self.sequence.source_at(index) {
                            self.sink.set_source(source);
                        }
                    }
                }
            }
            Mode::Autoplay { last_tick, .. } => {
                let now = Instant::now();
                let frame_duration = Duration::from_secs_f64(1.0 / AUTOPLAY_TICKS_PER_SECOND);
                let due = match last_tick {
                    None => true,
                    Some(last) => now.duration_since(*last) >= frame_duration,
                };
                if due {
                    *last_tick = Some(now);
                    tick_due = true;
                }
            }
        }
        if tick_due {
            self.autoplay_tick();
        }
    }

    /// Display the current autoplay frame and advance with wrap-around.
    fn autoplay_tick(&mut self) {
        let Mode::Autoplay { cursor, .. } = &mut self.mode else {
            return;
        };
        if self.sequence.is_empty() {
            return;
        }
        let current = *cursor;
        *cursor = if current + 1 < self.sequence.len() {
            current + 1
        } else {
            0
        };
        if let Some(source) = self.sequence.source_at(current) {
            self.sink.set_source(source);
        }
    }

    /// Enter scroll-driven mode: frames follow the viewport's scroll
    /// fraction until detached or another mode takes over.
    ///
    /// Re-attaching creates a fresh subscription (cold stream).
    pub fn attach_scroll_selection(&mut self) {
        debug!("[{}] scroll selection attached", self.target_id);
        self.mode = Mode::ScrollDriven {
            events: ScrollEvents::new(self.metrics.clone(), ScrollUnit::Fraction),
        };
    }

    /// Start the 24 ticks/s autoplay loop from frame 0.
    ///
    /// Idempotent: a second start while running is a no-op.
    pub fn start_autoplay(&mut self) {
        if matches!(self.mode, Mode::Autoplay { .. }) {
            trace!("[{}] autoplay already running", self.target_id);
            return;
        }
        debug!("[{}] autoplay started", self.target_id);
        self.mode = Mode::Autoplay {
            cursor: 0,
            last_tick: None,
        };
    }

    /// Stop autoplay. Idempotent; a later start replays from frame 0.
    pub fn stop_autoplay(&mut self) {
        if matches!(self.mode, Mode::Autoplay { .. }) {
            debug!("[{}] autoplay stopped", self.target_id);
            self.mode = Mode::Idle;
        }
    }

    /// Release whatever mode is active (scroll subscription or autoplay).
    pub fn detach(&mut self) {
        self.mode = Mode::Idle;
    }

    /// One-shot paint of the scroll-indexed frame (initial paint before
    /// any scroll has occurred).
    pub fn show_current_image(&mut self) {
        if self.sequence.is_empty() {
            warn!("[{}] show_current_image on empty sequence", self.target_id);
            return;
        }
        let fraction = scroll::scroll_fraction(self.metrics.as_ref());
        let index = scroll::frame_index_for(fraction, self.sequence.len());
        self.show_image(index);
    }

    /// Display the frame at `index`, clamped to the sequence bounds.
    pub fn show_image(&mut self, index: usize) {
        match self.sequence.source_at(index) {
            Some(source) => self.sink.set_source(source),
            None => warn!("[{}] show_image on empty sequence", self.target_id),
        }
    }

    pub fn is_autoplaying(&self) -> bool {
        matches!(self.mode, Mode::Autoplay { .. })
    }

    pub fn is_scroll_driven(&self) -> bool {
        matches!(self.mode, Mode::ScrollDriven { .. })
    }

    /// True while a preload invocation is unresolved.
    pub fn preload_in_flight(&self) -> bool {
        self.preload.is_some()
    }

    /// Fraction of the in-flight preload, if any.
    pub fn preload_fraction(&self) -> Option<f64> {
        self.preload.as_ref().map(|p| p.fraction())
    }

    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Block until the current preload resolves (demo/runner helper).
    pub fn wait_preload(&mut self) {
        while self.preload.is_some() {
            self.update();
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ProgressSurface;
    use crate::preload::LoadedImage;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    struct RecordingSink {
        sources: Mutex<Vec<String>>,
    }

    impl FrameSink for RecordingSink {
        fn set_source(&self, source: &str) {
            self.sources.lock().unwrap().push(source.to_string());
        }
    }

    struct RecordingSurface {
        percents: Mutex<Vec<u32>>,
    }

    impl ProgressSurface for RecordingSurface {
        fn set_fill_percent(&self, percent: u32) {
            self.percents.lock().unwrap().push(percent);
        }
    }

    struct FakeHost {
        sink: Arc<RecordingSink>,
        surface: Arc<RecordingSurface>,
        known_id: String,
    }

    impl FakeHost {
        fn new(known_id: &str) -> Self {
            Self {
                sink: Arc::new(RecordingSink {
                    sources: Mutex::new(Vec::new()),
                }),
                surface: Arc::new(RecordingSurface {
                    percents: Mutex::new(Vec::new()),
                }),
                known_id: known_id.to_string(),
            }
        }

        fn last_source(&self) -> Option<String> {
            self.sink.sources.lock().unwrap().last().cloned()
        }
    }

    impl Host for FakeHost {
        fn frame_sink(&self, id: &str) -> Option<Arc<dyn FrameSink>> {
            (id == self.known_id).then(|| self.sink.clone() as Arc<dyn FrameSink>)
        }

        fn create_progress_surface(
            &self,
            _id: &str,
            _style: &IndicatorStyle,
        ) -> Arc<dyn ProgressSurface> {
            self.surface.clone()
        }
    }

    struct FakeViewport {
        content: f64,
        viewport: f64,
        offset: AtomicU64,
    }

    impl FakeViewport {
        fn new() -> Self {
            Self {
                content: 2000.0,
                viewport: 1000.0,
                offset: AtomicU64::new(0f64.to_bits()),
            }
        }

        fn set_offset(&self, offset: f64) {
            self.offset.store(offset.to_bits(), Ordering::Relaxed);
        }
    }

    impl ViewportMetrics for FakeViewport {
        fn content_height(&self) -> f64 {
            self.content
        }
        fn viewport_height(&self) -> f64 {
            self.viewport
        }
        fn scroll_offset(&self) -> f64 {
            f64::from_bits(self.offset.load(Ordering::Relaxed))
        }
    }

    struct InstantLoader {
        calls: AtomicUsize,
        fail_all: bool,
    }

    impl InstantLoader {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_all: false,
            }
        }
    }

    impl SourceLoader for InstantLoader {
        fn load(&self, source: &str) -> Result<LoadedImage, PlayerError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail_all {
                return Err(PlayerError::Load {
                    source: source.to_string(),
                    reason: "fake failure".to_string(),
                });
            }
            Ok(LoadedImage {
                width: 8,
                height: 8,
            })
        }
    }

    fn sources(n: usize) -> FrameSequence {
        FrameSequence::new((0..n).map(|i| format!("frame.{:04}.png", i)).collect())
    }

    fn build(
        host: &Arc<FakeHost>,
        viewport: &Arc<FakeViewport>,
        loader: &Arc<InstantLoader>,
        n: usize,
        options: PlayerOptions,
    ) -> Result<ScrollPlayer, PlayerError> {
        ScrollPlayer::new(
            host.clone() as Arc<dyn Host>,
            viewport.clone() as Arc<dyn ViewportMetrics>,
            loader.clone() as Arc<dyn SourceLoader>,
            "hero",
            sources(n),
            options,
        )
    }

    fn pump_until_preloaded(player: &mut ScrollPlayer) {
        for _ in 0..1000 {
            player.update();
            if !player.preload_in_flight() {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("preload did not resolve");
    }

    #[test]
    fn test_unknown_target_fails_before_any_load() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let result = ScrollPlayer::new(
            host.clone() as Arc<dyn Host>,
            viewport.clone() as Arc<dyn ViewportMetrics>,
            loader.clone() as Arc<dyn SourceLoader>,
            "missing",
            sources(3),
            PlayerOptions::default(),
        );

        assert!(matches!(result, Err(PlayerError::Configuration(_))));
        // Construction aborted before preload issued any request
        assert_eq!(loader.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_preload_then_scroll_mode() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let mut player = build(&host, &viewport, &loader, 5, PlayerOptions::default()).unwrap();
        pump_until_preloaded(&mut player);

        assert!(player.is_scroll_driven());
        assert_eq!(loader.calls.load(Ordering::Relaxed), 5);
        // Initial paint at offset 0 shows frame 0
        assert_eq!(host.last_source(), Some("frame.0000.png".to_string()));

        // Halfway through the scrollable extent selects index 2 of 5
        viewport.set_offset(500.0);
        player.update();
        assert_eq!(host.last_source(), Some("frame.0002.png".to_string()));

        // Unchanged position: no further sink writes
        let writes = host.sink.sources.lock().unwrap().len();
        player.update();
        assert_eq!(host.sink.sources.lock().unwrap().len(), writes);
    }

    #[test]
    fn test_preload_then_autoplay_mode() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            autoplay: true,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        pump_until_preloaded(&mut player);

        assert!(player.is_autoplaying());
    }

    #[test]
    fn test_autoplay_cadence_through_update() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        player.start_autoplay();

        // First pump ticks immediately; a back-to-back pump is not due yet
        player.update();
        player.update();
        assert_eq!(host.sink.sources.lock().unwrap().len(), 1);

        let start = Instant::now();
        while start.elapsed() < Duration::from_millis(500) {
            player.update();
            std::thread::sleep(Duration::from_millis(2));
        }

        let shown: Vec<String> = host.sink.sources.lock().unwrap().clone();
        // 24 ticks per second over 500 ms is about 12 advances after the
        // immediate first tick. Loose bounds absorb scheduler jitter.
        assert!(
            (6..=14).contains(&shown.len()),
            "expected roughly 12 writes over 500 ms, got {}",
            shown.len()
        );
        for (i, source) in shown.iter().enumerate() {
            assert_eq!(source, &format!("frame.{:04}.png", i % 3));
        }
    }

    #[test]
    fn test_update_hands_back_preload_emissions() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let mut player = build(&host, &viewport, &loader, 3, PlayerOptions::default()).unwrap();

        let mut all = Vec::new();
        for _ in 0..1000 {
            all.extend(player.update());
            if !player.preload_in_flight() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        let loaded = all
            .iter()
            .filter(|e| matches!(e, PreloadEvent::Loaded { .. }))
            .count();
        assert_eq!(loaded, 3);
        assert!(matches!(
            all.last(),
            Some(PreloadEvent::Done {
                loaded: 3,
                failed: 0
            })
        ));
        // Once resolved the stream is spent
        assert!(player.update().is_empty());
    }

    #[test]
    fn test_autoplay_cycles_with_wraparound() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        player.start_autoplay();

        for _ in 0..7 {
            player.autoplay_tick();
        }
        let shown: Vec<String> = host.sink.sources.lock().unwrap().clone();
        let expected: Vec<String> = [0, 1, 2, 0, 1, 2, 0]
            .iter()
            .map(|i| format!("frame.{:04}.png", i))
            .collect();
        assert_eq!(shown, expected);
    }

    #[test]
    fn test_autoplay_single_frame_wraps_to_itself() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 1, options).unwrap();
        player.start_autoplay();
        player.autoplay_tick();
        player.autoplay_tick();
        let shown: Vec<String> = host.sink.sources.lock().unwrap().clone();
        assert_eq!(shown, vec!["frame.0000.png", "frame.0000.png"]);
    }

    #[test]
    fn test_start_autoplay_idempotent() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        player.start_autoplay();
        player.autoplay_tick(); // cursor now at 1

        // Second start while running must not reset the cursor
        player.start_autoplay();
        player.autoplay_tick();
        assert_eq!(host.last_source(), Some("frame.0001.png".to_string()));
    }

    #[test]
    fn test_stop_autoplay_idempotent_and_restart_from_zero() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        player.start_autoplay();
        player.autoplay_tick();
        player.stop_autoplay();
        player.stop_autoplay();
        assert!(!player.is_autoplaying());

        player.start_autoplay();
        player.autoplay_tick();
        assert_eq!(host.last_source(), Some("frame.0000.png".to_string()));
    }

    #[test]
    fn test_modes_are_exclusive() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();

        player.start_autoplay();
        assert!(player.is_autoplaying());

        player.attach_scroll_selection();
        assert!(!player.is_autoplaying());
        assert!(player.is_scroll_driven());

        player.start_autoplay();
        assert!(!player.is_scroll_driven());
        assert!(player.is_autoplaying());

        player.detach();
        assert!(!player.is_autoplaying());
        assert!(!player.is_scroll_driven());
    }

    #[test]
    fn test_show_image_clamps_and_tolerates_empty() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let options = PlayerOptions {
            preload_on_init: false,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options.clone()).unwrap();
        player.show_image(99);
        assert_eq!(host.last_source(), Some("frame.0002.png".to_string()));

        let empty_host = Arc::new(FakeHost::new("hero"));
        let mut empty = ScrollPlayer::new(
            empty_host.clone() as Arc<dyn Host>,
            viewport.clone() as Arc<dyn ViewportMetrics>,
            loader.clone() as Arc<dyn SourceLoader>,
            "hero",
            FrameSequence::new(vec![]),
            options,
        )
        .unwrap();
        empty.show_image(0);
        empty.show_current_image();
        assert_eq!(empty_host.last_source(), None);
    }

    #[test]
    fn test_progress_indicator_driven_by_preload() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader::new());

        let mut player = build(&host, &viewport, &loader, 4, PlayerOptions::default()).unwrap();
        pump_until_preloaded(&mut player);

        let percents = host.surface.percents.lock().unwrap().clone();
        // Reset at start, 100 on the last emission, reset again on Done
        assert_eq!(percents.first(), Some(&0));
        assert_eq!(percents.last(), Some(&0));
        assert!(percents.contains(&100));
    }

    #[test]
    fn test_fail_fast_leaves_player_idle() {
        let host = Arc::new(FakeHost::new("hero"));
        let viewport = Arc::new(FakeViewport::new());
        let loader = Arc::new(InstantLoader {
            calls: AtomicUsize::new(0),
            fail_all: true,
        });

        let options = PlayerOptions {
            failure_policy: LoadFailurePolicy::FailFast,
            ..Default::default()
        };
        let mut player = build(&host, &viewport, &loader, 3, options).unwrap();
        pump_until_preloaded(&mut player);

        assert!(!player.is_autoplaying());
        assert!(!player.is_scroll_driven());
        assert_eq!(host.last_source(), None);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: PlayerOptions =
            serde_json::from_str(r#"{ "autoplay": true, "failure-policy": "fail-fast" }"#)
                .unwrap();
        assert!(options.autoplay);
        assert_eq!(options.failure_policy, LoadFailurePolicy::FailFast);
        assert!(options.preload_on_init);
        assert_eq!(options.progress_color, "#dadada");
        assert_eq!(options.progress_height, 10);
    }
}
