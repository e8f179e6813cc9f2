use anyhow::{Context, bail};
use clap::Parser;
use log::{debug, info};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scrollplay::cli::Args;
use scrollplay::host::{FrameSink, Host, IndicatorStyle, ProgressSurface, ViewportMetrics};
use scrollplay::preload::FileLoader;
use scrollplay::player::{PlayerOptions, ScrollPlayer};
use scrollplay::sequence::FrameSequence;

/// Simulated page: fixed layout, offset driven by the sweep loop
struct SimViewport {
    content: f64,
    viewport: f64,
    offset: Mutex<f64>,
}

impl SimViewport {
    fn new() -> Self {
        Self {
            content: 4000.0,
            viewport: 1000.0,
            offset: Mutex::new(0.0),
        }
    }

    fn set_offset(&self, offset: f64) {
        *self.offset.lock().unwrap() = offset;
    }
}

impl ViewportMetrics for SimViewport {
    fn content_height(&self) -> f64 {
        self.content
    }
    fn viewport_height(&self) -> f64 {
        self.viewport
    }
    fn scroll_offset(&self) -> f64 {
        *self.offset.lock().unwrap()
    }
}

/// Display surface that logs every frame change
struct ConsoleSink;

impl FrameSink for ConsoleSink {
    fn set_source(&self, source: &str) {
        info!("frame -> {}", source);
    }
}

/// Single-line console progress bar
struct ConsoleProgress {
    width: usize,
}

impl ProgressSurface for ConsoleProgress {
    fn set_fill_percent(&self, percent: u32) {
        let filled = self.width * percent as usize / 100;
        let mut out = std::io::stderr().lock();
        let _ = write!(
            out,
            "\r[{}{}] {:>3}%",
            "=".repeat(filled),
            " ".repeat(self.width - filled),
            percent
        );
        if percent == 0 {
            let _ = writeln!(out);
        }
        let _ = out.flush();
    }
}

/// Host with a single known image element, "viewer"
struct SimHost;

impl Host for SimHost {
    fn frame_sink(&self, id: &str) -> Option<Arc<dyn FrameSink>> {
        (id == "viewer").then(|| Arc::new(ConsoleSink) as Arc<dyn FrameSink>)
    }

    fn create_progress_surface(
        &self,
        id: &str,
        style: &IndicatorStyle,
    ) -> Arc<dyn ProgressSurface> {
        debug!("progress surface '{}' ({}px, {})", id, style.height_px, style.color);
        Arc::new(ConsoleProgress { width: 40 })
    }
}

fn options_from(args: &Args) -> anyhow::Result<PlayerOptions> {
    if let Some(path) = &args.options {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options bundle {}", path.display()))?;
        return serde_json::from_str(&text).context("parsing options bundle");
    }
    Ok(PlayerOptions {
        preload_on_init: !args.no_preload,
        show_progress: !args.no_progress,
        progress_color: args.progress_color.clone(),
        autoplay: args.autoplay,
        verbose: args.verbosity >= 1,
        failure_policy: args.policy.into(),
        load_timeout_ms: args.timeout_ms,
        ..Default::default()
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = match args.verbosity {
        0 | 1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    debug!("Command-line args: {:?}", args);

    let sequence = FrameSequence::discover(&args.pattern)?;
    if sequence.is_empty() {
        bail!("no frames matched '{}'", args.pattern);
    }
    info!("Playing {} frames from '{}'", sequence.len(), args.pattern);

    let options = options_from(&args)?;
    let autoplay = options.autoplay;
    let preloading = options.preload_on_init;

    let viewport = Arc::new(SimViewport::new());
    let mut player = ScrollPlayer::new(
        Arc::new(SimHost),
        viewport.clone(),
        Arc::new(FileLoader),
        "viewer",
        sequence,
        options,
    )?;

    if preloading {
        let started = Instant::now();
        player.wait_preload();
        info!("Preload finished in {:.2?}", started.elapsed());
    } else if autoplay {
        player.start_autoplay();
    } else {
        player.show_current_image();
        player.attach_scroll_selection();
    }

    // Pump the player for the requested duration. In autoplay mode the
    // clock drives frames; otherwise sweep the simulated scroll from top
    // to bottom once.
    let run_for = Duration::from_secs_f64(args.duration.max(0.0));
    let extent = viewport.content - viewport.viewport;
    let started = Instant::now();
    while started.elapsed() < run_for {
        if !player.is_autoplaying() {
            let progress = started.elapsed().as_secs_f64() / run_for.as_secs_f64();
            viewport.set_offset(extent * progress.min(1.0));
        }
        player.update();
        std::thread::sleep(Duration::from_millis(4));
    }

    info!("Done");
    Ok(())
}
