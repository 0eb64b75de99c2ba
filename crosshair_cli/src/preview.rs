/*!
Render preview.

Drives a [`RenderEngine`] and prints every frame it emits. Two modes:

1. Simulated clock: a fixed number of frames with timestamps spaced at the
   configured frame rate, rendered synchronously.
2. Live: a render thread ticks the engine from the wall clock and hands
   finished frames to a writer thread over a bounded channel, until the
   frame limit is reached or the running flag is cleared.
*/

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use crosshair_core::render::replay;
use crosshair_core::{DrawCommand, DrawSurface, RenderEngine, RenderStats, Rgba};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// How frames are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FrameFormat {
    /// One primitive per line
    #[default]
    Text,
    /// One JSON object per frame
    Json,
}

/// A frame ready to be written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFrame {
    pub index: u64,
    pub timestamp: f64,
    pub commands: Vec<DrawCommand>,
}

/// Drawing surface that prints primitives as text.
///
/// Write errors are held until [`TextSurface::finish`], since the
/// drawing calls cannot fail.
pub struct TextSurface<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    /// Write the frame header line
    pub fn begin_frame(&mut self, index: u64, timestamp: f64, primitives: usize) {
        self.emit(format_args!("frame {index} t={timestamp:.3}s primitives={primitives}\n"));
    }

    /// Return the writer, or the first write error
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.writer),
        }
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if self.error.is_none() {
            if let Err(e) = self.writer.write_fmt(args) {
                self.error = Some(e);
            }
        }
    }
}

fn describe(color: Rgba) -> String {
    format!("{} a={}", color.hex(), color.alpha)
}

impl<W: Write> DrawSurface for TextSurface<W> {
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, width: f32) {
        self.emit(format_args!(
            "  line ({x1:.1}, {y1:.1}) -> ({x2:.1}, {y2:.1}) {} w={width:.1}\n",
            describe(color)
        ));
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, radius_x: f32, radius_y: f32, color: Rgba) {
        self.emit(format_args!(
            "  ellipse ({cx:.1}, {cy:.1}) r={radius_x:.2}x{radius_y:.2} {}\n",
            describe(color)
        ));
    }
}

/// Write one frame in the chosen format
pub fn write_frame<W: Write>(
    writer: &mut W,
    frame: &RenderedFrame,
    format: FrameFormat,
) -> io::Result<()> {
    match format {
        FrameFormat::Text => {
            let mut surface = TextSurface::new(&mut *writer);
            surface.begin_frame(frame.index, frame.timestamp, frame.commands.len());
            replay(&frame.commands, &mut surface);
            surface.finish()?;
        }
        FrameFormat::Json => {
            serde_json::to_writer(&mut *writer, frame)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

/// Preview settings shared by both modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSettings {
    pub frames_per_second: u32,
    pub center_x: f32,
    pub center_y: f32,
    pub channel_capacity: usize,
    pub format: FrameFormat,
}

impl PreviewSettings {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second.max(1)))
    }
}

/// Render `frames` frames on a simulated clock starting at zero
pub fn render_simulated<W: Write>(
    engine: &mut RenderEngine,
    settings: &PreviewSettings,
    frames: u64,
    writer: &mut W,
) -> Result<()> {
    let interval = settings.frame_interval().as_secs_f64();
    for index in 0..frames {
        let timestamp = index as f64 * interval;
        let commands = engine.render(timestamp, settings.center_x, settings.center_y);
        let frame = RenderedFrame { index, timestamp, commands };
        write_frame(writer, &frame, settings.format)?;
    }
    writer.flush()?;
    Ok(())
}

/// Threaded wall-clock preview
pub struct LivePreview {
    engine: RenderEngine,
    settings: PreviewSettings,
    frame_limit: Option<u64>,
    running: Arc<AtomicBool>,
}

impl LivePreview {
    pub fn new(engine: RenderEngine, settings: PreviewSettings, frame_limit: Option<u64>) -> Self {
        Self {
            engine,
            settings,
            frame_limit,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get a reference to the running flag for external control
    pub fn get_running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run until stopped, printing to stdout
    pub fn start(self) -> Result<RenderStats> {
        let (stats, _) = self.start_with_writer(io::stdout())?;
        Ok(stats)
    }

    /// Run until stopped, printing to `writer`, and hand the writer back
    pub fn start_with_writer<W: Write + Send + 'static>(
        self,
        writer: W,
    ) -> Result<(RenderStats, W)> {
        let (frame_tx, frame_rx) = bounded::<RenderedFrame>(self.settings.channel_capacity.max(1));

        let running_render = Arc::clone(&self.running);
        let running_writer = Arc::clone(&self.running);
        let settings = self.settings;
        let frame_limit = self.frame_limit;
        let engine = self.engine;

        let render_handle = thread::spawn(move || {
            Self::render_thread(engine, settings, frame_limit, frame_tx, running_render)
        });

        let writer_handle = thread::spawn(move || {
            let running = Arc::clone(&running_writer);
            match Self::writer_thread(writer, frame_rx, settings.format, running) {
                Ok(writer) => Ok(writer),
                Err(e) => {
                    error!("Frame writer failed: {}", e);
                    running_writer.store(false, Ordering::SeqCst);
                    Err(e)
                }
            }
        });

        let stats = render_handle
            .join()
            .map_err(|_| anyhow!("Render thread panicked"))?;
        let writer = writer_handle
            .join()
            .map_err(|_| anyhow!("Writer thread panicked"))??;

        Ok((stats, writer))
    }

    /// Ticks the engine at the frame rate and forwards frames to the writer
    fn render_thread(
        mut engine: RenderEngine,
        settings: PreviewSettings,
        frame_limit: Option<u64>,
        frame_tx: Sender<RenderedFrame>,
        running: Arc<AtomicBool>,
    ) -> RenderStats {
        let interval = settings.frame_interval();
        let start_time = Instant::now();
        let mut next_tick = start_time;
        let mut index = 0u64;
        let mut dropped = 0u64;

        info!("🎯 Render thread started ({} fps)", settings.frames_per_second);

        while running.load(Ordering::SeqCst) {
            if frame_limit.is_some_and(|limit| index >= limit) {
                break;
            }

            let timestamp = start_time.elapsed().as_secs_f64();
            let commands = engine.render(timestamp, settings.center_x, settings.center_y);
            let frame = RenderedFrame { index, timestamp, commands };

            match frame_tx.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    dropped += 1;
                    warn!("Frame channel full, dropping frame {}", index);
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("Writer has stopped, ending render loop");
                    break;
                }
            }
            index += 1;

            next_tick += interval;
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            } else {
                // Running behind; restart the schedule from here
                next_tick = now;
            }
        }

        let stats = engine.stats();
        info!("📊 Render thread final stats:");
        info!("   Frames rendered: {}", stats.frames_rendered);
        info!("   Fallback frames: {}", stats.fallback_frames);
        info!("   Recoil frames: {}", stats.recoil_frames);
        info!("   Primitives emitted: {}", stats.primitives_emitted);
        info!("   Frames dropped: {}", dropped);
        info!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());

        stats
    }

    /// Prints frames as they arrive, draining the channel on shutdown
    fn writer_thread<W: Write>(
        mut writer: W,
        frame_rx: Receiver<RenderedFrame>,
        format: FrameFormat,
        running: Arc<AtomicBool>,
    ) -> Result<W> {
        let mut written = 0u64;

        while running.load(Ordering::SeqCst) || !frame_rx.is_empty() {
            match frame_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(frame) => {
                    write_frame(&mut writer, &frame, format)?;
                    writer.flush()?;
                    written += 1;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Frame channel disconnected - render thread has stopped");
                    break;
                }
            }
        }

        info!("📝 Frames written: {}", written);
        Ok(writer)
    }
}
