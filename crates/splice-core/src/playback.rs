//! # Playback Clock
//!
//! Advances the playhead from per-frame timestamps.
//!
//! ## Responsibilities
//! - **Transport**: `toggle`, `play`, `pause` and `seek` transitions between idle and playing.
//! - **Ticking**: `tick` turns the distance between two frame timestamps into a time step.
//! - **Frame sources**: [`FrameSource`] abstracts where timestamps come from, so the clock
//!   can be driven by a wall clock ([`RealtimeFrames`]) or a scripted list ([`ManualFrames`]).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of feeding one frame to the clock.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// The clock is idle; the frame was ignored.
    Idle,
    /// Playback advanced to the contained time.
    Advanced(f64),
    /// The playhead reached the end: playback stopped and rewound to 0.
    Ended,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackClock {
    pub current_time: f64,
    pub is_playing: bool,
    /// Timestamp (ms) of the previous frame while playing.
    last_frame_ms: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> playing (rewinding first when parked at or past the end), playing -> idle.
    pub fn toggle(&mut self, duration: f64) {
        if self.is_playing {
            self.pause();
        } else {
            self.play(duration);
        }
    }

    pub fn play(&mut self, duration: f64) {
        if self.is_playing {
            return;
        }
        if self.current_time >= duration {
            self.current_time = 0.0;
        }
        self.is_playing = true;
        self.last_frame_ms = None;
        debug!(time = self.current_time, "Playback started");
    }

    pub fn pause(&mut self) {
        if self.is_playing {
            debug!(time = self.current_time, "Playback paused");
        }
        self.is_playing = false;
        self.last_frame_ms = None;
    }

    /// Moves the playhead to `time` clamped to `[0, duration]`. Always pauses.
    pub fn seek(&mut self, time: f64, duration: f64) {
        self.pause();
        self.current_time = clamp_time(time, duration);
    }

    /// Per-frame callback. The first frame after `play` only establishes the reference
    /// timestamp.
    pub fn tick(&mut self, timestamp_ms: f64, duration: f64) -> TickOutcome {
        if !self.is_playing {
            return TickOutcome::Idle;
        }
        let delta = self
            .last_frame_ms
            .map(|last| ((timestamp_ms - last) / 1000.0).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(timestamp_ms);
        self.current_time += delta;

        if self.current_time >= duration {
            self.is_playing = false;
            self.last_frame_ms = None;
            self.current_time = 0.0;
            debug!(duration, "Playback reached the end");
            return TickOutcome::Ended;
        }
        TickOutcome::Advanced(self.current_time)
    }
}

/// Clamps a time value to `[0, duration]`, mapping NaN to 0.
pub fn clamp_time(time: f64, duration: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, duration.max(0.0))
}

/// Source of animation-frame timestamps, in milliseconds.
pub trait FrameSource {
    /// Blocks until the next frame is due. `None` ends the stream.
    fn next_frame(&mut self) -> Option<f64>;
}

/// Replays a fixed list of timestamps; used to drive playback deterministically.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    frames: VecDeque<f64>,
}

impl ManualFrames {
    pub fn new(frames: impl IntoIterator<Item = f64>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// `count` frames spaced `interval_ms` apart, starting at 0.
    pub fn every(interval_ms: f64, count: usize) -> Self {
        Self::new((0..count).map(|i| i as f64 * interval_ms))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ManualFrames {
    fn next_frame(&mut self) -> Option<f64> {
        self.frames.pop_front()
    }
}

/// Wall-clock frames at a fixed rate.
#[derive(Debug)]
pub struct RealtimeFrames {
    origin: Instant,
    interval: Duration,
    next_due: Duration,
    remaining: Option<usize>,
}

impl RealtimeFrames {
    pub fn new(fps: u32) -> Self {
        Self {
            origin: Instant::now(),
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next_due: Duration::ZERO,
            remaining: None,
        }
    }

    /// Stops after `frames` frames even if playback is still running.
    pub fn with_limit(mut self, frames: usize) -> Self {
        self.remaining = Some(frames);
        self
    }
}

impl FrameSource for RealtimeFrames {
    fn next_frame(&mut self) -> Option<f64> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let elapsed = self.origin.elapsed();
        if self.next_due > elapsed {
            std::thread::sleep(self.next_due - elapsed);
        }
        self.next_due += self.interval;
        Some(self.origin.elapsed().as_secs_f64() * 1000.0)
    }
}
