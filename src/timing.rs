//! Frame pacing and debug timings.
//!
//! Everything time-dependent in the viewer takes its time as a [`Duration`]
//! since the session started, so the state machines never read a clock
//! themselves; [`FrameTimer::now()`] is where that time comes from.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use chashmap::CHashMap;

/// A timer for holding the frame rate steady and for telling the session
/// what time it is.
pub struct FrameTimer {
  session_start: Instant,
  frame_count: u64,
  last_frame: Instant,

  fps: f64,
  last_measurement: Instant,
  last_measurement_frame: u64,
}

impl Default for FrameTimer {
  fn default() -> Self {
    Self::new()
  }
}

impl FrameTimer {
  /// Creates a new `FrameTimer`; the session clock starts now.
  pub fn new() -> Self {
    let now = Instant::now();
    Self {
      session_start: now,
      frame_count: 0,
      last_frame: now,
      fps: 0.0,
      last_measurement: now,
      last_measurement_frame: 0,
    }
  }

  /// Returns the time since the session started.
  pub fn now(&self) -> Duration {
    self.session_start.elapsed()
  }

  /// Returns the number of frames completed so far.
  pub fn frame_count(&self) -> u64 {
    self.frame_count
  }

  /// Returns the frames per second, averaged over `interval`.
  ///
  /// Call once per frame. The value is cached between measurements.
  pub fn measure_fps(&mut self, interval: Duration) -> f64 {
    let elapsed = self.last_measurement.elapsed();
    if elapsed < interval {
      return self.fps;
    }

    let frames = (self.frame_count - self.last_measurement_frame) as f64;
    self.fps = frames / elapsed.as_secs_f64();
    self.last_measurement = Instant::now();
    self.last_measurement_frame = self.frame_count;
    self.fps
  }

  /// Ends a frame, sleeping until the frame has lasted at least
  /// `1 / target_fps` seconds.
  ///
  /// A `target_fps` of zero never sleeps.
  pub fn end_frame(&mut self, target_fps: u32) {
    if target_fps > 0 {
      let frame_time = Duration::from_secs(1) / target_fps;
      if let Some(left) = frame_time.checked_sub(self.last_frame.elapsed()) {
        thread::sleep(left);
      }
    }
    self.last_frame = Instant::now();
    self.frame_count += 1;
  }
}

/// A timer for the average time spent in each stage of a frame, such as
/// `"compose"` or `"bake"`.
#[derive(Default)]
pub struct StageTimer {
  table: CHashMap<&'static str, Stage>,
  keys: Mutex<Vec<&'static str>>,
}

impl StageTimer {
  /// Creates a new `StageTimer`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts timing `stage`; the measurement ends when the guard drops.
  #[must_use]
  pub fn start(&self, stage: &'static str) -> StageGuard<'_> {
    let keys = &self.keys;
    self.table.upsert(
      stage,
      move || {
        keys
          .lock()
          .unwrap_or_else(PoisonError::into_inner)
          .push(stage);
        Stage::new()
      },
      |v| v.last_start = Instant::now(),
    );
    StageGuard(self, stage)
  }

  /// Returns the total time measured for `stage`.
  pub fn total_time(&self, stage: &'static str) -> Duration {
    self
      .table
      .get(stage)
      .map(|s| s.total_time)
      .unwrap_or_default()
  }

  /// Returns the average time of every stage, in the order the stages were
  /// first started.
  ///
  /// Averages are recomputed once `interval` has passed since the last
  /// recomputation, and cached in between.
  pub fn measure_all(
    &self,
    interval: Duration,
  ) -> Vec<(&'static str, Duration)> {
    let now = Instant::now();
    let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
    keys
      .iter()
      .filter_map(|&stage| {
        let mut inner = self.table.get_mut(stage)?;
        Some((stage, inner.measure(interval, now)))
      })
      .collect()
  }
}

struct Stage {
  last_start: Instant,
  total_time: Duration,
  raw_time: Duration,
  samples: u32,

  average: Duration,
  last_measurement: Instant,
}

impl Stage {
  fn new() -> Self {
    Self {
      last_start: Instant::now(),
      total_time: Duration::default(),
      raw_time: Duration::default(),
      samples: 0,
      average: Duration::default(),
      last_measurement: Instant::now(),
    }
  }

  fn measure(&mut self, interval: Duration, now: Instant) -> Duration {
    if now - self.last_measurement < interval || self.samples == 0 {
      return self.average;
    }

    self.average = self.raw_time / self.samples;
    self.raw_time = Duration::default();
    self.samples = 0;
    self.last_measurement = now;
    self.average
  }
}

/// A guard for a [`StageTimer::start()`] call.
pub struct StageGuard<'a>(&'a StageTimer, &'static str);

impl StageGuard<'_> {
  /// Ends the measurement early.
  pub fn finish(self) {}
}

impl Drop for StageGuard<'_> {
  fn drop(&mut self) {
    if let Some(mut inner) = self.0.table.get_mut(self.1) {
      let elapsed = inner.last_start.elapsed();
      inner.total_time += elapsed;
      inner.raw_time += elapsed;
      inner.samples += 1;
    }
  }
}
