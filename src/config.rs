//! Viewer configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! { "dwell_threshold": 0.25, "tooltip": { "max_width": 30 } }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::ensure;
use anyhow::Context as _;
use serde::Deserialize;
use serde::Serialize;

use crate::gfx::texel::Rgb;
use crate::ui::tooltip::TooltipStyle;
use crate::ui::tooltip::TooltipTiming;
use crate::view::ZoomLimits;

/// Tunables for a viewing session.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Seconds the pointer must rest on a region before its tooltip appears.
  pub dwell_threshold: f64,
  /// Seconds a tooltip takes to fade in.
  pub fade_in: f64,
  /// Seconds a fully visible tooltip takes to fade out.
  pub fade_out: f64,

  /// Smallest zoom factor, in screen cells per world cell.
  pub min_zoom: f64,
  /// Largest zoom factor.
  pub max_zoom: f64,
  /// Zoom multiplier per wheel notch.
  pub zoom_step: f64,

  /// Size of the view in columns and rows; the terminal size if absent.
  pub screen_size: Option<(u16, u16)>,
  /// Frames per second to aim for.
  pub target_fps: u32,
  /// Per-channel slack when matching map colours to regions.
  pub color_tolerance: u8,
  /// Colour shown outside the map.
  pub void_color: (u8, u8, u8),

  /// How tooltips look.
  pub tooltip: TooltipStyle,
}

impl Default for Config {
  fn default() -> Self {
    let limits = ZoomLimits::default();
    Self {
      dwell_threshold: 0.5,
      fade_in: 0.3,
      fade_out: 0.3,
      min_zoom: limits.min,
      max_zoom: limits.max,
      zoom_step: limits.step,
      screen_size: None,
      target_fps: 60,
      color_tolerance: 10,
      void_color: (0, 0, 0),
      tooltip: TooltipStyle::default(),
    }
  }
}

impl Config {
  /// Reads and validates a JSON config file.
  pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
      .with_context(|| format!("could not read {}", path.display()))?;
    let config: Self = serde_json::from_str(&text)
      .with_context(|| format!("could not parse {}", path.display()))?;
    config
      .validate()
      .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
  }

  /// Checks that every value is usable.
  pub fn validate(&self) -> anyhow::Result<()> {
    for (name, secs) in [
      ("dwell_threshold", self.dwell_threshold),
      ("fade_in", self.fade_in),
      ("fade_out", self.fade_out),
    ] {
      ensure!(
        secs.is_finite() && secs >= 0.0,
        "{} must be a non-negative number of seconds, got {}",
        name,
        secs
      );
    }

    ensure!(
      self.min_zoom.is_finite() && self.min_zoom > 0.0,
      "min_zoom must be positive, got {}",
      self.min_zoom
    );
    ensure!(
      self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom,
      "max_zoom ({}) must be at least min_zoom ({})",
      self.max_zoom,
      self.min_zoom
    );
    ensure!(
      self.zoom_step.is_finite() && self.zoom_step > 1.0,
      "zoom_step must be greater than 1, got {}",
      self.zoom_step
    );
    ensure!(self.target_fps > 0, "target_fps must be positive");
    if let Some((w, h)) = self.screen_size {
      ensure!(w > 0 && h > 0, "screen_size must be non-empty");
    }
    ensure!(
      self.tooltip.max_width >= 3,
      "tooltip.max_width must leave room for a border, got {}",
      self.tooltip.max_width
    );
    ensure!(
      (0.0..=1.0).contains(&self.tooltip.bg_opacity),
      "tooltip.bg_opacity must be between 0 and 1, got {}",
      self.tooltip.bg_opacity
    );
    Ok(())
  }

  /// Returns the zoom limits.
  pub fn zoom_limits(&self) -> ZoomLimits {
    ZoomLimits {
      min: self.min_zoom,
      max: self.max_zoom,
      step: self.zoom_step,
    }
  }

  /// Returns the tooltip timings.
  pub fn tooltip_timing(&self) -> TooltipTiming {
    TooltipTiming {
      dwell: Duration::from_secs_f64(self.dwell_threshold),
      fade_in: Duration::from_secs_f64(self.fade_in),
      fade_out: Duration::from_secs_f64(self.fade_out),
    }
  }

  /// Returns the void colour.
  pub fn void_rgb(&self) -> Rgb {
    let (r, g, b) = self.void_color;
    Rgb::new(r, g, b)
  }
}
