//! Hover tooltips.
//!
//! A tooltip appears once the pointer has dwelt over the same region for a
//! while, fades in, stays while the pointer stays, and fades out once the
//! pointer leaves the map. Moving onto a different region cancels it on the
//! spot.
//!
//! [`TooltipController`] is a state machine driven entirely by the times it is
//! handed, so it behaves the same whether frames are late, early, or simulated
//! in a test:
//!
//! ```text
//! Hidden --dwell--> Appearing --fade_in--> Visible
//!   ^                   |                     |
//!   |         pointer leaves the map ---------+
//!   |                   v
//!   +---fade_out--- Disappearing
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use unicode_width::UnicodeWidthChar as _;

use crate::geo::Point;
use crate::geo::Rect;
use crate::geo::RectVec;
use crate::gfx::texel::Rgb;
use crate::gfx::texel::Texel;
use crate::map::RegionId;

/// Timing constants for a [`TooltipController`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TooltipTiming {
  /// How long the pointer must stay over a region before its tooltip starts
  /// to appear.
  pub dwell: Duration,
  /// How long the tooltip takes to become fully opaque.
  pub fade_in: Duration,
  /// How long a fully opaque tooltip takes to vanish.
  pub fade_out: Duration,
}

impl Default for TooltipTiming {
  fn default() -> Self {
    Self {
      dwell: Duration::from_millis(500),
      fade_in: Duration::from_millis(300),
      fade_out: Duration::from_millis(300),
    }
  }
}

/// The visibility phase of a tooltip.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum Phase {
  Hidden,
  Appearing,
  Visible,
  Disappearing,
}

/// Tracks what the pointer hovers over and how visible its tooltip is.
#[derive(Clone, Debug)]
pub struct TooltipController {
  timing: TooltipTiming,

  // The region under the pointer; `None` over background or off the map.
  hover: Option<RegionId>,
  dwell_start: Option<Duration>,
  anchor: Option<Point>,

  phase: Phase,
  phase_start: Duration,
  alpha: f32,
  // Alpha at the moment fading out started.
  fade_from: f32,
  // The region whose name is being shown, which outlives `hover` while the
  // tooltip fades out.
  label: Option<RegionId>,
}

fn progress(elapsed: Duration, total: Duration) -> f32 {
  if total == Duration::from_secs(0) {
    return f32::INFINITY;
  }
  (elapsed.as_secs_f64() / total.as_secs_f64()) as f32
}

impl TooltipController {
  /// Creates a new, hidden tooltip.
  pub fn new(timing: TooltipTiming) -> Self {
    Self {
      timing,
      hover: None,
      dwell_start: None,
      anchor: None,
      phase: Phase::Hidden,
      phase_start: Duration::from_secs(0),
      alpha: 0.0,
      fade_from: 0.0,
      label: None,
    }
  }

  /// Returns the current phase.
  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// Returns the current opacity, in `[0, 1]`.
  pub fn alpha(&self) -> f32 {
    self.alpha
  }

  /// Returns the region currently under the pointer, if any.
  pub fn hover(&self) -> Option<RegionId> {
    self.hover
  }

  /// Returns when the pointer arrived over the hovered region.
  pub fn dwell_start(&self) -> Option<Duration> {
    self.dwell_start
  }

  /// Returns the region whose name should be drawn, if the tooltip is at all
  /// visible.
  pub fn label(&self) -> Option<RegionId> {
    match self.phase {
      Phase::Hidden => None,
      _ => self.label,
    }
  }

  /// Returns the last known pointer position, in screen coordinates.
  pub fn anchor(&self) -> Option<Point> {
    self.anchor
  }

  fn enter(&mut self, phase: Phase, at: Duration) {
    if phase != self.phase {
      tracing::debug!(
        from = ?self.phase,
        to = ?phase,
        label = ?self.label,
        "tooltip phase"
      );
    }
    self.phase = phase;
    self.phase_start = at;
  }

  fn hide(&mut self, now: Duration) {
    self.alpha = 0.0;
    self.label = None;
    self.enter(Phase::Hidden, now);
  }

  fn fade_out(&mut self, now: Duration) {
    match self.phase {
      Phase::Appearing | Phase::Visible => {
        self.fade_from = self.alpha;
        self.enter(Phase::Disappearing, now);
      }
      Phase::Hidden | Phase::Disappearing => {}
    }
  }

  /// Records that the pointer moved to screen cell `pointer`, which shows
  /// `region`.
  ///
  /// Moving onto a different region restarts the dwell timer and hides the
  /// tooltip immediately. Moving onto [`RegionId::NONE`] counts as leaving
  /// the map: a showing tooltip fades out instead.
  pub fn on_move(&mut self, now: Duration, pointer: Point, region: RegionId) {
    self.anchor = Some(pointer);

    let region = if region.is_none() { None } else { Some(region) };
    if region == self.hover {
      return;
    }
    self.hover = region;
    self.dwell_start = Some(now);

    match region {
      Some(_) => self.hide(now),
      None => self.fade_out(now),
    }
  }

  /// Records that the pointer left the screen altogether.
  pub fn on_leave(&mut self, now: Duration) {
    if self.hover.take().is_some() {
      self.dwell_start = Some(now);
    }
    self.fade_out(now);
  }

  /// Advances the state machine to time `now`.
  ///
  /// Transitions are timed from when they were due rather than from when this
  /// function noticed them, so the result does not depend on how often it is
  /// called.
  pub fn advance(&mut self, now: Duration) {
    loop {
      match self.phase {
        Phase::Hidden => {
          let due = match (self.hover, self.dwell_start) {
            (Some(_), Some(start)) => start + self.timing.dwell,
            _ => break,
          };
          if now < due {
            break;
          }
          self.label = self.hover;
          self.alpha = 0.0;
          self.enter(Phase::Appearing, due);
        }
        Phase::Appearing => {
          let elapsed = now.saturating_sub(self.phase_start);
          let t = progress(elapsed, self.timing.fade_in);
          if t < 1.0 {
            self.alpha = t;
            break;
          }
          self.alpha = 1.0;
          let at = self.phase_start + self.timing.fade_in;
          self.enter(Phase::Visible, at);
        }
        Phase::Visible => {
          self.alpha = 1.0;
          break;
        }
        Phase::Disappearing => {
          let elapsed = now.saturating_sub(self.phase_start);
          let alpha = self.fade_from - progress(elapsed, self.timing.fade_out);
          if alpha > 0.0 {
            self.alpha = alpha;
            break;
          }
          self.hide(now);
        }
      }
    }
  }
}

/// How tooltips look.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipStyle {
  /// The widest a tooltip may be, border included.
  pub max_width: usize,
  /// Where the tooltip's upper-left corner goes, relative to the pointer.
  pub offset: (i64, i64),
  /// Opacity of the tooltip's background when it is fully visible.
  pub bg_opacity: f32,
  /// Text and border colour.
  pub fg: (u8, u8, u8),
  /// Background colour.
  pub bg: (u8, u8, u8),
}

impl Default for TooltipStyle {
  fn default() -> Self {
    Self {
      max_width: 20,
      offset: (2, 0),
      bg_opacity: 0.7,
      fg: (200, 200, 200),
      bg: (0, 0, 0),
    }
  }
}

// Terminal columns taken up by `c`. Zero-width and control characters
// cannot be given a texel of their own, so they are dropped.
fn columns(c: char) -> usize {
  c.width().unwrap_or(0)
}

/// Greedily word-wraps `text` into lines at most `width` terminal columns
/// wide.
///
/// Words wider than `width` are broken up. A double-width character never
/// straddles two lines, so a line may fall one column short; when `width` is
/// too narrow for a single character, that character gets a line to itself.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut lines = Vec::new();
  let mut line = String::new();
  let mut len = 0;

  for word in text.split_whitespace() {
    let mut chars: Vec<char> =
      word.chars().filter(|&c| columns(c) > 0).collect();
    while !chars.is_empty() {
      let room = if len == 0 { width } else { width.saturating_sub(len + 1) };
      let word_len: usize = chars.iter().map(|&c| columns(c)).sum();
      if word_len <= room {
        if len > 0 {
          line.push(' ');
          len += 1;
        }
        line.extend(chars.drain(..));
        len += word_len;
      } else if len > 0 {
        lines.push(std::mem::take(&mut line));
        len = 0;
      } else {
        let mut taken = 0;
        let mut n = 0;
        for &c in &chars {
          if n > 0 && taken + columns(c) > width {
            break;
          }
          taken += columns(c);
          n += 1;
        }
        lines.push(chars.drain(..n).collect());
      }
    }
  }
  if len > 0 {
    lines.push(line);
  }
  lines
}

/// Draws a bordered tooltip box for `text`, with its upper-left corner at
/// the origin.
pub fn render_box(text: &str, style: &TooltipStyle) -> RectVec<Texel> {
  let (r, g, b) = style.fg;
  let fg = Rgb::new(r, g, b);
  let (r, g, b) = style.bg;
  let bg = Rgb::new(r, g, b);

  let lines = wrap(text, style.max_width.saturating_sub(2));
  let inner = lines
    .iter()
    .map(|l| l.chars().map(columns).sum::<usize>())
    .max()
    .unwrap_or(0);
  let (w, h) = (inner as i64 + 2, lines.len() as i64 + 2);

  let mut image =
    RectVec::new(Rect::with_dims(w, h), Texel::colored(' ', fg, bg));
  for (p, tx) in image.points_mut() {
    let (left, right) = (p.x() == 0, p.x() == w - 1);
    let (top, bottom) = (p.y() == 0, p.y() == h - 1);
    let glyph = match (left, right, top, bottom) {
      (true, _, true, _) => '┌',
      (_, true, true, _) => '┐',
      (true, _, _, true) => '└',
      (_, true, _, true) => '┘',
      (_, _, true, _) | (_, _, _, true) => '─',
      (true, _, _, _) | (_, true, _, _) => '│',
      _ => continue,
    };
    *tx = tx.with_glyph(glyph);
  }

  for (row, line) in lines.iter().enumerate() {
    let y = row as i64 + 1;
    let mut x = 1;
    for c in line.chars() {
      if let Some(tx) = image.get_mut(Point::new(x, y)) {
        *tx = tx.with_glyph(c);
      }
      if columns(c) == 2 {
        if let Some(tx) = image.get_mut(Point::new(x + 1, y)) {
          *tx = tx.into_wide_tail();
        }
      }
      x += columns(c) as i64;
    }
  }
  image
}

/// Chooses where a `size`-sized tooltip for a pointer at `anchor` goes on
/// `screen`.
///
/// The tooltip sits `offset` away from the pointer, flipping to the other
/// side when it would run off the right edge, and is then nudged vertically
/// (or, on very narrow screens, horizontally) to stay on screen. It never
/// covers the pointer's cell unless the screen is too narrow to avoid it.
pub fn place(anchor: Point, size: Rect, offset: Point, screen: Rect) -> Rect {
  let w = size.width();
  let mut ul = anchor + offset;
  if ul.x() + w > screen.lower_right().x() {
    ul = Point::new(anchor.x() - offset.x() - w + 1, ul.y());
  }
  (Rect::with_dims(w, size.height()) + ul).shifted_into(screen)
}
