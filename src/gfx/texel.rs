//! Texels, terminal elements.
//!
//! A *texel* is our abstraction for a cell in a terminal. They're not *quite*
//! like cells, because they carry a little bit more information: colors may be
//! "reset" to the terminal's defaults, or "inherited" from whatever is beneath
//! them when layers are stacked. See the [`Texel`] type for more info.

use palette::Mix as _;

pub use palette::named as colors;

/// An RGB value used by a [`Texel`].
pub type Rgb = palette::Srgb<u8>;

/// A foreground or background color for a [`Texel`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Color {
  /// A solid RGB value.
  Rgb(Rgb),

  /// The "default" value, i.e., reset to whatever the terminal's default colors
  /// are.
  Reset,

  /// Inherit whatever color the layer below had; if no such layer is present,
  /// behaves like `Reset`.
  Inherit,
}

impl From<Rgb> for Color {
  fn from(rgb: Rgb) -> Self {
    Self::Rgb(rgb)
  }
}

impl Color {
  /// Returns the RGB value of this color, using `fallback` for colors that
  /// do not carry one.
  #[inline]
  pub fn rgb_or(self, fallback: Rgb) -> Rgb {
    match self {
      Self::Rgb(rgb) => rgb,
      _ => fallback,
    }
  }
}

/// Linearly interpolates from `a` to `b` in linear light.
///
/// `t` is clamped to `[0, 1]`; `t == 0` yields `a` and `t == 1` yields `b`.
pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
  if t <= 0.0 {
    return a;
  } else if t >= 1.0 {
    return b;
  }
  let a = a.into_format::<f32>().into_linear();
  let b = b.into_format::<f32>().into_linear();
  palette::Srgb::<f32>::from_linear(a.mix(&b, t)).into_format()
}

/// A "terminal element", analogous to a pixel or voxel.
///
/// A texel consists of a "glyph" (a printable character), a foreground color,
/// and a background color; colors are optional.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Texel {
  glyph: Option<char>,
  fg: Rgb,
  bg: Rgb,
  meta: Meta,
}

bitflags::bitflags! {
  struct Meta: u8 {
    const BG_RESET = 1 << 0;
    const BG_INHERIT = 1 << 1;
    const FG_RESET = 1 << 2;
    const FG_INHERIT = 1 << 3;
    const WIDE_TAIL = 1 << 4;
  }
}

impl Texel {
  /// Creates a new invisible texel, which inherits everything from the layer
  /// below it.
  #[inline]
  pub fn empty() -> Self {
    Self {
      glyph: None,
      fg: colors::BLACK,
      bg: colors::BLACK,
      meta: Meta::FG_INHERIT | Meta::BG_INHERIT,
    }
  }

  /// Creates a new colorless texel with the given glyph.
  #[inline]
  pub fn new(glyph: char) -> Self {
    Self {
      glyph: Some(glyph),
      fg: colors::BLACK,
      bg: colors::BLACK,
      meta: Meta::FG_RESET | Meta::BG_RESET,
    }
  }

  /// Creates a fully-colored texel.
  #[inline]
  pub fn colored(glyph: char, fg: Rgb, bg: Rgb) -> Self {
    Self {
      glyph: Some(glyph),
      fg,
      bg,
      meta: Meta::empty(),
    }
  }

  /// Returns this texel's glyph.
  #[inline]
  pub fn glyph(self) -> Option<char> {
    self.glyph
  }

  /// Returns a copy of this texel with the given glyph.
  #[inline]
  pub fn with_glyph(mut self, glyph: impl Into<Option<char>>) -> Self {
    self.glyph = glyph.into();
    self.meta.remove(Meta::WIDE_TAIL);
    self
  }

  /// Returns a copy of this texel marked as the right half of a
  /// double-width glyph in the texel to its left.
  ///
  /// Wide tails keep their colors but are never drawn themselves; the glyph
  /// to their left covers them.
  #[inline]
  pub fn into_wide_tail(mut self) -> Self {
    self.glyph = Some(' ');
    self.meta.insert(Meta::WIDE_TAIL);
    self
  }

  /// Returns whether this texel is covered by a double-width glyph.
  #[inline]
  pub fn is_wide_tail(self) -> bool {
    self.meta.contains(Meta::WIDE_TAIL)
  }

  /// Returns this texel's foreground color.
  #[inline]
  pub fn fg(self) -> Color {
    if self.meta.contains(Meta::FG_RESET) {
      Color::Reset
    } else if self.meta.contains(Meta::FG_INHERIT) {
      Color::Inherit
    } else {
      self.fg.into()
    }
  }

  /// Returns a copy of this texel with the given foreground color.
  #[inline]
  pub fn with_fg(mut self, color: impl Into<Color>) -> Self {
    self.meta.remove(Meta::FG_RESET | Meta::FG_INHERIT);
    match color.into() {
      Color::Rgb(rgb) => self.fg = rgb,
      Color::Reset => self.meta |= Meta::FG_RESET,
      Color::Inherit => self.meta |= Meta::FG_INHERIT,
    }
    self
  }

  /// Returns this texel's background color.
  #[inline]
  pub fn bg(self) -> Color {
    if self.meta.contains(Meta::BG_RESET) {
      Color::Reset
    } else if self.meta.contains(Meta::BG_INHERIT) {
      Color::Inherit
    } else {
      self.bg.into()
    }
  }

  /// Returns a copy of this texel with the given background color.
  #[inline]
  pub fn with_bg(mut self, color: impl Into<Color>) -> Self {
    self.meta.remove(Meta::BG_RESET | Meta::BG_INHERIT);
    match color.into() {
      Color::Rgb(rgb) => self.bg = rgb,
      Color::Reset => self.meta |= Meta::BG_RESET,
      Color::Inherit => self.meta |= Meta::BG_INHERIT,
    }
    self
  }

  /// Layers `other` over this `Texel`, following any relevant inheritance
  /// rules.
  #[inline]
  pub fn add_layer(mut self, other: Texel) -> Self {
    if other.glyph.is_some() {
      self.glyph = other.glyph;
      self.meta.set(Meta::WIDE_TAIL, other.is_wide_tail());
    }
    if other.fg() != Color::Inherit {
      self = self.with_fg(other.fg());
    }
    if other.bg() != Color::Inherit {
      self = self.with_bg(other.bg());
    }
    self
  }

  /// Layers `other` over this `Texel` with partial opacity.
  ///
  /// The background fades from ours towards `other`'s by `bg_alpha`. A glyph
  /// carried by `other` replaces ours, and its color fades in from our
  /// background by `fg_alpha`, so that text at zero opacity is
  /// indistinguishable from the surface it is drawn on. Colors that are not
  /// RGB values are treated as `void`.
  pub fn blend_layer(
    self,
    other: Texel,
    fg_alpha: f32,
    bg_alpha: f32,
    void: Rgb,
  ) -> Self {
    if fg_alpha >= 1.0 && bg_alpha >= 1.0 {
      return self.add_layer(other);
    }

    let base_bg = self.bg().rgb_or(void);
    let mut out = self;
    if let Color::Rgb(bg) = other.bg() {
      out = out.with_bg(mix(base_bg, bg, bg_alpha));
    }

    if fg_alpha <= 0.0 {
      return out;
    }
    if let Some(glyph) = other.glyph {
      let fg = other.fg().rgb_or(self.fg().rgb_or(void));
      out = out.with_glyph(glyph).with_fg(mix(base_bg, fg, fg_alpha));
      out.meta.set(Meta::WIDE_TAIL, other.is_wide_tail());
    } else if let Color::Rgb(fg) = other.fg() {
      out = out.with_fg(mix(self.fg().rgb_or(void), fg, fg_alpha));
    }
    out
  }
}
