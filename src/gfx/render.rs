//! Blitting flattened scenes onto the terminal.

use std::io;
use std::mem;

use crate::geo::RectVec;
use crate::gfx::curses::Curses;
use crate::gfx::curses::DrawCall;
use crate::gfx::scene::Scene;
use crate::gfx::texel::Texel;

/// A global rendering context.
///
/// This type renders scenes, caching the previous frame so that only texels
/// which changed since then are sent to the terminal.
pub struct Renderer {
  baked: RectVec<Texel>,
  scratch: RectVec<Texel>,
}

impl Default for Renderer {
  fn default() -> Self {
    Self::new()
  }
}

impl Renderer {
  /// Creates a new `Renderer`.
  pub fn new() -> Self {
    Self {
      baked: RectVec::empty(),
      scratch: RectVec::empty(),
    }
  }

  /// Returns the most recently baked frame.
  pub fn frame(&self) -> &RectVec<Texel> {
    &self.baked
  }

  /// Forgets the cached frame, so that the next bake redraws every texel.
  ///
  /// This should be called whenever the terminal's contents are disturbed,
  /// e.g., after a resize.
  pub fn invalidate(&mut self) {
    self.baked = RectVec::empty();
  }

  /// Bakes a scene, rendering it onto the given `window`.
  ///
  /// Returns the number of texels that were redrawn. Texels covered by a
  /// double-width glyph are never drawn.
  pub fn bake<W: io::Write>(
    &mut self,
    scene: Scene,
    window: &mut Curses<W>,
  ) -> crossterm::Result<usize> {
    scene.flatten(&mut self.scratch);

    let origin = self.scratch.dims().upper_left();
    let same_dims = self.scratch.dims() == self.baked.dims();
    let mut drawn = 0;
    for (i, (p, &new_tx)) in self.scratch.points().enumerate() {
      if new_tx.is_wide_tail()
        || (same_dims && self.baked.data()[i] == new_tx)
      {
        continue;
      }

      let rel = p - origin;
      window.draw(DrawCall {
        row: rel.y() as u16,
        col: rel.x() as u16,
        texel: new_tx,
      })?;
      drawn += 1;
    }
    window.flush()?;

    mem::swap(&mut self.scratch, &mut self.baked);
    Ok(drawn)
  }
}
