//! Scene-building.
//!
//! A [`Scene`] represents all the data necessary to build one frame: a stack
//! of prioritized layers, each holding images (blocks of raw texels) and an
//! opacity, plus optional debug text drawn above everything else.

use std::mem;

use crate::geo::Point;
use crate::geo::Rect;
use crate::geo::RectVec;
use crate::gfx::texel::colors;
use crate::gfx::texel::Texel;

/// An unflattened scene.
///
/// This type can be used for building up a frame out of several off-screen
/// buffers. Flattening them into a single buffer is done with
/// [`Scene::flatten()`].
#[derive(Clone, Debug)]
pub struct Scene {
  layers: Vec<Layer>,
  debug: Vec<String>,
  viewport: Rect,
  void: Texel,
  debug_mode: bool,
}

#[derive(Clone, Debug)]
struct Layer {
  priority: i32,
  images: Vec<RectVec<Texel>>,
  fg_alpha: f32,
  bg_alpha: f32,
}

impl Scene {
  /// Creates a new `Scene` covering `viewport`, in screen coordinates.
  ///
  /// Points not covered by any layer show `void`. If `debug_mode` is false,
  /// debug strings will not be rendered in this scene.
  pub fn new(viewport: Rect, void: Texel, debug_mode: bool) -> Self {
    Self {
      layers: Vec::new(),
      debug: Vec::new(),
      viewport,
      void,
      debug_mode,
    }
  }

  /// Returns this `Scene`'s viewport, in screen coordinates.
  pub fn viewport(&self) -> Rect {
    self.viewport
  }

  /// Returns an RAII builder for adding a new image layer to this scene.
  ///
  /// The layer will have the given z-priority; higher priorities are drawn
  /// later. Layers of equal priority are drawn in insertion order.
  pub fn image_layer(&mut self, priority: i32) -> ImageLayer<'_> {
    ImageLayer {
      scene: self,
      layer: Layer {
        priority,
        images: Vec::new(),
        fg_alpha: 1.0,
        bg_alpha: 1.0,
      },
    }
  }

  /// Adds debug information to this scene, which is rendered on top of all
  /// elements.
  pub fn debug(&mut self, data: String) {
    if self.debug_mode {
      self.debug.push(data)
    }
  }

  /// Flattens every layer of this scene into `out`, which is resized to the
  /// scene's viewport.
  pub fn flatten(mut self, out: &mut RectVec<Texel>) {
    out.resize(self.viewport, self.void);
    let void = self.void.bg().rgb_or(colors::BLACK);

    self.layers.sort_by_key(|l| l.priority);
    for layer in &self.layers {
      if layer.fg_alpha <= 0.0 && layer.bg_alpha <= 0.0 {
        continue;
      }

      for image in &layer.images {
        let intersection = match image.dims().intersect(out.dims()) {
          Some(x) => x,
          None => continue,
        };

        for p in intersection.points() {
          let (new, old) = match (image.get(p), out.get_mut(p)) {
            (Some(new), Some(old)) => (new, old),
            _ => continue,
          };
          *old = old.blend_layer(*new, layer.fg_alpha, layer.bg_alpha, void);
        }
      }
    }

    let origin = self.viewport.upper_left();
    let width = self.viewport.width();
    for (row, msg) in mem::take(&mut self.debug).into_iter().enumerate() {
      if row as i64 >= self.viewport.height() {
        break;
      }
      for (col, c) in msg.chars().take(width as usize).enumerate() {
        let p = origin + Point::new(col as i64, row as i64);
        if let Some(tx) = out.get_mut(p) {
          *tx = Texel::new(c).with_fg(colors::RED);
        }
      }
    }
  }
}

/// A scene layer consisting of various images.
///
/// This type can be used to build an image layer in a [`Scene`]; once the layer
/// is complete, call [`ImageLayer::finish()`] or drop this value, and it will
/// get added to the scene.
pub struct ImageLayer<'sc> {
  scene: &'sc mut Scene,
  layer: Layer,
}

impl ImageLayer<'_> {
  /// Returns the [`Scene`] associated with this layer.
  pub fn scene(&self) -> &Scene {
    self.scene
  }

  /// Sets the opacity of this layer's glyphs and backgrounds, each in
  /// `[0, 1]`.
  pub fn set_alpha(&mut self, fg_alpha: f32, bg_alpha: f32) {
    self.layer.fg_alpha = fg_alpha.max(0.0).min(1.0);
    self.layer.bg_alpha = bg_alpha.max(0.0).min(1.0);
  }

  /// Adds a new image to this layer.
  pub fn push(&mut self, image: RectVec<Texel>) {
    self.layer.images.push(image)
  }

  /// Finishes building this layer, and adds it to the owning [`Scene`].
  pub fn finish(self) {}
}

impl Drop for ImageLayer<'_> {
  fn drop(&mut self) {
    let layer = Layer {
      priority: self.layer.priority,
      images: mem::take(&mut self.layer.images),
      fg_alpha: self.layer.fg_alpha,
      bg_alpha: self.layer.bg_alpha,
    };
    self.scene.layers.push(layer);
  }
}
