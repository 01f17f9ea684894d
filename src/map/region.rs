//! Named, colour-coded map regions.
//!
//! Regions are identified by dense integer ids. The [`RegionIndex`] maps ids
//! to names through a plain array, and background colours to ids through a
//! table built once when the index is constructed, so that lookups during
//! interaction never allocate.

use std::collections::HashMap;
use std::fmt;

use crate::gfx::texel::Rgb;
use crate::map::MapError;

/// The name reported for cells that do not belong to any known region.
pub const UNNAMED: &str = "unnamed region";

/// An identifier for a map region.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct RegionId(u16);

impl RegionId {
  /// The "no region" sentinel, used for background and out-of-bounds cells.
  pub const NONE: RegionId = RegionId(0);

  /// Returns whether this is the [`RegionId::NONE`] sentinel.
  #[inline]
  pub fn is_none(self) -> bool {
    self == Self::NONE
  }

  /// Returns the raw value of this id.
  #[inline]
  pub fn get(self) -> u16 {
    self.0
  }
}

impl fmt::Display for RegionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_none() {
      f.write_str("#none")
    } else {
      write!(f, "#{}", self.0)
    }
  }
}

fn key(rgb: Rgb) -> [u8; 3] {
  [rgb.red, rgb.green, rgb.blue]
}

/// A lookup table from region ids and colours to region names.
#[derive(Clone, Debug)]
pub struct RegionIndex {
  // Indexed by `RegionId`; slot 0 belongs to `RegionId::NONE`.
  names: Box<[String]>,
  colors: HashMap<[u8; 3], RegionId>,
  palette: Box<[([u8; 3], RegionId)]>,
  tolerance: u8,
}

impl RegionIndex {
  /// Returns a builder for a new index.
  pub fn builder() -> RegionIndexBuilder {
    RegionIndexBuilder {
      regions: Vec::new(),
      tolerance: 0,
    }
  }

  /// Returns the number of named regions.
  pub fn len(&self) -> usize {
    self.names.len() - 1
  }

  /// Returns whether this index has no named regions.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns whether `id` names a region in this index.
  pub fn contains(&self, id: RegionId) -> bool {
    !id.is_none() && (id.0 as usize) < self.names.len()
  }

  /// Returns the name of the region `id`.
  ///
  /// This never fails: the sentinel and unknown ids yield [`UNNAMED`].
  pub fn region_name(&self, id: RegionId) -> &str {
    if !self.contains(id) {
      return UNNAMED;
    }
    &self.names[id.0 as usize]
  }

  /// Returns the region whose key colour matches `rgb`.
  ///
  /// Exact matches win. Otherwise, the closest registered colour whose every
  /// channel lies strictly within the index's tolerance of `rgb` is used. If
  /// there is none, returns [`RegionId::NONE`].
  pub fn region_for_color(&self, rgb: Rgb) -> RegionId {
    let rgb = key(rgb);
    if let Some(&id) = self.colors.get(&rgb) {
      return id;
    }
    if self.tolerance == 0 {
      return RegionId::NONE;
    }

    let tol = self.tolerance as i32;
    self
      .palette
      .iter()
      .filter_map(|&(color, id)| {
        let mut dist = 0;
        for i in 0..3 {
          let d = (color[i] as i32 - rgb[i] as i32).abs();
          if d >= tol {
            return None;
          }
          dist += d;
        }
        Some((dist, id))
      })
      .min()
      .map(|(_, id)| id)
      .unwrap_or(RegionId::NONE)
  }

  /// Returns an iterator over every named region, in id order.
  pub fn iter(&self) -> impl Iterator<Item = (RegionId, &str)> + '_ {
    self
      .names
      .iter()
      .enumerate()
      .skip(1)
      .map(|(i, name)| (RegionId(i as u16), name.as_str()))
  }
}

/// A builder for a [`RegionIndex`].
///
/// See [`RegionIndex::builder()`].
pub struct RegionIndexBuilder {
  regions: Vec<(String, Rgb)>,
  tolerance: u8,
}

impl RegionIndexBuilder {
  /// Registers a region keyed by the background colour `rgb`.
  ///
  /// Ids are assigned densely, starting at 1, in registration order.
  pub fn region(mut self, name: impl Into<String>, rgb: Rgb) -> Self {
    self.regions.push((name.into(), rgb));
    self
  }

  /// Sets the per-channel colour tolerance used by
  /// [`RegionIndex::region_for_color()`]. Zero means exact matches only.
  pub fn tolerance(mut self, tolerance: u8) -> Self {
    self.tolerance = tolerance;
    self
  }

  /// Builds the index.
  ///
  /// Fails if two regions share a key colour, or if there are more regions
  /// than ids.
  pub fn build(self) -> Result<RegionIndex, MapError> {
    if self.regions.len() >= u16::MAX as usize {
      return Err(MapError::TooManyRegions(self.regions.len()));
    }

    let mut names = Vec::with_capacity(self.regions.len() + 1);
    names.push(UNNAMED.to_string());
    let mut colors = HashMap::with_capacity(self.regions.len());
    let mut palette = Vec::with_capacity(self.regions.len());

    for (name, rgb) in self.regions {
      let id = RegionId(names.len() as u16);
      if colors.insert(key(rgb), id).is_some() {
        return Err(MapError::DuplicateColor {
          name,
          color: key(rgb),
        });
      }
      palette.push((key(rgb), id));
      names.push(name);
    }

    Ok(RegionIndex {
      names: names.into_boxed_slice(),
      colors,
      palette: palette.into_boxed_slice(),
      tolerance: self.tolerance,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn index() -> RegionIndex {
    RegionIndex::builder()
      .tolerance(10)
      .region("W. Europe", Rgb::new(236, 200, 77))
      .region("Vikings", Rgb::new(113, 128, 168))
      .build()
      .unwrap()
  }

  #[test]
  fn ids_are_dense_from_one() {
    let index = index();
    let ids: Vec<_> = index.iter().map(|(id, _)| id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(index.len(), 2);
  }

  #[test]
  fn unknown_ids_get_the_placeholder() {
    let index = index();
    assert_eq!(index.region_name(RegionId::NONE), UNNAMED);
    assert_eq!(index.region_name(RegionId(77)), UNNAMED);
    assert_eq!(index.region_name(RegionId(2)), "Vikings");
  }

  #[test]
  fn colours_match_within_tolerance() {
    let index = index();
    let europe = index.region_for_color(Rgb::new(236, 200, 77));
    assert_eq!(index.region_name(europe), "W. Europe");
    assert_eq!(index.region_for_color(Rgb::new(240, 195, 80)), europe);
    // Tolerance is exclusive.
    assert_eq!(index.region_for_color(Rgb::new(246, 200, 77)), RegionId::NONE);
    assert_eq!(index.region_for_color(Rgb::new(0, 0, 0)), RegionId::NONE);
  }

  #[test]
  fn exact_lookup_without_tolerance() {
    let index = RegionIndex::builder()
      .region("Alpha", Rgb::new(255, 0, 0))
      .build()
      .unwrap();
    assert_eq!(index.region_for_color(Rgb::new(254, 0, 0)), RegionId::NONE);
    assert!(!index.region_for_color(Rgb::new(255, 0, 0)).is_none());
  }

  #[test]
  fn duplicate_colours_are_rejected() {
    let err = RegionIndex::builder()
      .region("A", Rgb::new(1, 2, 3))
      .region("B", Rgb::new(1, 2, 3))
      .build()
      .unwrap_err();
    assert!(matches!(err, MapError::DuplicateColor { ref name, .. } if name == "B"));
  }
}
