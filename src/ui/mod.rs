//! Interface elements drawn over the map.
//!
//! The map itself is a single layer; everything in here is drawn on top of it
//! and follows the pointer rather than the world.

pub mod tooltip;
