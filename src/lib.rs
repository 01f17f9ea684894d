//! A terminal viewer for colour-keyed cell maps.
//!
//! The map is a grid of coloured cells, each belonging to a named region. It
//! is shown through a [`view::Viewport`] that zooms toward the mouse and pans
//! when dragged, and hovering a region for a moment fades in a tooltip with
//! its name.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod geo;
pub mod gfx;
pub mod input;
pub mod map;
pub mod timing;
pub mod ui;
pub mod view;
