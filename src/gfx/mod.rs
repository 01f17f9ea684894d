//! Graphics and rendering library.

pub mod curses;
pub mod render;
pub mod scene;
pub mod texel;

pub use curses::Curses;
pub use render::Renderer;
pub use scene::Scene;
