//! A viewing session and its frame loop.

use std::io;
use std::time::Duration;

use crate::config::Config;
use crate::gfx::Curses;
use crate::gfx::Renderer;
use crate::gfx::Scene;
use crate::input::Command;
use crate::input::InputEvent;
use crate::input::InputRouter;
use crate::input::Targets;
use crate::input::UserInput;
use crate::map::CellGrid;
use crate::map::RegionIndex;
use crate::timing::FrameTimer;
use crate::timing::StageTimer;
use crate::ui::tooltip::TooltipController;
use crate::view::Compositor;
use crate::view::Viewport;

const MEASUREMENT_INTERVAL: Duration = Duration::from_millis(500);

/// Everything a viewing session owns.
pub struct App {
  grid: CellGrid,
  index: RegionIndex,
  viewport: Viewport,
  tooltip: TooltipController,
  router: InputRouter,
  compositor: Compositor,
  renderer: Renderer,

  // Whether the view size was pinned by configuration rather than following
  // the terminal.
  fixed_screen: bool,
  target_fps: u32,
  running: bool,
}

impl App {
  /// Creates a session showing `grid` on a screen of `screen` columns and
  /// rows, zoomed to fit the whole map.
  pub fn new(
    config: &Config,
    grid: CellGrid,
    index: RegionIndex,
    screen: (u16, u16),
  ) -> Self {
    let (w, h) = config.screen_size.unwrap_or(screen);
    let mut viewport = Viewport::new(w, h, config.zoom_limits());
    viewport.fit(grid.dims());

    tracing::info!(
      width = grid.width(),
      height = grid.height(),
      regions = index.len(),
      zoom = viewport.zoom(),
      "session start"
    );

    Self {
      grid,
      index,
      viewport,
      tooltip: TooltipController::new(config.tooltip_timing()),
      router: InputRouter::new(),
      compositor: Compositor::new(config.tooltip.clone()),
      renderer: Renderer::new(),
      fixed_screen: config.screen_size.is_some(),
      target_fps: config.target_fps,
      running: true,
    }
  }

  /// Returns the map being viewed.
  pub fn grid(&self) -> &CellGrid {
    &self.grid
  }

  /// Returns the map's regions.
  pub fn index(&self) -> &RegionIndex {
    &self.index
  }

  /// Returns the current view.
  pub fn viewport(&self) -> &Viewport {
    &self.viewport
  }

  /// Returns the tooltip state.
  pub fn tooltip(&self) -> &TooltipController {
    &self.tooltip
  }

  /// Returns whether the debug overlay is shown.
  pub fn debug_mode(&self) -> bool {
    self.compositor.debug_mode()
  }

  /// Turns the debug overlay on or off.
  pub fn set_debug_mode(&mut self, debug_mode: bool) {
    self.compositor.set_debug_mode(debug_mode);
  }

  /// Returns whether the session should keep going.
  pub fn is_running(&self) -> bool {
    self.running
  }

  /// Routes one input event, received at `now`.
  pub fn handle(&mut self, event: InputEvent, now: Duration) {
    let targets = Targets {
      grid: &self.grid,
      viewport: &mut self.viewport,
      tooltip: &mut self.tooltip,
    };
    match self.router.dispatch(event, now, targets) {
      Command::Continue => {}
      Command::Quit => {
        tracing::info!("quit requested");
        self.running = false;
      }
      Command::ToggleDebug => {
        let debug_mode = !self.compositor.debug_mode();
        tracing::debug!(debug_mode, "debug overlay toggled");
        self.compositor.set_debug_mode(debug_mode);
      }
      Command::Resize(w, h) => {
        tracing::debug!(w, h, "terminal resized");
        if !self.fixed_screen {
          self.viewport.resize(w, h);
        }
        self.renderer.invalidate();
      }
    }
  }

  /// Runs the input and animation half of one frame: routes `events` in
  /// order, then brings the tooltip up to `now`.
  pub fn update(
    &mut self,
    events: impl IntoIterator<Item = InputEvent>,
    now: Duration,
  ) {
    for event in events {
      self.handle(event, now);
    }
    self.tooltip.advance(now);
  }

  /// Builds this frame's scene, without debug text.
  pub fn compose(&self) -> Scene {
    self
      .compositor
      .compose(&self.grid, &self.index, &self.viewport, &self.tooltip)
  }

  fn debug_text(
    &self,
    scene: &mut Scene,
    timer: &mut FrameTimer,
    stages: &StageTimer,
  ) {
    let fps = timer.measure_fps(MEASUREMENT_INTERVAL);
    scene.debug(format!(
      "fps: {:.2}, count: {}",
      fps,
      timer.frame_count()
    ));

    let offset = self.viewport.offset();
    scene.debug(format!(
      "zoom: {:.3}, offset: ({:.1}, {:.1})",
      self.viewport.zoom(),
      offset.x(),
      offset.y()
    ));

    let hover = self
      .tooltip
      .hover()
      .map(|id| format!("{} {}", id, self.index.region_name(id)))
      .unwrap_or_else(|| "-".into());
    scene.debug(format!(
      "hover: {}, tooltip: {:?} {:.2}",
      hover,
      self.tooltip.phase(),
      self.tooltip.alpha()
    ));

    scene.debug("timings:".into());
    for (stage, duration) in stages.measure_all(MEASUREMENT_INTERVAL) {
      scene.debug(format!(
        " {}: {:.4}ms",
        stage,
        duration.as_secs_f64() * 1000.0
      ));
    }
  }

  /// Runs frames until the user quits.
  ///
  /// Each stage of a frame is timed in `stages`, which the debug overlay
  /// reports.
  pub fn run<W: io::Write>(
    &mut self,
    window: &mut Curses<W>,
    input: &mut UserInput,
    timer: &mut FrameTimer,
    stages: &StageTimer,
  ) -> crossterm::Result<()> {
    while self.running {
      {
        let _t = stages.start("input");
        input.start_frame()?;
      }

      let t = stages.start("update");
      self.update(input.take(), timer.now());
      t.finish();

      let t = stages.start("compose");
      let mut scene = self.compose();
      if self.compositor.debug_mode() {
        self.debug_text(&mut scene, timer, stages);
      }
      t.finish();

      let t = stages.start("bake");
      let drawn = self.renderer.bake(scene, window)?;
      t.finish();
      tracing::trace!(drawn, "frame baked");

      timer.end_frame(self.target_fps);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::Point;
  use crate::input::KeyCode;
  use crate::map::gen;
  use crate::ui::tooltip::Phase;
  use crate::view::region_at;

  fn app() -> App {
    let config = Config::default();
    let index = gen::legend_index(config.color_tolerance).unwrap();
    let grid = gen::generate(7, 60, 30, &index).unwrap();
    App::new(&config, grid, index, (60, 30))
  }

  #[test]
  fn starts_fitted() {
    let app = app();
    assert!(app.is_running());
    assert_eq!(app.viewport().zoom(), 1.0);
    assert_eq!(app.viewport().offset(), Point::new(0.0, 0.0));
  }

  #[test]
  fn quits_on_q() {
    let mut app = app();
    app.update(vec![InputEvent::Key(KeyCode::Char('q'))], Duration::ZERO);
    assert!(!app.is_running());
  }

  #[test]
  fn toggles_debug() {
    let mut app = app();
    app.update(vec![InputEvent::Key(KeyCode::Char('d'))], Duration::ZERO);
    assert!(app.debug_mode());
    app.update(vec![InputEvent::Key(KeyCode::Char('d'))], Duration::ZERO);
    assert!(!app.debug_mode());
  }

  #[test]
  fn resize_follows_terminal() {
    let mut app = app();
    app.update(vec![InputEvent::Resize(100, 40)], Duration::ZERO);
    assert_eq!(app.viewport().screen().width(), 100);
    assert_eq!(app.viewport().screen().height(), 40);
  }

  #[test]
  fn hovering_a_region_shows_its_tooltip() {
    let mut app = app();
    // Find a screen cell over a real region; the frame around the map
    // resolves to nothing.
    let at = app
      .viewport()
      .screen()
      .points()
      .find(|&s| !region_at(app.grid(), app.viewport(), s).is_none())
      .unwrap();

    app.update(vec![InputEvent::Move(at)], Duration::ZERO);
    assert_eq!(app.tooltip().phase(), Phase::Hidden);
    app.update(Vec::new(), Duration::from_millis(900));
    assert_eq!(app.tooltip().phase(), Phase::Visible);

    app.update(vec![InputEvent::Leave], Duration::from_millis(1000));
    assert_eq!(app.tooltip().phase(), Phase::Disappearing);
  }

  #[test]
  fn timed_frames_take_input_and_draw() {
    let mut app = app();
    let stages = StageTimer::new();
    let mut renderer = Renderer::new();
    let mut window = Curses::with(Vec::new()).unwrap();

    for frame in 0..3u64 {
      let t = stages.start("update");
      app.update(
        vec![InputEvent::Wheel {
          at: Point::new(10, 10),
          notches: 1,
        }],
        Duration::from_millis(frame * 16),
      );
      t.finish();

      renderer.bake(app.compose(), &mut window).unwrap();
    }
    assert_eq!(renderer.frame().dims(), app.viewport().screen());
    assert!((app.viewport().zoom() - 1.1f64.powi(3)).abs() < 1e-9);
    let timed: Vec<_> = stages
      .measure_all(Duration::ZERO)
      .into_iter()
      .map(|(stage, _)| stage)
      .collect();
    assert_eq!(timed, ["update"]);
  }
}
