//! Input collection and routing.
//!
//! Terminal events are collected once per frame by [`UserInput`], translated
//! into [`InputEvent`]s, and handed one by one to the [`InputRouter`], which
//! forwards them to the viewport and the tooltip.

use std::time::Duration;

use crate::geo::Point;
use crate::map::CellGrid;
use crate::ui::tooltip::TooltipController;
use crate::view;
use crate::view::Viewport;

pub use crossterm::event::KeyCode;

/// A device event, in screen coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InputEvent {
  /// The pointer moved with no button held.
  Move(Point),
  /// The wheel turned; positive notches point away from the user.
  Wheel {
    /// Where the pointer was.
    at: Point,
    /// How far the wheel turned.
    notches: i32,
  },
  /// The primary button went down.
  DragStart(Point),
  /// The pointer moved with the primary button held.
  DragMove(Point),
  /// The primary button went up.
  DragEnd(Point),
  /// The pointer left the screen.
  ///
  /// Terminals never report this; pointer events landing off the viewport
  /// are treated the same way. Front ends that can tell when the pointer
  /// leaves their window send it directly.
  Leave,
  /// The terminal changed size, in columns and rows.
  Resize(u16, u16),
  /// A key was pressed. Letters are lowercased.
  Key(KeyCode),
}

impl InputEvent {
  /// Translates a terminal event, if it is one we care about.
  pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
    use crossterm::event::Event;
    use crossterm::event::MouseButton;
    use crossterm::event::MouseEvent;
    use crossterm::event::MouseEventKind;

    let at = |col: u16, row: u16| Point::new(col as i64, row as i64);
    let event = match event {
      Event::Key(e) => match e.code {
        KeyCode::Char(c) => Self::Key(KeyCode::Char(c.to_ascii_lowercase())),
        k => Self::Key(k),
      },
      Event::Mouse(MouseEvent {
        kind, column, row, ..
      }) => {
        let at = at(column, row);
        match kind {
          MouseEventKind::Moved => Self::Move(at),
          MouseEventKind::ScrollUp => Self::Wheel { at, notches: 1 },
          MouseEventKind::ScrollDown => Self::Wheel { at, notches: -1 },
          MouseEventKind::Down(MouseButton::Left) => Self::DragStart(at),
          MouseEventKind::Drag(MouseButton::Left) => Self::DragMove(at),
          MouseEventKind::Up(MouseButton::Left) => Self::DragEnd(at),
          _ => return None,
        }
      }
      Event::Resize(cols, rows) => Self::Resize(cols, rows),
    };
    Some(event)
  }
}

/// A tracker for a frame's input events.
///
/// At the begining of each frame [`UserInput::start_frame()`] should be called
/// to load up that frame's events from the terminal.
#[derive(Default)]
pub struct UserInput {
  events: Vec<InputEvent>,
}

impl UserInput {
  /// Creates a new `UserInput`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the events collected for this frame, in arrival order.
  pub fn events(&self) -> &[InputEvent] {
    &self.events
  }

  /// Takes the events collected for this frame.
  pub fn take(&mut self) -> Vec<InputEvent> {
    std::mem::take(&mut self.events)
  }

  /// Clears internal buffers and collects every pending terminal event,
  /// without blocking.
  pub fn start_frame(&mut self) -> crossterm::Result<()> {
    use crossterm::event;

    self.events.clear();
    while event::poll(Duration::default())? {
      if let Some(e) = InputEvent::from_crossterm(event::read()?) {
        self.events.push(e);
      }
    }
    Ok(())
  }
}

/// What the session should do after an event was routed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Command {
  /// Nothing beyond what the router already did.
  Continue,
  /// The user asked to quit.
  Quit,
  /// The user asked to toggle the debug overlay.
  ToggleDebug,
  /// The terminal changed size.
  Resize(u16, u16),
}

/// Everything an [`InputRouter`] dispatches to.
pub struct Targets<'a> {
  /// The map, for resolving what the pointer is over.
  pub grid: &'a CellGrid,
  /// The view to pan and zoom.
  pub viewport: &'a mut Viewport,
  /// The tooltip tracking the pointer.
  pub tooltip: &'a mut TooltipController,
}

#[derive(Copy, Clone, Debug)]
struct Drag {
  // World position grabbed when the drag started.
  grab: Point<f64>,
  // Screen position at the previous drag event.
  last: Point,
}

/// Routes input events to the viewport and the tooltip.
#[derive(Default)]
pub struct InputRouter {
  drag: Option<Drag>,
}

impl InputRouter {
  /// Creates a new `InputRouter`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns whether a drag is in progress.
  pub fn is_dragging(&self) -> bool {
    self.drag.is_some()
  }

  /// Returns the world position grabbed by the current drag, if any.
  pub fn grab(&self) -> Option<Point<f64>> {
    self.drag.map(|d| d.grab)
  }

  /// Dispatches one event, at time `now`.
  ///
  /// Pointer events outside the viewport are not errors: they pan and zoom
  /// nothing, and count as the pointer having left the map.
  pub fn dispatch(
    &mut self,
    event: InputEvent,
    now: Duration,
    mut t: Targets<'_>,
  ) -> Command {
    match event {
      InputEvent::Move(p) => hover(now, p, &mut t),
      InputEvent::Wheel { at, notches } => {
        if t.viewport.contains(at) {
          t.viewport.zoom_at(at.to_f64(), notches);
        }
      }
      InputEvent::DragStart(p) => {
        if t.viewport.contains(p) {
          let grab = t.viewport.screen_to_world(p.to_f64());
          tracing::debug!(x = grab.x(), y = grab.y(), "drag start");
          self.drag = Some(Drag { grab, last: p });
        }
        hover(now, p, &mut t);
      }
      InputEvent::DragMove(p) => {
        if let Some(drag) = &mut self.drag {
          // Pan by the delta since the previous event, not since the drag
          // started, so rounding never accumulates.
          t.viewport.pan((p - drag.last).to_f64());
          drag.last = p;
        }
        hover(now, p, &mut t);
      }
      InputEvent::DragEnd(p) => {
        if self.drag.take().is_some() {
          tracing::debug!("drag end");
        }
        hover(now, p, &mut t);
      }
      InputEvent::Leave => t.tooltip.on_leave(now),
      InputEvent::Resize(w, h) => return Command::Resize(w, h),
      InputEvent::Key(code) => return key(code, t),
    }
    Command::Continue
  }
}

fn key(code: KeyCode, t: Targets<'_>) -> Command {
  let center = t.viewport.screen_center();
  let pan = |dx: f64, dy: f64| Point::new(dx, dy);
  match code {
    KeyCode::Esc | KeyCode::Char('q') => return Command::Quit,
    KeyCode::Char('d') => return Command::ToggleDebug,
    KeyCode::Char('+') | KeyCode::Char('=') => {
      t.viewport.zoom_at(center, 1);
    }
    KeyCode::Char('-') => {
      t.viewport.zoom_at(center, -1);
    }
    KeyCode::Char('f') | KeyCode::Home => t.viewport.fit(t.grid.dims()),
    KeyCode::Left => t.viewport.pan(pan(1.0, 0.0)),
    KeyCode::Right => t.viewport.pan(pan(-1.0, 0.0)),
    KeyCode::Up => t.viewport.pan(pan(0.0, 1.0)),
    KeyCode::Down => t.viewport.pan(pan(0.0, -1.0)),
    _ => {}
  }
  Command::Continue
}

fn hover(now: Duration, p: Point, t: &mut Targets<'_>) {
  if t.viewport.contains(p) {
    let region = view::region_at(t.grid, t.viewport, p);
    t.tooltip.on_move(now, p, region);
  } else {
    t.tooltip.on_leave(now);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gfx::texel::colors;
  use crate::map::Cell;
  use crate::map::RegionIndex;
  use crate::ui::tooltip::Phase;
  use crate::ui::tooltip::TooltipTiming;
  use crate::view::ZoomLimits;
  use crossterm::event::Event;
  use crossterm::event::KeyModifiers;
  use crossterm::event::MouseButton;
  use crossterm::event::MouseEvent;
  use crossterm::event::MouseEventKind;

  fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
      kind,
      column,
      row,
      modifiers: KeyModifiers::NONE,
    })
  }

  #[test]
  fn translates_terminal_events() {
    assert_eq!(
      InputEvent::from_crossterm(mouse(MouseEventKind::ScrollUp, 3, 4)),
      Some(InputEvent::Wheel {
        at: Point::new(3, 4),
        notches: 1
      })
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(MouseEventKind::ScrollDown, 3, 4)),
      Some(InputEvent::Wheel {
        at: Point::new(3, 4),
        notches: -1
      })
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(MouseEventKind::Moved, 7, 0)),
      Some(InputEvent::Move(Point::new(7, 0)))
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(
        MouseEventKind::Down(MouseButton::Left),
        1,
        2
      )),
      Some(InputEvent::DragStart(Point::new(1, 2)))
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(
        MouseEventKind::Drag(MouseButton::Left),
        1,
        2
      )),
      Some(InputEvent::DragMove(Point::new(1, 2)))
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(
        MouseEventKind::Up(MouseButton::Left),
        1,
        2
      )),
      Some(InputEvent::DragEnd(Point::new(1, 2)))
    );
    assert_eq!(
      InputEvent::from_crossterm(mouse(
        MouseEventKind::Down(MouseButton::Right),
        1,
        2
      )),
      None
    );
    assert_eq!(
      InputEvent::from_crossterm(Event::Key(KeyCode::Char('Q').into())),
      Some(InputEvent::Key(KeyCode::Char('q')))
    );
  }

  struct World {
    grid: CellGrid,
    viewport: Viewport,
    tooltip: TooltipController,
    router: InputRouter,
  }

  impl World {
    fn new() -> Self {
      let cell = Cell::painted(' ', colors::WHITE, colors::BLUE);
      let index = RegionIndex::builder()
        .region("Sea", colors::BLUE)
        .build()
        .unwrap();
      Self {
        grid: CellGrid::from_raster(20, 10, vec![cell; 200], &index).unwrap(),
        viewport: Viewport::new(20, 10, ZoomLimits::default()),
        tooltip: TooltipController::new(TooltipTiming::default()),
        router: InputRouter::new(),
      }
    }

    fn send(&mut self, event: InputEvent) -> Command {
      self.router.dispatch(
        event,
        Duration::ZERO,
        Targets {
          grid: &self.grid,
          viewport: &mut self.viewport,
          tooltip: &mut self.tooltip,
        },
      )
    }
  }

  #[test]
  fn drags_pan_by_deltas() {
    let mut w = World::new();
    w.send(InputEvent::DragStart(Point::new(5, 5)));
    assert!(w.router.is_dragging());
    assert_eq!(w.router.grab(), Some(Point::new(5.0, 5.0)));

    w.send(InputEvent::DragMove(Point::new(7, 5)));
    w.send(InputEvent::DragMove(Point::new(7, 8)));
    assert_eq!(w.viewport.offset(), Point::new(-2.0, -3.0));

    w.send(InputEvent::DragEnd(Point::new(7, 8)));
    assert!(!w.router.is_dragging());
    w.send(InputEvent::DragMove(Point::new(0, 0)));
    assert_eq!(w.viewport.offset(), Point::new(-2.0, -3.0));
  }

  #[test]
  fn drags_from_off_screen_are_ignored() {
    let mut w = World::new();
    w.send(InputEvent::DragStart(Point::new(30, 5)));
    w.send(InputEvent::DragMove(Point::new(5, 5)));
    assert!(!w.router.is_dragging());
    assert_eq!(w.viewport.offset(), Point::new(0.0, 0.0));
  }

  #[test]
  fn wheel_zooms_toward_pointer() {
    let mut w = World::new();
    w.send(InputEvent::Wheel {
      at: Point::new(4, 6),
      notches: 3,
    });
    assert!(w.viewport.zoom() > 1.0);
    let under = w.viewport.screen_to_world(Point::new(4.0, 6.0));
    assert!(under.approx_eq(Point::new(4.0, 6.0), 1e-9));
    assert_eq!(w.viewport.world_cell(Point::new(4, 6)), Point::new(4, 6));

    let zoom = w.viewport.zoom();
    w.send(InputEvent::Wheel {
      at: Point::new(40, 6),
      notches: 3,
    });
    assert_eq!(w.viewport.zoom(), zoom);
  }

  #[test]
  fn keys() {
    let mut w = World::new();
    assert_eq!(w.send(InputEvent::Key(KeyCode::Esc)), Command::Quit);
    assert_eq!(
      w.send(InputEvent::Key(KeyCode::Char('d'))),
      Command::ToggleDebug
    );

    w.send(InputEvent::Key(KeyCode::Right));
    assert_eq!(w.viewport.offset(), Point::new(1.0, 0.0));

    w.send(InputEvent::Key(KeyCode::Char('+')));
    assert!(w.viewport.zoom() > 1.0);
    w.send(InputEvent::Key(KeyCode::Home));
    assert_eq!(w.viewport.zoom(), 1.0);
  }

  #[test]
  fn leaving_the_screen_hides_nothing_that_was_not_shown() {
    let mut w = World::new();
    w.send(InputEvent::Move(Point::new(50, 50)));
    assert_eq!(w.tooltip.phase(), Phase::Hidden);
    assert_eq!(w.tooltip.hover(), None);
    assert_eq!(
      w.send(InputEvent::Resize(100, 30)),
      Command::Resize(100, 30)
    );
  }

  #[test]
  fn leave_and_off_screen_moves_agree() {
    let mut a = World::new();
    let mut b = World::new();
    let at = |t| Duration::from_millis(t);
    for w in [&mut a, &mut b] {
      w.router.dispatch(
        InputEvent::Move(Point::new(3, 3)),
        at(0),
        Targets {
          grid: &w.grid,
          viewport: &mut w.viewport,
          tooltip: &mut w.tooltip,
        },
      );
      w.tooltip.advance(at(1000));
      assert_eq!(w.tooltip.phase(), Phase::Visible);
    }

    a.router.dispatch(
      InputEvent::Leave,
      at(1000),
      Targets {
        grid: &a.grid,
        viewport: &mut a.viewport,
        tooltip: &mut a.tooltip,
      },
    );
    b.router.dispatch(
      InputEvent::Move(Point::new(25, 3)),
      at(1000),
      Targets {
        grid: &b.grid,
        viewport: &mut b.viewport,
        tooltip: &mut b.tooltip,
      },
    );
    assert_eq!(a.tooltip.phase(), Phase::Disappearing);
    assert_eq!(b.tooltip.phase(), Phase::Disappearing);
    assert_eq!(a.tooltip.hover(), b.tooltip.hover());
  }
}
