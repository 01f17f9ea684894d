//! `curses` helper library.
//!
//! Note that this module doesn't *actually* use `libcurses`, and merely
//! emulates its behavior at a high level in terms of `crossterm`.

use std::io;

use crate::gfx::texel;
use crate::gfx::texel::Texel;

/// Returns the current dimensions of the terminal window, as `(cols, rows)`.
pub fn dims() -> crossterm::Result<(u16, u16)> {
  crossterm::terminal::size()
}

/// A low-level curses context.
///
/// Creating one switches the terminal to the alternate screen with mouse
/// capture enabled; dropping it restores the terminal.
pub struct Curses<W: io::Write = io::Stdout> {
  w: W,
  raw: bool,
}

impl Curses {
  /// Initializes the `curses` environment on `stdout`, putting the terminal
  /// into raw mode.
  ///
  /// If setting up the screen fails, raw mode is turned back off before the
  /// error is returned.
  pub fn init() -> crossterm::Result<Curses> {
    crossterm::terminal::enable_raw_mode()?;
    match Curses::with(io::stdout()) {
      Ok(mut curses) => {
        curses.raw = true;
        Ok(curses)
      }
      Err(e) => {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
          tracing::warn!("failed to leave raw mode: {}", e);
        }
        Err(e)
      }
    }
  }
}

/// Arguments for a draw call.
///
/// See [`Curses::draw()`].
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug)]
pub struct DrawCall {
  pub row: u16,
  pub col: u16,
  pub texel: Texel,
}

fn term_color(color: texel::Color) -> crossterm::style::Color {
  use crossterm::style::Color;
  match color {
    texel::Color::Rgb(rgb) => Color::Rgb {
      r: rgb.red,
      g: rgb.green,
      b: rgb.blue,
    },
    _ => Color::Reset,
  }
}

impl<W: io::Write> Curses<W> {
  /// Initializes the `curses` environment for `w`.
  ///
  /// This does not touch the terminal's line discipline; see
  /// [`Curses::init()`].
  pub fn with(mut w: W) -> crossterm::Result<Curses<W>> {
    crossterm::execute!(
      w,
      crossterm::terminal::EnterAlternateScreen,
      crossterm::cursor::Hide,
      crossterm::terminal::DisableLineWrap,
      crossterm::event::EnableMouseCapture,
    )?;
    Ok(Curses { w, raw: false })
  }

  /// Returns the underlying writer.
  pub fn writer(&self) -> &W {
    &self.w
  }

  /// Queues a draw of a single texel at the given location on the screen.
  ///
  /// Nothing becomes visible until [`Curses::flush()`] is called.
  pub fn draw(&mut self, call: DrawCall) -> crossterm::Result<()> {
    use crossterm::style::Colors;

    crossterm::queue!(
      self.w,
      crossterm::cursor::MoveTo(call.col, call.row),
      crossterm::style::SetColors(Colors {
        foreground: Some(term_color(call.texel.fg())),
        background: Some(term_color(call.texel.bg())),
      }),
      crossterm::style::Print(call.texel.glyph().unwrap_or(' ')),
    )
  }

  /// Flushes all queued draw calls.
  pub fn flush(&mut self) -> crossterm::Result<()> {
    self.w.flush()?;
    Ok(())
  }

  /// Clean up whatever mess the terminal made.
  fn cleanup(&mut self) -> crossterm::Result<()> {
    crossterm::execute!(
      self.w,
      crossterm::event::DisableMouseCapture,
      crossterm::style::ResetColor,
      crossterm::terminal::LeaveAlternateScreen,
      crossterm::cursor::Show,
      crossterm::terminal::EnableLineWrap,
    )?;
    if self.raw {
      crossterm::terminal::disable_raw_mode()?;
      self.raw = false;
    }
    self.flush()
  }
}

impl<W: io::Write> Drop for Curses<W> {
  fn drop(&mut self) {
    if let Err(e) = self.cleanup() {
      tracing::warn!("failed to restore terminal: {}", e);
    }
  }
}
