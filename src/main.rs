//! `cellmap`: browse a generated region map in the terminal.

use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cellmap::app::App;
use cellmap::config::Config;
use cellmap::gfx::curses;
use cellmap::gfx::Curses;
use cellmap::input::UserInput;
use cellmap::map::gen;
use cellmap::timing::FrameTimer;
use cellmap::timing::StageTimer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// JSON file overriding the default settings.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Seed for the generated map.
  #[arg(short, long, default_value_t = 0)]
  seed: u64,

  /// Width of the generated map, in cells.
  #[arg(long, default_value_t = 240)]
  width: usize,

  /// Height of the generated map, in cells.
  #[arg(long, default_value_t = 120)]
  height: usize,

  /// Start with the debug overlay shown.
  #[arg(short, long, default_value_t = false)]
  debug: bool,

  /// Where to write logs; nothing is logged if absent.
  #[arg(long)]
  log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
  let file = File::create(path)
    .with_context(|| format!("could not create {}", path.display()))?;
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  if let Some(path) = &cli.log_file {
    init_logging(path)?;
  }

  let config = match &cli.config {
    Some(path) => Config::load(path)?,
    None => Config::default(),
  };
  tracing::debug!(?config, "loaded config");

  let index = gen::legend_index(config.color_tolerance)
    .context("could not build the region legend")?;
  let grid = gen::generate(cli.seed, cli.width, cli.height, &index)
    .context("could not generate the map")?
    .with_void(config.void_rgb());

  let screen = curses::dims().context("could not query the terminal size")?;
  let mut app = App::new(&config, grid, index, screen);
  app.set_debug_mode(cli.debug);

  let mut window = Curses::init().context("could not set up the terminal")?;
  let mut input = UserInput::new();
  let mut timer = FrameTimer::new();
  let stages = StageTimer::new();
  let result = app.run(&mut window, &mut input, &mut timer, &stages);
  drop(window);

  result.context("terminal error")?;
  tracing::info!("session end");
  Ok(())
}
