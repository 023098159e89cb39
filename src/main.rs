mod audio;
mod audio_api;
mod cli;
mod config;
mod error;
mod loader;
mod middle;
mod pipeline;
mod shared;
mod tui;

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use audio_api::AudioCommand;
use cli::{Args, Parser};
use loader::catalog::Catalog;
use middle::Middle;
use shared::InputEvent;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("soundboard starting up");

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path);
    args.apply(&mut config);
    if args.write_config {
        config::save_config(&config, &config_path)
            .with_context(|| format!("writing config to {:?}", config_path))?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    let mut catalog = Catalog::load(&config.sounds_dir, &config.extension, &config.color_map)
        .with_context(|| format!("loading clips from {:?}", config.sounds_dir))?;
    if catalog.is_empty() {
        log::warn!("no .{} clips in {:?}", config.extension, config.sounds_dir);
    }
    let audio = audio::start_audio().context("starting audio output")?;

    // decode every clip up front; a clip that fails stays silent but listed
    let paths: Vec<_> = catalog.iter().map(|(id, clip)| (id, clip.path.clone())).collect();
    for (id, path) in paths {
        match loader::sample_loader::load(&path, audio.sample_rate()) {
            Ok((sample_id, buffer)) => {
                log::debug!("decoded {:?} as {sample_id}, {:.2}s", path, buffer.duration_secs());
                // an unregistered clip stays silent and keeps its timing
                if audio.send(AudioCommand::RegisterSample { id: sample_id, buffer }) {
                    catalog.set_sample_id(id, sample_id);
                }
            }
            Err(e) => log::warn!("could not decode {:?}: {}", path, e),
        }
    }

    let mut middle = Middle::new(catalog, &config);

    terminal::enable_raw_mode()?;
    crossterm::execute!(stdout(), EnableMouseCapture)?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        // engine busy flags feed the busy-poll scheduler
        middle.set_busy(audio.busy_snapshot());
        let ds = middle.display_state();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &mut tui_state.hits);
        })?;

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                audio.send(AudioCommand::StopAll);
                log::info!("soundboard shutting down");
                return Ok(());
            }
            for cmd in middle.handle_input(event) {
                audio.send(cmd);
            }
        }

        let elapsed = last_tick.elapsed().as_secs_f64();
        last_tick = Instant::now();
        for cmd in middle.tick(elapsed) {
            audio.send(cmd);
        }
    }
}

// the terminal belongs to the UI, so log lines go to a file
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .with_context(|| format!("opening log file {:?}", args.log_file))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(stdout(), DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}
