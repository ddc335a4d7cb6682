mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const POLL_RATE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub tick_ms: Option<u64>,
    pub assets: PathBuf,
    pub roster: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: None,
            assets: PathBuf::from("assets"),
            roster: None,
        }
    }
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let mut app = App::bootstrap(
        &options.assets,
        options.roster,
        options.seed,
        options.tick_ms,
    )?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--tick-ms" => {
                if let Some(value) = args.get(idx + 1) {
                    options.tick_ms = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--roster" => {
                if let Some(value) = args.get(idx + 1) {
                    options.roster = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

/// Deals at most one card per tick interval, and only between key presses,
/// so round mutations never overlap.
fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        let interval = app.tick_interval();
        let timeout = interval
            .saturating_sub(last_tick.elapsed())
            .min(POLL_RATE);
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_prompt_key(key) {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        }
        if !app.round.is_running() {
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= interval {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!("middl-cui requires an interactive TTY (run directly in a terminal)");
}
