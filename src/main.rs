use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use cheese_maze::{drive, parse_mazes, MazeError, Solver, Status};
use clap::{Parser, Subcommand};
use console::{style, Key, StyledObject, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

/// Watch a mouse find the cheese by depth-first search.
#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Animate the mazes of FILE interactively.
    Play {
        file: PathBuf,
        /// Delay between two animation steps, in milliseconds.
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
    /// Solve every maze of FILE and report the outcomes.
    Solve {
        file: PathBuf,
        /// Print the final state of every maze as JSON.
        #[arg(long)]
        json: bool,
    },
}

enum Action {
    Exit,
    Toggle,
    Step,
    Reset,
    Next,
    Prev,
}

impl TryFrom<Key> for Action {
    type Error = ();

    fn try_from(key: Key) -> Result<Self, Self::Error> {
        Ok(match key {
            Key::Enter | Key::Char(' ') => Self::Toggle,
            Key::Char('n') => Self::Step,
            Key::Char('r') => Self::Reset,
            Key::Tab | Key::ArrowDown | Key::Char('j') => Self::Next,
            Key::BackTab | Key::ArrowUp | Key::Char('k') => Self::Prev,
            Key::Escape | Key::Char('q') => Self::Exit,
            _ => return Err(()),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Play { file, delay_ms } => play(load(&file)?, Duration::from_millis(delay_ms)),
        Command::Solve { file, json } => solve(load(&file)?, json),
    }
}

fn load(path: &Path) -> Result<Vec<Solver>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mazes = parse_mazes(&data).context("Failed to parse the mazes")?;
    mazes
        .into_iter()
        .enumerate()
        .map(|(i, grid)| Solver::new(grid).with_context(|| format!("Maze #{i} is malformed")))
        .collect()
}

fn play(mut solvers: Vec<Solver>, delay: Duration) -> Result<()> {
    let term = Term::stderr();
    let keys = spawn_key_reader(term.clone());
    let count = solvers.len();
    let mut selected = 0;
    let mut pending = None;
    loop {
        draw(&term, selected, count, &solvers[selected])?;

        let action = match pending.take() {
            Some(action) => action,
            None => keys.recv().context("Key reader stopped")?,
        };

        let solver = &mut solvers[selected];
        match action {
            Action::Exit => break,
            // Same as the page's single button: start when idle, reset otherwise.
            Action::Toggle if solver.status() == Status::Idle => {
                let mut drawn = Ok(());
                drive::run(solver, |solver| {
                    if drawn.is_ok() {
                        drawn = draw(&term, selected, count, solver);
                    }
                    thread::sleep(delay);
                    match keys.try_recv() {
                        Ok(action @ (Action::Toggle | Action::Reset | Action::Exit)) => {
                            pending = Some(action);
                            ControlFlow::Break(())
                        }
                        _ => ControlFlow::Continue(()),
                    }
                })?;
                drawn?;
            }
            Action::Toggle | Action::Reset => solver.reset(),
            Action::Step if solver.status() == Status::Idle => solver.start()?,
            Action::Step => match solver.step() {
                Ok(_) | Err(MazeError::Unsolvable) => {}
                Err(err) => return Err(err.into()),
            },
            Action::Next => selected = (selected + 1) % count,
            Action::Prev => selected = (selected + count - 1) % count,
        }
    }

    Ok(())
}

/// Keys are read off the animation thread so a running animation can be stopped.
fn spawn_key_reader(term: Term) -> Receiver<Action> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(key) = term.read_key() {
            let Ok(action) = Action::try_from(key) else {
                continue;
            };
            if tx.send(action).is_err() {
                break;
            }
        }
    });
    rx
}

fn draw(term: &Term, index: usize, count: usize, solver: &Solver) -> io::Result<()> {
    term.clear_screen()?;
    term.write_line(&format!(
        "{} {}/{count}",
        style("Find the cheese").bold(),
        index + 1
    ))?;

    let rendered = solver.to_string();
    for line in rendered.lines().take(solver.grid().height()) {
        term.write_line(&line.chars().map(|ch| paint(ch).to_string()).collect::<String>())?;
    }

    let status = match solver.status() {
        Status::Idle => style(solver.status()).bold(),
        Status::Running => style(solver.status()).cyan().bold(),
        Status::Solved => style(solver.status()).green().bold(),
        Status::Unsolvable => style(solver.status()).red().bold(),
    };
    let heading = solver
        .last_direction()
        .map_or_else(|| "-".to_owned(), |dir| dir.to_string());
    term.write_line(&format!(
        "{status}  path {}  visited {}  heading {heading}",
        solver.path().len(),
        solver.visited().len(),
    ))?;
    term.write_line(
        &style("enter: start/reset  n: step  r: reset  tab/j/k: maze  q: quit")
            .dim()
            .to_string(),
    )
}

fn paint(ch: char) -> StyledObject<char> {
    let styled = style(ch);
    match ch {
        '@' => styled.yellow().bold(),
        '*' => styled.green(),
        '~' => styled.dim(),
        '#' => styled.black().on_green(),
        'S' => styled.magenta(),
        'E' => styled.yellow(),
        _ => styled,
    }
}

fn solve(solvers: Vec<Solver>, json: bool) -> Result<()> {
    let pb = ProgressBar::new(solvers.len() as u64)
        .with_style(ProgressStyle::with_template("{bar:40} {pos}/{len} mazes")?);

    let results = solvers
        .into_par_iter()
        .map(|mut solver| -> Result<_, MazeError> {
            let outcome = drive::run(&mut solver, |_| ControlFlow::Continue(()))?;
            pb.inc(1);
            Ok((solver, outcome))
        })
        .collect::<Result<Vec<_>, MazeError>>()?;
    pb.finish_and_clear();

    if json {
        let snapshots = results
            .iter()
            .map(|(solver, _)| solver.snapshot())
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    for (i, (solver, outcome)) in results.iter().enumerate() {
        match outcome.status {
            Status::Solved => println!(
                "maze {i}: {} in {} steps, path length {}, {} cells visited",
                style("solved").green(),
                outcome.steps,
                solver.path().len(),
                solver.visited().len(),
            ),
            status => println!(
                "maze {i}: {} after {} steps, {} cells visited",
                style(status).red(),
                outcome.steps,
                solver.visited().len(),
            ),
        }
    }
    Ok(())
}
