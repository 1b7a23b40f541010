use amazed::maze::{self, GridMaze};
use amazed::solver::{ExecutorKind, SolveReport, Solver, SolverConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "amazed")]
#[command(about = "amazed - parallel fork/join maze solver")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// CLI execution substrate selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliExecutor {
    /// Single-threaded, deterministic
    Inline,
    /// One OS thread per search task
    Threads,
    /// Fixed-size worker pool
    Pool,
}

impl From<CliExecutor> for ExecutorKind {
    fn from(cli: CliExecutor) -> Self {
        match cli {
            CliExecutor::Inline => ExecutorKind::Inline,
            CliExecutor::Threads => ExecutorKind::Threads,
            CliExecutor::Pool => ExecutorKind::Pool,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find a path from the start '@' to a goal '$' in a map file
    Solve {
        /// Path to the maze map
        map: PathBuf,
        /// Node expansions between forks
        #[arg(long, short = 'f', default_value = "4")]
        fork_after: usize,
        /// Execution substrate for search tasks
        #[arg(long, value_enum, default_value = "pool")]
        executor: CliExecutor,
        /// Worker threads for the pool executor
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Never fork: search with the root task only
        #[arg(long)]
        sequential: bool,
        /// Print the map with the path drawn in
        #[arg(long)]
        show: bool,
        /// Enable verbose output
        #[arg(long, short)]
        verbose: bool,
    },
    /// Print a random perfect maze
    Generate {
        /// Map width in characters (odd)
        #[arg(long, default_value = "21")]
        width: usize,
        /// Map height in lines (odd)
        #[arg(long, default_value = "11")]
        height: usize,
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Options for a solve run
struct SolveOptions {
    config: SolverConfig,
    show: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "amazed=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

// --- Solve ---

fn solve_map(map: &Path, options: &SolveOptions) -> Result<SolveReport> {
    let text = std::fs::read_to_string(map)
        .with_context(|| format!("failed to read maze map {}", map.display()))?;
    let maze = Arc::new(
        GridMaze::parse(&text).with_context(|| format!("invalid maze map {}", map.display()))?,
    );

    println!(
        "Solving maze: {} ({}x{})",
        map.display(),
        maze.width(),
        maze.height()
    );
    let config = &options.config;
    if config.forks() {
        println!("Fork after: {} expansions", config.fork_after);
    } else {
        println!("Fork after: never");
    }
    match config.executor {
        ExecutorKind::Pool => println!("Executor: pool ({} workers)", config.workers),
        other => println!("Executor: {}", other),
    }

    let solver = Solver::new(maze.clone(), config.clone()).context("failed to set up solver")?;
    let report = solver.run().context("search failed")?;

    match &report.path {
        Some(path) => {
            let steps: Vec<String> = path.iter().map(|n| n.to_string()).collect();
            println!(
                "\nPath found ({} steps): {}",
                path.len().saturating_sub(1),
                steps.join(" -> ")
            );
            if options.show {
                println!();
                print!("{}", maze.render(path));
            }
        }
        None => println!("\nNo path found."),
    }

    print_search_statistics(&report, &maze);
    Ok(report)
}

/// Print search statistics
fn print_search_statistics(report: &SolveReport, maze: &GridMaze) {
    println!("\nSearch Statistics:");
    for line in report.statistics.format_summary().lines() {
        println!("  {}", line);
    }
    println!("  Players: {}", maze.players());
    println!("  Player moves: {}", maze.moves());
}

// --- Main Function ---
fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        Commands::Solve {
            map,
            fork_after,
            executor,
            workers,
            sequential,
            show,
            verbose,
        } => {
            init_logging(verbose);

            let mut config = SolverConfig::default()
                .with_fork_after(fork_after)
                .with_executor(executor.into())
                .with_workers_option(workers);
            if sequential {
                config = config.sequential();
            }
            let options = SolveOptions { config, show };

            match solve_map(&map, &options) {
                Ok(report) if report.found() => ExitCode::SUCCESS,
                Ok(_) => ExitCode::from(2),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Generate {
            width,
            height,
            seed,
        } => {
            init_logging(false);
            match maze::generate(width, height, seed) {
                Ok(text) => {
                    print!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error generating maze: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
