//! Weighted Sokoban solver
//!
//! Loads one or more puzzles and solves each with breadth-first, depth-first, uniform-cost and
//! A* search, reporting steps, total weight pushed, states checked, time and memory for each.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use sokoweight::harness::{self, HarnessConfigBuilder, Report};
use sokoweight::{Puzzle, SearchMode};

/// Solves weighted Sokoban puzzles with several search strategies.
#[derive(Parser)]
#[command(name = "sokoweight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle files; a single puzzle is read from stdin if none are given.
    inputs: Vec<PathBuf>,

    /// Run only this strategy instead of all four.
    #[arg(short, long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Give up on a strategy after checking this many states.
    #[arg(long)]
    max_states: Option<usize>,

    /// Write each report next to its input (input-XX.txt becomes output-XX.txt).
    #[arg(short, long)]
    save: bool,

    /// Print reports as JSON.
    #[arg(long)]
    json: bool,

    /// Print every board of each solution.
    #[arg(long)]
    show_path: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Bfs,
    Dfs,
    Ucs,
    Astar,
}

impl From<Algorithm> for SearchMode {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => SearchMode::BreadthFirst,
            Algorithm::Dfs => SearchMode::DepthFirst,
            Algorithm::Ucs => SearchMode::UniformCost,
            Algorithm::Astar => SearchMode::BestFirst,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = HarnessConfigBuilder::default();
    config.max_states(cli.max_states);
    if let Some(algorithm) = cli.algorithm {
        config.modes(vec![algorithm.into()]);
    }
    let config = config.build()?;

    if cli.inputs.is_empty() {
        let input = io::read_to_string(io::stdin()).context("Failed to read stdin")?;
        let puzzle = Puzzle::parse(&input)?;

        if cli.save {
            log::warn!("Nowhere to save a puzzle read from stdin, printing instead");
        }

        let reports = harness::run(&puzzle, &config);
        print!("{}", render(&reports, cli.json, cli.show_path)?);
        return Ok(());
    }

    for path in &cli.inputs {
        let puzzle = Puzzle::from_file(path)?;
        log::info!("Loaded {}:\n{}", path.display(), puzzle.board);

        let reports = harness::run(&puzzle, &config);
        let output = render(&reports, cli.json, cli.show_path)?;

        if cli.save {
            let target = output_path(path);
            std::fs::write(&target, &output)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("Wrote {}", target.display());
        } else {
            if cli.inputs.len() > 1 {
                println!("== {} ==", path.display());
            }
            print!("{output}");
        }
    }

    Ok(())
}

fn render(reports: &[Report], json: bool, show_path: bool) -> Result<String> {
    if json {
        let mut output = serde_json::to_string_pretty(reports)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();
    for report in reports {
        writeln!(output, "{report}")?;

        if show_path {
            for (i, board) in report.boards.iter().enumerate() {
                writeln!(output, "-- {i} --")?;
                write!(output, "{board}")?;
            }
        }
    }

    Ok(output)
}

// input-XX.txt is written to output-XX.txt, anything else gets an output- prefix
fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let name = match name.strip_prefix("input-") {
        Some(rest) => format!("output-{rest}"),
        None => format!("output-{name}"),
    };

    input.with_file_name(name)
}

#[cfg(test)]
mod test_cli {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("data/input-03.txt")),
            PathBuf::from("data/output-03.txt")
        );
        assert_eq!(
            output_path(Path::new("levels/microban.txt")),
            PathBuf::from("levels/output-microban.txt")
        );
    }

    #[test]
    fn test_render_show_path() {
        let puzzle = Puzzle::parse("5\n#####\n#   #\n#@$.#\n#   #\n#####\n").unwrap();
        let config = HarnessConfigBuilder::default()
            .modes(vec![SearchMode::BreadthFirst])
            .build()
            .unwrap();
        let reports = harness::run(&puzzle, &config);

        let output = render(&reports, false, true).unwrap();
        assert!(output.starts_with("BFS\nSteps: 1, Weight: 5, Node: 4, "));
        assert!(output.contains("\nR\n-- 0 --\n#####\n#   #\n#@$.#\n"));
        assert!(output.ends_with("-- 1 --\n#####\n#   #\n# @*#\n#   #\n#####\n"));
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from(["sokoweight", "-a", "astar", "--max-states", "100", "a.txt"]);
        assert!(matches!(cli.algorithm, Some(Algorithm::Astar)));
        assert_eq!(cli.max_states, Some(100));
        assert_eq!(cli.inputs, vec![PathBuf::from("a.txt")]);
        assert!(!cli.save);
    }
}
