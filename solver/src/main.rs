//! Command-line front end: reads a colony, prints it back followed by the ants' moves.
#![forbid(unsafe_code)]

use std::io::Read;
use std::path::PathBuf;

use anthill::{parse_colony, read_moves, Outcome, ParseError, Replay, ReplayError, SolverConfig, SolverFailure};
use clap::Parser;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "anthill", about = "Move every ant from start to end in as few turns as possible", version)]
struct Cli {
    /// Colony description to read; stdin when omitted.
    #[arg(value_name = "path")]
    path: Option<PathBuf>,
    /// How many routes to discover before choosing among them.
    #[arg(long, value_name = "n", default_value_t = SolverConfig::default().max_paths)]
    max_paths: usize,
    /// Stop searching after this many steps and keep the best plan so far.
    #[arg(long, value_name = "n")]
    node_budget: Option<u64>,
    /// Choose routes on the current thread only.
    #[arg(long)]
    sequential: bool,
    /// Check the moves that follow the colony instead of solving it.
    #[arg(long)]
    verify: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read stdin: {0}")]
    ReadStdin(#[source] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Solve(#[from] SolverFailure),
    #[error("illegal moves: {0}")]
    Replay(#[from] ReplayError),
    #[error("no moves follow the colony")]
    NoMoves,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("anthill: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let input = match &cli.path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input).map_err(CliError::ReadStdin)?;
            input
        }
    };

    if cli.verify {
        let replay = verify(&input)?;
        println!("ok: {} ant(s) arrive in {} turn(s)", replay.ants, replay.turns);
        return Ok(());
    }

    let config = SolverConfig::default()
        .with_max_paths(cli.max_paths)
        .with_node_budget(cli.node_budget)
        .with_parallel(!cli.sequential);
    let colony = parse_colony(&input)?;
    let outcome = colony.solve_with(config)?;

    if let Outcome::BestEffort { truncation, .. } = &outcome {
        eprintln!("anthill: warning: search was cut short ({truncation:?}), the plan may not be optimal");
    }

    print!("{}", input.trim_end());
    println!("\n");
    print!("{}", outcome.plan().schedule().display(&colony));
    Ok(())
}

/// Splits solver output into the colony description and the move lines.
///
/// Room names never start with `L`, so the first such line opens the moves; the blank line that conventionally
/// precedes them stays with the description, where it is ignored.
fn split_moves(input: &str) -> Result<(&str, &str), CliError> {
    let at = input
        .split_inclusive('\n')
        .scan(0, |offset, line| {
            let at = *offset;
            *offset += line.len();
            Some((at, line))
        })
        .find(|(_, line)| line.trim_start().starts_with('L'))
        .map(|(at, _)| at)
        .ok_or(CliError::NoMoves)?;
    Ok(input.split_at(at))
}

fn verify(input: &str) -> Result<Replay, CliError> {
    let (header, moves) = split_moves(input)?;
    let colony = parse_colony(header)?;
    Ok(colony.replay(&read_moves(moves))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLONY: &str = "2\n##start\ns 0 0\na 1 0\n##end\ne 2 0\ns-a\na-e\n";

    #[test]
    fn splits_at_the_first_move() {
        let input = format!("{COLONY}\nL1-a\nL1-e L2-a\nL2-e\n");
        let (header, moves) = split_moves(&input).unwrap();
        assert_eq!(header, format!("{COLONY}\n"));
        assert_eq!(moves, "L1-a\nL1-e L2-a\nL2-e\n");
    }

    #[test]
    fn verifies_solver_output() {
        let replay = verify(&format!("{COLONY}\nL1-a\nL1-e L2-a\nL2-e\n")).unwrap();
        assert_eq!((replay.ants, replay.turns), (2, 3));

        // no blank line, Windows line endings
        let replay = verify(&format!("{COLONY}L1-a\r\nL1-e L2-a\r\nL2-e\r\n")).unwrap();
        assert_eq!(replay.turns, 3);
    }

    #[test]
    fn rejects_illegal_or_missing_moves() {
        let err = verify(&format!("{COLONY}\nL1-a L2-a\nL1-e\nL2-e\n")).unwrap_err();
        assert!(matches!(err, CliError::Replay(ReplayError::Collision { turn: 1, .. })), "{err}");

        assert!(matches!(verify(COLONY), Err(CliError::NoMoves)));
    }
}
