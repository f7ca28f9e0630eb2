#![warn(missing_docs)]

//! # `anthill`
//!
//! Plans how a colony of ants crosses an ant farm: a fixed number of ants wait in a start room and must all reach an
//! end room, moving through tunnels one hop per turn, with no ordinary room ever holding two ants at once.
//! Begin by describing the farm, either through a [`ColonyBuilder`] or in text with [`parse_colony`].
//! Call [`solve()`](Colony::solve) on the resulting [`Colony`] to get an [`Outcome`] whose [`Plan`] holds the routes,
//! the turn count and the [`Schedule`] of moves; [`Schedule::display`] writes the familiar `L1-room L2-other` lines.
//!
//! # Internals
//! Ants on one route follow each other a turn apart, so a route of `L` hops delivers `T - L + 1` ants within `T`
//! turns. Several routes can be used together as long as they share no room besides start and end. Solving is then:
//!
//! 1. discover up to [`SolverConfig::max_paths`] simple start-to-end routes depth-first, in tunnel declaration order,
//!    and sort them by length, keeping discovery order among equals;
//! 2. search every subset of pairwise disjoint routes for the one needing the fewest turns, breaking ties by the
//!    lowest route indices and then by using fewer routes (see [`capacity::min_turns`]);
//! 3. hand each ant the route where it would arrive earliest, and lay out the moves turn by turn.
//!
//! Step 2 is exponential in the number of discovered routes. It is kept tractable by the route cap, by
//! branch-and-bound pruning that never changes the answer, and by exploring the first decisions in parallel.
//! When the cap or the optional [`node budget`](SolverConfig::node_budget) cut the search short the result is an
//! [`Outcome::BestEffort`] rather than [`Outcome::Optimal`].

pub use builder::{BuilderInvalidReason, ColonyBuilder};
pub use colony::Colony;
pub use location::Location;
pub use parse::{parse_colony, ParseError};
pub use room::{Room, RoomId, RoomKind};
pub use route::{discover_routes, Route};
pub use schedule::{read_moves, Move, MoveRecord, Replay, ReplayError, Schedule};
pub use solver::{Outcome, Plan, Solver, SolverConfig, SolverFailure, Truncation};

pub mod builder;
pub mod capacity;
pub(crate) mod colony;
pub(crate) mod location;
pub mod parse;
pub(crate) mod room;
pub mod route;
pub mod schedule;
pub(crate) mod select;
pub(crate) mod solver;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
