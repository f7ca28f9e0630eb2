//! Turning a chosen set of routes into turn-by-turn ant moves, writing them out, and checking them.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use thiserror::Error;

use crate::colony::Colony;
use crate::room::RoomId;
use crate::route::Route;

/// Ants are numbered from 1.
pub type AntId = usize;

/// One ant entering one room during a turn.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Move {
    /// The ant moving.
    pub ant: AntId,
    /// The room it enters.
    pub room: RoomId,
}

/// Which route an ant takes and on which turn it leaves the start room.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dispatch {
    /// The ant being sent.
    pub ant: AntId,
    /// Position of the route in the plan's route list.
    pub route: usize,
    /// Turn on which the ant makes its first hop, counting from 1.
    pub departure: usize,
}

/// Assigns ants `1..=ants` to routes of the given hop counts.
///
/// Each ant in turn takes the route on which it would arrive earliest; ties go to the route listed first. An ant
/// that is the `q`-th on its route leaves on turn `q`, so every route launches at most one ant per turn and launches
/// on all routes interleave. The last arrival is exactly the [`min_turns`](crate::capacity::min_turns) of the routes,
/// and no route receives more ants than its capacity at that turn.
pub fn dispatch(hops: &[usize], ants: usize) -> Vec<Dispatch> {
    // (arrival of the next ant on this route, route)
    let mut queue = hops
        .iter()
        .enumerate()
        .map(|(route, &hops)| Reverse((hops, route)))
        .collect::<BinaryHeap<_>>();

    let mut dispatches = Vec::with_capacity(ants);
    for ant in 1..=ants {
        let Some(Reverse((arrival, route))) = queue.pop() else {
            break;
        };
        dispatches.push(Dispatch {
            ant,
            route,
            departure: arrival + 1 - hops[route],
        });
        queue.push(Reverse((arrival + 1, route)));
    }
    dispatches
}

/// The complete plan of moves, one entry per turn.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schedule {
    turns: Vec<Vec<Move>>,
}

impl Schedule {
    /// Lays out every ant's walk along `routes` for `ants` ants.
    ///
    /// Moves within a turn are ordered by ant.
    pub fn build(routes: &[Route], ants: usize) -> Self {
        let hops = routes.iter().map(Route::hops).collect_vec();
        let mut turns: Vec<Vec<Move>> = Vec::new();

        for Dispatch { ant, route, departure } in dispatch(&hops, ants) {
            for (step, &room) in routes[route].rooms().iter().enumerate().skip(1) {
                let turn = departure + step - 1;
                if turns.len() < turn {
                    turns.resize_with(turn, Vec::new);
                }
                turns[turn - 1].push(Move { ant, room });
            }
        }

        turns.iter_mut().for_each(|moves| moves.sort_unstable_by_key(|m| m.ant));
        Self { turns }
    }

    /// Moves grouped by turn, first turn first.
    pub fn turns(&self) -> &[Vec<Move>] {
        &self.turns
    }

    /// Number of turns until the last ant arrives.
    #[inline]
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Renders one line per turn, each move written `L<ant>-<room>`.
    pub fn display<'a>(&'a self, colony: &'a Colony) -> ScheduleDisplay<'a> {
        ScheduleDisplay { schedule: self, colony }
    }

    /// The moves with room names resolved, as [`read_moves`] would read them back.
    pub fn records(&self, colony: &Colony) -> Vec<Vec<MoveRecord>> {
        self.turns
            .iter()
            .map(|moves| {
                moves
                    .iter()
                    .map(|m| MoveRecord {
                        ant: m.ant,
                        room: colony.name_of(m.room).to_owned(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Replays this schedule on `colony`, checking every move.
    pub fn verify(&self, colony: &Colony) -> Result<Replay, ReplayError> {
        replay(colony, &self.records(colony))
    }
}

/// Helper returned by [`Schedule::display`].
pub struct ScheduleDisplay<'a> {
    schedule: &'a Schedule,
    colony: &'a Colony,
}

impl Display for ScheduleDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for moves in &self.schedule.turns {
            writeln!(
                f,
                "{}",
                moves.iter().map(|m| format!("L{}-{}", m.ant, self.colony.name_of(m.room))).join(" ")
            )?;
        }
        Ok(())
    }
}

/// A move as written in text, before the room name is resolved.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MoveRecord {
    /// The ant number as written after `L`.
    pub ant: AntId,
    /// The room name as written after `-`.
    pub room: String,
}

static MOVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^L(\d+)-(.+)$").expect("valid pattern"));
static MOVE_ANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^L(\d+)$").expect("valid pattern"));
static MOVE_ROOM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-(.+)$").expect("valid pattern"));

/// Reads move lines, one turn per non-blank line.
///
/// Each move is `L<ant>-<room>`. A stray space between the two halves (`L3 -room`) is tolerated. Anything else on the
/// line is skipped, and lines without a single move are dropped.
pub fn read_moves(text: &str) -> Vec<Vec<MoveRecord>> {
    let mut turns = Vec::new();

    for line in text.lines() {
        let tokens = line.split_whitespace().collect_vec();
        let mut moves = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if let Some(caps) = MOVE.captures(tokens[i]) {
                if let Ok(ant) = caps[1].parse() {
                    moves.push(MoveRecord { ant, room: caps[2].to_owned() });
                }
            } else if let (Some(ant), Some(room)) = (
                MOVE_ANT.captures(tokens[i]),
                tokens.get(i + 1).and_then(|next| MOVE_ROOM.captures(next)),
            ) {
                if let Ok(ant) = ant[1].parse() {
                    moves.push(MoveRecord { ant, room: room[1].to_owned() });
                }
                i += 1;
            }
            i += 1;
        }

        if !moves.is_empty() {
            turns.push(moves);
        }
    }

    turns
}

/// Summary of a successful [`replay`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Replay {
    /// Turns replayed.
    pub turns: usize,
    /// Ants that reached the end, which is every ant.
    pub ants: usize,
}

/// Reasons a move listing is illegal for a colony. Turns count from 1.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ReplayError {
    /// An ant number outside `1..=ants`.
    #[error("turn {turn}: there is no ant L{ant}")]
    UnknownAnt {
        /// Turn of the offending move.
        turn: usize,
        /// The ant number as written.
        ant: AntId,
    },
    /// A move into a room the colony does not have.
    #[error("turn {turn}: there is no room `{room}`")]
    UnknownRoom {
        /// Turn of the offending move.
        turn: usize,
        /// The room name as written.
        room: String,
    },
    /// A move between rooms with no tunnel between them.
    #[error("turn {turn}: L{ant} cannot go from `{from}` to `{to}`, they are not linked")]
    NoTunnel {
        /// Turn of the offending move.
        turn: usize,
        /// The ant concerned.
        ant: AntId,
        /// Where the ant was.
        from: String,
        /// Where it tried to go.
        to: String,
    },
    /// An ant listed twice in one turn.
    #[error("turn {turn}: L{ant} moves more than once")]
    MovedTwice {
        /// Turn of the offending move.
        turn: usize,
        /// The ant concerned.
        ant: AntId,
    },
    /// An ant moving again once it has arrived.
    #[error("turn {turn}: L{ant} moves after reaching the end")]
    MovedAfterArrival {
        /// Turn of the offending move.
        turn: usize,
        /// The ant concerned.
        ant: AntId,
    },
    /// Two ants ending a turn in the same ordinary room.
    #[error("turn {turn}: more than one ant in room `{room}`")]
    Collision {
        /// Turn at whose end the rooms are checked.
        turn: usize,
        /// The crowded room.
        room: String,
    },
    /// An ant still short of the end after the last turn.
    #[error("L{ant} never reaches the end, it stops in `{room}`")]
    Stranded {
        /// The ant concerned.
        ant: AntId,
        /// Where it stopped.
        room: String,
    },
}

/// Replays `turns` on `colony` from every ant waiting at the start, checking each move.
pub fn replay(colony: &Colony, turns: &[Vec<MoveRecord>]) -> Result<Replay, ReplayError> {
    let (start, end) = (colony.start(), colony.end());
    // indexed by ant - 1
    let mut positions = vec![start; colony.ants()];

    for (turn, moves) in turns.iter().enumerate().map(|(i, moves)| (i + 1, moves)) {
        let mut moved = HashSet::with_capacity(moves.len());

        for MoveRecord { ant, room } in moves {
            let ant = *ant;
            let Some(position) = ant.checked_sub(1).and_then(|index| positions.get_mut(index)) else {
                return Err(ReplayError::UnknownAnt { turn, ant });
            };
            let Some(target) = colony.room_by_name(room) else {
                return Err(ReplayError::UnknownRoom { turn, room: room.clone() });
            };
            if !moved.insert(ant) {
                return Err(ReplayError::MovedTwice { turn, ant });
            }
            if *position == end {
                return Err(ReplayError::MovedAfterArrival { turn, ant });
            }
            if !colony.is_linked(*position, target) {
                return Err(ReplayError::NoTunnel {
                    turn,
                    ant,
                    from: colony.name_of(*position).to_owned(),
                    to: room.clone(),
                });
            }
            *position = target;
        }

        if let Some(crowded) = positions.iter().filter(|&&room| !colony.is_terminal(room)).duplicates().next() {
            return Err(ReplayError::Collision {
                turn,
                room: colony.name_of(*crowded).to_owned(),
            });
        }
    }

    if let Some((index, &room)) = positions.iter().find_position(|&&room| room != end) {
        return Err(ReplayError::Stranded {
            ant: index + 1,
            room: colony.name_of(room).to_owned(),
        });
    }

    Ok(Replay {
        turns: turns.len(),
        ants: positions.len(),
    })
}
