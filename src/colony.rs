use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::num::NonZero;

use petgraph::graphmap::UnGraphMap;

use crate::room::{Room, RoomId, RoomKind};
use crate::schedule::{self, MoveRecord, Replay, ReplayError};
use crate::solver::{Outcome, Solver, SolverConfig, SolverFailure};

/// An immutable ant colony: rooms, the tunnels between them, a start, an end, and a number of ants.
///
/// [`Colony`]s are built with a [`ColonyBuilder`](crate::builder::ColonyBuilder) or parsed from text with
/// [`parse_colony`](crate::parse::parse_colony); either way the result always has exactly one start, exactly one
/// end distinct from it, and at least one ant.
///
/// Tunnels are remembered in the order they were declared, and [`Colony::neighbors`] yields them in that order.
/// Route discovery, and therefore tie-breaking between equally good plans, depends on it.
#[derive(Clone, Debug)]
pub struct Colony {
    pub(crate) graph: UnGraphMap<RoomId, ()>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) names: HashMap<String, RoomId>,
    pub(crate) start: RoomId,
    pub(crate) end: RoomId,
    pub(crate) ants: NonZero<usize>,
}

impl Colony {
    /// Plans the ants' journey with the default [`SolverConfig`].
    ///
    /// Returns according to [`Solver::solve`].
    pub fn solve(&self) -> Result<Outcome, SolverFailure> {
        Solver::default().solve(self)
    }

    /// Plans the ants' journey with an explicit configuration.
    pub fn solve_with(&self, config: SolverConfig) -> Result<Outcome, SolverFailure> {
        Solver::new(config).solve(self)
    }

    /// Checks a turn-by-turn move listing against this colony, e.g. one read back with
    /// [`read_moves`](crate::schedule::read_moves).
    pub fn replay(&self, turns: &[Vec<MoveRecord>]) -> Result<Replay, ReplayError> {
        schedule::replay(self, turns)
    }

    /// The room every ant starts in.
    #[inline]
    pub fn start(&self) -> RoomId {
        self.start
    }

    /// The room every ant must reach.
    #[inline]
    pub fn end(&self) -> RoomId {
        self.end
    }

    /// Number of ants waiting in the start room.
    #[inline]
    pub fn ants(&self) -> usize {
        self.ants.get()
    }

    /// Looks up a room by id. Ids handed out by this colony are always valid.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    /// Looks up a room by its declared name.
    pub fn room_by_name(&self, name: &str) -> Option<RoomId> {
        self.names.get(name).copied()
    }

    /// Every room, in declaration order, alongside its id.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> + '_ {
        self.rooms.iter().enumerate().map(|(index, room)| (RoomId(index), room))
    }

    /// Number of rooms, start and end included.
    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of distinct tunnels.
    #[inline]
    pub fn tunnel_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Rooms directly reachable from `id`, in tunnel declaration order.
    pub fn neighbors(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.graph.neighbors(id)
    }

    /// Whether a tunnel joins `a` and `b`, in either direction.
    pub fn is_linked(&self, a: RoomId, b: RoomId) -> bool {
        self.graph.contains_edge(a, b)
    }

    /// Whether `id` may hold more than one ant at once.
    pub(crate) fn is_terminal(&self, id: RoomId) -> bool {
        id == self.start || id == self.end
    }

    pub(crate) fn name_of(&self, id: RoomId) -> &str {
        self.rooms.get(id.0).map_or("?", |room| room.name.as_str())
    }
}

/// Writes the colony back out in the text format understood by [`parse_colony`](crate::parse::parse_colony).
///
/// Rooms declared without a position are written at `0 0`.
impl Display for Colony {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.ants)?;
        for room in &self.rooms {
            match room.kind {
                RoomKind::Start | RoomKind::End => writeln!(f, "##{}", room.kind)?,
                RoomKind::Chamber => {}
            }
            let location = room.location.unwrap_or_default();
            writeln!(f, "{} {} {}", room.name, location.0, location.1)?;
        }
        for (a, b, _) in self.graph.all_edges() {
            writeln!(f, "{}-{}", self.name_of(a), self.name_of(b))?;
        }
        Ok(())
    }
}
