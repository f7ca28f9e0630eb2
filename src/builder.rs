use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::num::NonZero;

use petgraph::graphmap::UnGraphMap;
use unordered_pair::UnorderedPair;

use crate::colony::Colony;
use crate::location::Location;
use crate::room::{Room, RoomId, RoomKind};

/// Most ants a colony may hold. Every ant gets its own moves in the schedule.
pub const MAX_ANTS: usize = 1_000_000;

/// Reasons a [`ColonyBuilder`] may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// The colony was given zero ants.
    NoAnts,
    /// The colony was given more than [`MAX_ANTS`] ants.
    TooManyAnts(usize),
    /// Two rooms were declared with the same name.
    DuplicateRoom(String),
    /// A room name is empty, contains `-` or whitespace, or begins with `#` or `L`.
    /// Such names cannot be written back out unambiguously.
    BadRoomName(String),
    /// More than one room was marked as the start.
    DuplicateStart,
    /// More than one room was marked as the end.
    DuplicateEnd,
    /// The same room was marked both start and end.
    StartIsEnd,
    /// No room was marked as the start.
    MissingStart,
    /// No room was marked as the end.
    MissingEnd,
    /// A tunnel refers to a room that was never declared.
    UnknownRoom(String),
    /// A tunnel leads from a room back into itself.
    SelfTunnel(String),
}

impl Display for BuilderInvalidReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAnts => write!(f, "the colony has no ants"),
            Self::TooManyAnts(ants) => write!(f, "{ants} ants is more than the {MAX_ANTS} a colony may hold"),
            Self::DuplicateRoom(name) => write!(f, "room `{name}` is declared twice"),
            Self::BadRoomName(name) => write!(f, "`{name}` is not a usable room name"),
            Self::DuplicateStart => write!(f, "more than one start room"),
            Self::DuplicateEnd => write!(f, "more than one end room"),
            Self::StartIsEnd => write!(f, "the start room is also the end room"),
            Self::MissingStart => write!(f, "no start room"),
            Self::MissingEnd => write!(f, "no end room"),
            Self::UnknownRoom(name) => write!(f, "tunnel to unknown room `{name}`"),
            Self::SelfTunnel(name) => write!(f, "tunnel from `{name}` to itself"),
        }
    }
}

/// Assembles a [`Colony`] room by room and tunnel by tunnel.
///
/// The builder mutates itself while building and can be [`Clone`]d to save its state at some point.
/// Once an invalid state is reached every further mutation is ignored, and [`ColonyBuilder::build`] reports
/// every reason collected so far.
///
/// Tunnels may name rooms declared later; names are resolved when building.
#[derive(Clone, Debug, Default)]
pub struct ColonyBuilder {
    ants: usize,
    rooms: Vec<Room>,
    names: HashMap<String, RoomId>,
    start: Option<RoomId>,
    end: Option<RoomId>,
    // by name, resolved in build()
    tunnels: Vec<(String, String)>,
    seen_tunnels: HashSet<UnorderedPair<String>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl ColonyBuilder {
    /// Construct a new builder for a colony of `ants` ants.
    pub fn with_ants(ants: usize) -> Self {
        let mut builder = Self::default();
        builder.ants(ants);
        builder
    }

    /// Set the number of ants waiting in the start room.
    ///
    /// Zero ants puts the builder in a [`NoAnts`](BuilderInvalidReason::NoAnts) invalid state, more than
    /// [`MAX_ANTS`] in a [`TooManyAnts`](BuilderInvalidReason::TooManyAnts) one.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn ants(&mut self, ants: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if ants == 0 {
            self.invalid_reasons.push(BuilderInvalidReason::NoAnts);
            return self;
        }

        if ants > MAX_ANTS {
            self.invalid_reasons.push(BuilderInvalidReason::TooManyAnts(ants));
            return self;
        }

        self.ants = ants;
        self
    }

    /// Add an ordinary room.
    ///
    /// May cause the builder to enter a [`DuplicateRoom`](BuilderInvalidReason::DuplicateRoom) or
    /// [`BadRoomName`](BuilderInvalidReason::BadRoomName) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_room(&mut self, name: &str, location: Option<Location>) -> &mut Self {
        self.insert_room(name, location, RoomKind::Chamber)
    }

    /// Add the room every ant starts from.
    ///
    /// Besides the conditions of [`Self::add_room`], may cause a
    /// [`DuplicateStart`](BuilderInvalidReason::DuplicateStart) invalid state.
    pub fn add_start(&mut self, name: &str, location: Option<Location>) -> &mut Self {
        self.insert_room(name, location, RoomKind::Start)
    }

    /// Add the room every ant must reach.
    ///
    /// Besides the conditions of [`Self::add_room`], may cause a
    /// [`DuplicateEnd`](BuilderInvalidReason::DuplicateEnd) invalid state.
    pub fn add_end(&mut self, name: &str, location: Option<Location>) -> &mut Self {
        self.insert_room(name, location, RoomKind::End)
    }

    /// Mark an already declared room as the start or the end.
    ///
    /// Marking the current end as start (or vice versa) causes a [`StartIsEnd`](BuilderInvalidReason::StartIsEnd)
    /// invalid state; naming an undeclared room causes [`UnknownRoom`](BuilderInvalidReason::UnknownRoom).
    pub fn mark(&mut self, name: &str, kind: RoomKind) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let Some(&id) = self.names.get(name) else {
            self.invalid_reasons.push(BuilderInvalidReason::UnknownRoom(name.to_owned()));
            return self;
        };

        if self.rooms[id.0].kind.is_terminal() && self.rooms[id.0].kind != kind {
            self.invalid_reasons.push(BuilderInvalidReason::StartIsEnd);
            return self;
        }

        self.claim(id, kind)
    }

    /// Dig a tunnel between the rooms named `a` and `b`. Order does not matter.
    ///
    /// Digging the same tunnel twice, in either direction, has no further effect.
    /// A tunnel from a room to itself causes a [`SelfTunnel`](BuilderInvalidReason::SelfTunnel) invalid state.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_tunnel(&mut self, a: &str, b: &str) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if a == b {
            self.invalid_reasons.push(BuilderInvalidReason::SelfTunnel(a.to_owned()));
            return self;
        }

        if self.seen_tunnels.insert(UnorderedPair::from((a.to_owned(), b.to_owned()))) {
            self.tunnels.push((a.to_owned(), b.to_owned()));
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Conditions only detectable when building, such as a missing start, are not reported here.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Colony`].
    ///
    /// If the builder is invalid for any reason, a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Colony, Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(self.invalid_reasons.clone());
        }

        let mut reasons = Vec::new();
        let ants = NonZero::new(self.ants);
        if ants.is_none() {
            reasons.push(BuilderInvalidReason::NoAnts);
        }
        if self.start.is_none() {
            reasons.push(BuilderInvalidReason::MissingStart);
        }
        if self.end.is_none() {
            reasons.push(BuilderInvalidReason::MissingEnd);
        }

        let mut graph = UnGraphMap::with_capacity(self.rooms.len(), self.tunnels.len());
        for index in 0..self.rooms.len() {
            graph.add_node(RoomId(index));
        }

        for (a, b) in &self.tunnels {
            let ends = [a, b].map(|name| {
                let id = self.names.get(name.as_str()).copied();
                if id.is_none() {
                    reasons.push(BuilderInvalidReason::UnknownRoom(name.clone()));
                }
                id
            });
            if let [Some(a), Some(b)] = ends {
                graph.add_edge(a, b, ());
            }
        }

        match (ants, self.start, self.end) {
            (Some(ants), Some(start), Some(end)) if reasons.is_empty() => Ok(Colony {
                graph,
                rooms: self.rooms.clone(),
                names: self.names.clone(),
                start,
                end,
                ants,
            }),
            _ => Err(reasons),
        }
    }

    fn insert_room(&mut self, name: &str, location: Option<Location>, kind: RoomKind) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !is_usable_name(name) {
            self.invalid_reasons.push(BuilderInvalidReason::BadRoomName(name.to_owned()));
            return self;
        }

        if self.names.contains_key(name) {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicateRoom(name.to_owned()));
            return self;
        }

        let id = RoomId(self.rooms.len());
        self.rooms.push(Room {
            name: name.to_owned(),
            kind: RoomKind::Chamber,
            location,
        });
        self.names.insert(name.to_owned(), id);

        match kind {
            RoomKind::Chamber => self,
            terminal => self.claim(id, terminal),
        }
    }

    fn claim(&mut self, id: RoomId, kind: RoomKind) -> &mut Self {
        let slot = match kind {
            RoomKind::Start => &mut self.start,
            RoomKind::End => &mut self.end,
            RoomKind::Chamber => return self,
        };

        match *slot {
            Some(existing) if existing == id => {}
            Some(_) => self.invalid_reasons.push(match kind {
                RoomKind::Start => BuilderInvalidReason::DuplicateStart,
                _ => BuilderInvalidReason::DuplicateEnd,
            }),
            None => {
                *slot = Some(id);
                self.rooms[id.0].kind = kind;
            }
        }

        self
    }
}

fn is_usable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('#')
        && !name.starts_with('L')
        && !name.contains(|c: char| c == '-' || c.is_whitespace())
}
