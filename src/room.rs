use std::fmt::{Display, Formatter};

use strum::{Display as StrumDisplay, EnumString};

use crate::location::Location;

/// Index of a room inside its [`Colony`](crate::Colony).
///
/// Ids are handed out densely in declaration order, so they double as indices into per-room tables.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RoomId(pub(crate) usize);

impl RoomId {
    /// The arena index behind this id.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for RoomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The role a room plays in the colony.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum RoomKind {
    /// Where every ant starts. Spelled `##start` in colony descriptions.
    Start,
    /// Where every ant must arrive. Spelled `##end` in colony descriptions.
    End,
    /// Any other room; holds at most one ant per turn.
    #[default]
    Chamber,
}

impl RoomKind {
    /// Start and end rooms may hold any number of ants at once.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoomKind::Chamber)
    }
}

/// A room as declared, frozen once the colony is built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Room {
    pub(crate) name: String,
    pub(crate) kind: RoomKind,
    pub(crate) location: Option<Location>,
}

impl Room {
    /// The unique name of the room.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the start, the end, or an ordinary chamber.
    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    /// Layout position, if one was declared.
    pub fn location(&self) -> Option<Location> {
        self.location
    }
}
