//! Reading colonies from their text description.
//!
//! ```text
//! 3
//! ##start
//! hill 0 0
//! room 4 2
//! ##end
//! sugar 8 0
//! hill-room
//! room-sugar
//! ```
//!
//! The first line that is neither blank nor a comment gives the number of ants. Rooms are `<name> <x> <y>`, tunnels
//! are `<a>-<b>`. Lines starting with `#` are comments, except `##start` and `##end`, which mark the room declared on
//! the next line.

use std::str::FromStr;

use thiserror::Error;

use crate::builder::{BuilderInvalidReason, ColonyBuilder};
use crate::colony::Colony;
use crate::location::Location;
use crate::room::RoomKind;

/// Reasons a colony description may be rejected. Line numbers count from 1.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Nothing but blank lines and comments.
    #[error("the description is empty")]
    Empty,
    /// The first line is not a non-negative number.
    #[error("line {line}: expected the number of ants, found `{text}`")]
    BadAntCount {
        /// Line number, counting from 1.
        line: usize,
        /// The line as read.
        text: String,
    },
    /// `##start` or `##end` not directly followed by a room.
    #[error("line {line}: `##{command}` must be followed by a room")]
    DanglingCommand {
        /// Line of the command, counting from 1.
        line: usize,
        /// The kind of room the command announced.
        command: RoomKind,
    },
    /// A line that is not a comment, a command, a room or a tunnel.
    #[error("line {line}: `{text}` is neither a room nor a tunnel")]
    UnrecognizedLine {
        /// Line number, counting from 1.
        line: usize,
        /// The line as read.
        text: String,
    },
    /// The lines were well formed but describe an invalid colony.
    #[error("invalid colony: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<BuilderInvalidReason>),
}

enum Line<'a> {
    Command(RoomKind),
    Room { name: &'a str, location: Location },
    Tunnel(&'a str, &'a str),
}

fn classify(text: &str) -> Option<Line<'_>> {
    if let Some(command) = text.strip_prefix("##") {
        return match command.parse::<RoomKind>() {
            Ok(kind) if kind.is_terminal() => Some(Line::Command(kind)),
            _ => None,
        };
    }

    let fields = text.split_whitespace().collect::<Vec<_>>();
    if let [name, x, y] = fields[..] {
        if let (Ok(x), Ok(y)) = (x.parse(), y.parse()) {
            return Some(Line::Room {
                name,
                location: Location(x, y),
            });
        }
    }

    match text.split_once('-') {
        Some((a, b)) if !b.contains('-') && !text.contains(char::is_whitespace) => Some(Line::Tunnel(a, b)),
        _ => None,
    }
}

/// Parses a colony description.
pub fn parse_colony(text: &str) -> Result<Colony, ParseError> {
    let lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let mut builder = ColonyBuilder::default();
    let mut pending: Option<(usize, RoomKind)> = None;
    let mut ants_seen = false;

    for (number, line) in lines {
        let line = line.trim();

        if !ants_seen {
            if line.starts_with('#') {
                continue;
            }
            let ants = line.parse::<usize>().map_err(|_| ParseError::BadAntCount {
                line: number,
                text: line.to_owned(),
            })?;
            builder.ants(ants);
            ants_seen = true;
            continue;
        }

        let classified = classify(line);
        if line.starts_with('#') && !matches!(classified, Some(Line::Command(_))) {
            // plain comment, or a command this format does not know
            continue;
        }

        match classified {
            Some(Line::Command(kind)) => {
                if let Some((line, command)) = pending {
                    return Err(ParseError::DanglingCommand { line, command });
                }
                pending = Some((number, kind));
            }
            Some(Line::Room { name, location }) => {
                match pending.take() {
                    Some((_, RoomKind::Start)) => builder.add_start(name, Some(location)),
                    Some((_, RoomKind::End)) => builder.add_end(name, Some(location)),
                    _ => builder.add_room(name, Some(location)),
                };
            }
            Some(Line::Tunnel(a, b)) => {
                if let Some((line, command)) = pending {
                    return Err(ParseError::DanglingCommand { line, command });
                }
                builder.add_tunnel(a, b);
            }
            None => {
                return Err(ParseError::UnrecognizedLine {
                    line: number,
                    text: line.to_owned(),
                })
            }
        }
    }

    if !ants_seen {
        return Err(ParseError::Empty);
    }
    if let Some((line, command)) = pending {
        return Err(ParseError::DanglingCommand { line, command });
    }

    builder.build().map_err(ParseError::Invalid)
}

impl FromStr for Colony {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_colony(s)
    }
}
