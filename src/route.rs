//! Start-to-end routes and their discovery.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

use crate::colony::Colony;
use crate::room::RoomId;
use crate::solver::Budget;

/// A simple path from the start room to the end room.
///
/// The first room is always the start, the last is always the end, and no room repeats.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Route {
    rooms: Vec<RoomId>,
}

impl Route {
    /// Every room along the route, start and end included.
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }

    /// Number of tunnels travelled, i.e. turns a single ant spends on this route.
    #[inline]
    pub fn hops(&self) -> usize {
        self.rooms.len() - 1
    }

    /// The rooms strictly between start and end. Disjoint routes share none of these.
    pub fn interior(&self) -> &[RoomId] {
        &self.rooms[1..self.rooms.len() - 1]
    }

    /// Renders the route as room names joined by `->`.
    pub fn display<'a>(&'a self, colony: &'a Colony) -> RouteDisplay<'a> {
        RouteDisplay { route: self, colony }
    }
}

/// Helper returned by [`Route::display`].
pub struct RouteDisplay<'a> {
    route: &'a Route,
    colony: &'a Colony,
}

impl Display for RouteDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.route.rooms.iter().map(|&id| self.colony.name_of(id)).join(" -> "))
    }
}

/// What a bounded route search produced and why it stopped.
pub(crate) struct Enumeration {
    pub(crate) routes: Vec<Route>,
    /// The search stopped on reaching the cap; more routes may exist.
    pub(crate) capped: bool,
    /// The node budget ran out before the search finished.
    pub(crate) exhausted: bool,
}

/// Lists up to `max_paths` routes from start to end, in depth-first discovery order.
///
/// Neighbors are tried in tunnel declaration order, so the result is reproducible. The list is the first
/// `max_paths` routes found, not the shortest ones, and the search ends as soon as it has them. An empty list means
/// the end cannot be reached.
pub fn discover_routes(colony: &Colony, max_paths: usize) -> Vec<Route> {
    enumerate(colony, max_paths, &Budget::unlimited()).routes
}

pub(crate) fn enumerate(colony: &Colony, max_paths: usize, budget: &Budget) -> Enumeration {
    let (start, end) = (colony.start(), colony.end());
    let adjacency = (0..colony.room_count())
        .map(|index| colony.neighbors(RoomId(index)).collect_vec())
        .collect_vec();

    let mut found = Enumeration {
        routes: Vec::new(),
        capped: false,
        exhausted: false,
    };
    if max_paths == 0 {
        return found;
    }

    let mut visited = vec![false; adjacency.len()];
    let mut path = vec![start];
    // (room, index of the next neighbor to try)
    let mut stack = vec![(start, 0_usize)];
    visited[start.0] = true;

    while let Some(frame) = stack.last_mut() {
        let (room, cursor) = *frame;
        let Some(&next) = adjacency[room.0].get(cursor) else {
            stack.pop();
            path.pop();
            visited[room.0] = false;
            continue;
        };
        frame.1 += 1;

        if visited[next.0] {
            continue;
        }

        if !budget.tick() {
            found.exhausted = true;
            break;
        }

        if next == end {
            let mut rooms = path.clone();
            rooms.push(end);
            found.routes.push(Route { rooms });
            if found.routes.len() == max_paths {
                found.capped = true;
                break;
            }
            continue;
        }

        visited[next.0] = true;
        path.push(next);
        stack.push((next, 0));
    }

    debug!(
        "discovered {} route(s) (capped: {}, budget exhausted: {})",
        found.routes.len(),
        found.capped,
        found.exhausted
    );
    found
}

#[cfg(test)]
mod tests {
    use crate::builder::ColonyBuilder;

    use super::*;

    fn names(colony: &Colony, routes: &[Route]) -> Vec<String> {
        routes.iter().map(|route| route.display(colony).to_string()).collect()
    }

    #[test]
    fn follows_tunnel_declaration_order() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_room("a", None)
            .add_room("b", None)
            .add_end("e", None)
            .add_tunnel("s", "b")
            .add_tunnel("s", "a")
            .add_tunnel("a", "e")
            .add_tunnel("b", "e")
            .add_tunnel("a", "b")
            .build()
            .unwrap();

        assert_eq!(names(&colony, &discover_routes(&colony, 10)), vec![
            "s -> b -> e",
            "s -> b -> a -> e",
            "s -> a -> e",
            "s -> a -> b -> e",
        ]);
    }

    #[test]
    fn stops_at_the_cap_and_says_so() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_room("a", None)
            .add_room("b", None)
            .add_end("e", None)
            .add_tunnel("s", "a")
            .add_tunnel("s", "b")
            .add_tunnel("a", "e")
            .add_tunnel("b", "e")
            .build()
            .unwrap();

        let capped = enumerate(&colony, 1, &Budget::unlimited());
        assert_eq!(names(&colony, &capped.routes), vec!["s -> a -> e"]);
        assert!(capped.capped);

        let exact = enumerate(&colony, 2, &Budget::unlimited());
        assert_eq!(exact.routes.len(), 2);
        assert!(exact.capped);

        let roomy = enumerate(&colony, 3, &Budget::unlimited());
        assert_eq!(roomy.routes.len(), 2);
        assert!(!roomy.capped);
    }

    #[test]
    fn leaves_rooms_past_the_cap_unvisited() {
        // a dead-end clique declared after the routes would take factorial time to walk
        let mut builder = ColonyBuilder::with_ants(1);
        builder.add_start("s", None).add_end("e", None);
        for i in 0..4 {
            let room = format!("r{i}");
            builder.add_room(&room, None).add_tunnel("s", &room).add_tunnel(&room, "e");
        }
        for i in 0..12 {
            builder.add_room(&format!("c{i}"), None);
        }
        builder.add_tunnel("s", "c0");
        for i in 0..12 {
            for j in i + 1..12 {
                builder.add_tunnel(&format!("c{i}"), &format!("c{j}"));
            }
        }
        let colony = builder.build().unwrap();

        // two steps per route, nothing more
        let found = enumerate(&colony, 4, &Budget::limited(8));
        assert_eq!(found.routes.len(), 4);
        assert!(found.capped);
        assert!(!found.exhausted);
    }

    #[test]
    fn disconnected_end_yields_nothing() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_room("a", None)
            .add_end("e", None)
            .add_tunnel("s", "a")
            .build()
            .unwrap();

        assert!(discover_routes(&colony, 10).is_empty());
    }

    #[test]
    fn never_passes_through_the_end_or_back_through_start() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_room("a", None)
            .add_end("e", None)
            .add_tunnel("s", "e")
            .add_tunnel("e", "a")
            .add_tunnel("a", "s")
            .build()
            .unwrap();

        assert_eq!(names(&colony, &discover_routes(&colony, 10)), vec!["s -> e", "s -> a -> e"]);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_room("a", None)
            .add_room("b", None)
            .add_end("e", None)
            .add_tunnel("s", "a")
            .add_tunnel("a", "b")
            .add_tunnel("b", "e")
            .build()
            .unwrap();

        let starved = enumerate(&colony, 10, &Budget::limited(2));
        assert!(starved.exhausted);
        assert!(starved.routes.is_empty());
    }
}
