#[cfg(test)]
mod tests {
    use crate::builder::{BuilderInvalidReason, ColonyBuilder, MAX_ANTS};
    use crate::colony::Colony;
    use crate::parse::parse_colony;
    use crate::room::RoomKind;
    use crate::schedule::{read_moves, ReplayError};
    use crate::solver::{Outcome, SolverConfig, SolverFailure, Truncation};

    // the short route s-p-q-e crosses both of the longer, mutually disjoint ones
    const TRAP: &str = "ANTS
##start
s 0 0
p 1 0
q 2 0
##end
e 3 0
m 1 1
n 2 1
u 1 -1
v 2 -1
s-p
p-q
q-e
p-m
m-n
n-e
s-u
u-v
v-q
";

    fn trap(ants: usize) -> Colony {
        parse_colony(&TRAP.replace("ANTS", &ants.to_string())).unwrap()
    }

    fn route_names(colony: &Colony, outcome: &Outcome) -> Vec<String> {
        outcome.plan().routes().iter().map(|route| route.display(colony).to_string()).collect()
    }

    #[test]
    fn direct_tunnel_sends_one_ant_per_turn() {
        let colony = ColonyBuilder::with_ants(3)
            .add_start("s", None)
            .add_end("e", None)
            .add_tunnel("s", "e")
            .build()
            .unwrap();

        let outcome = colony.solve().unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(route_names(&colony, &outcome), vec!["s -> e"]);
        assert_eq!(outcome.plan().turns(), 3);
        assert_eq!(outcome.plan().schedule().display(&colony).to_string(), "L1-e
L2-e
L3-e
");
    }

    #[test]
    fn two_and_three_hops_carry_five_ants_in_four_turns() {
        let colony = ColonyBuilder::with_ants(5)
            .add_start("s", None)
            .add_room("a", None)
            .add_room("b", None)
            .add_room("c", None)
            .add_end("e", None)
            .add_tunnel("s", "a")
            .add_tunnel("a", "e")
            .add_tunnel("s", "b")
            .add_tunnel("b", "c")
            .add_tunnel("c", "e")
            .build()
            .unwrap();

        let outcome = colony.solve().unwrap();
        assert_eq!(route_names(&colony, &outcome), vec!["s -> a -> e", "s -> b -> c -> e"]);
        assert_eq!(outcome.plan().indices(), &[0, 1]);
        assert_eq!(outcome.plan().turns(), 4);
        assert_eq!(outcome.plan().schedule().display(&colony).to_string(), "L1-a L3-b
L1-e L2-a L3-c L5-b
L2-e L3-e L4-a L5-c
L4-e L5-e
");
    }

    #[test]
    fn few_ants_take_the_short_route() {
        for ants in 1..=3 {
            let colony = trap(ants);
            let outcome = colony.solve().unwrap();
            assert_eq!(route_names(&colony, &outcome), vec!["s -> p -> q -> e"], "{ants} ant(s)");
            assert_eq!(outcome.plan().turns(), ants + 2);
        }
    }

    #[test]
    fn many_ants_take_the_two_disjoint_routes() {
        let colony = trap(10);
        let outcome = colony.solve().unwrap();
        assert_eq!(
            route_names(&colony, &outcome),
            vec!["s -> p -> m -> n -> e", "s -> u -> v -> q -> e"]
        );
        assert_eq!(outcome.plan().indices(), &[1, 2]);
        assert_eq!(outcome.plan().turns(), 8);
        assert_eq!(outcome.plan().discovered(), 4);
    }

    #[test]
    fn schedules_replay_cleanly() {
        for ants in [1, 2, 4, 10, 25] {
            let colony = trap(ants);
            let outcome = colony.solve().unwrap();
            let replay = outcome.plan().schedule().verify(&colony).unwrap();
            assert_eq!(replay.turns, outcome.plan().turns());
            assert_eq!(replay.ants, ants);

            // the written form reads back to the same moves
            let written = outcome.plan().schedule().display(&colony).to_string();
            assert_eq!(read_moves(&written), outcome.plan().schedule().records(&colony));
        }
    }

    #[test]
    fn solving_twice_gives_the_same_plan() {
        let colony = trap(7);
        assert_eq!(colony.solve().unwrap(), colony.solve().unwrap());
    }

    #[test]
    fn sequential_and_parallel_searches_agree() {
        for ants in 1..=12 {
            let colony = trap(ants);
            let sequential = colony.solve_with(SolverConfig::default().with_parallel(false)).unwrap();
            let parallel = colony.solve_with(SolverConfig::default().with_split_depth(8)).unwrap();
            assert_eq!(sequential, parallel);
        }
    }

    #[test]
    fn unreachable_end_is_unsolvable() {
        let colony = ColonyBuilder::with_ants(2)
            .add_start("s", None)
            .add_room("a", None)
            .add_room("b", None)
            .add_end("e", None)
            .add_tunnel("s", "a")
            .add_tunnel("b", "e")
            .build()
            .unwrap();

        assert_eq!(colony.solve(), Err(SolverFailure::Unsolvable));
    }

    #[test]
    fn route_cap_makes_the_result_best_effort() {
        let colony = trap(10);
        let outcome = colony.solve_with(SolverConfig::default().with_max_paths(2)).unwrap();

        assert!(!outcome.is_optimal());
        assert_eq!(outcome.truncation(), &[Truncation::RouteCapReached { max_paths: 2 }]);
        // only s-p-q-e and s-p-m-n-e were seen, and they overlap
        assert_eq!(outcome.plan().turns(), 12);
        assert!(outcome.plan().schedule().verify(&colony).is_ok());
    }

    /// `routes` two-hop routes `s-rI-e`, then a dead-end clique of `clique` rooms hanging off the start.
    fn fan_with_dead_end(routes: usize, clique: usize, ants: usize) -> Colony {
        let mut builder = ColonyBuilder::with_ants(ants);
        builder.add_start("s", None).add_end("e", None);
        for i in 0..routes {
            let room = format!("r{i}");
            builder.add_room(&room, None).add_tunnel("s", &room).add_tunnel(&room, "e");
        }
        for i in 0..clique {
            builder.add_room(&format!("c{i}"), None);
        }
        builder.add_tunnel("s", "c0");
        for i in 0..clique {
            for j in i + 1..clique {
                builder.add_tunnel(&format!("c{i}"), &format!("c{j}"));
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn route_discovery_stops_at_the_cap() {
        let colony = fan_with_dead_end(32, 10, 64);
        let outcome = colony.solve_with(SolverConfig::default().with_node_budget(Some(200_000))).unwrap();

        assert_eq!(outcome.truncation(), &[Truncation::RouteCapReached { max_paths: 32 }]);
        assert_eq!(outcome.plan().routes().len(), 32);
        assert_eq!(outcome.plan().turns(), 3);
        assert!(outcome.plan().schedule().verify(&colony).is_ok());
    }

    #[test]
    fn zero_route_cap_is_rejected() {
        assert_eq!(
            trap(1).solve_with(SolverConfig::default().with_max_paths(0)),
            Err(SolverFailure::InvalidConfig)
        );
    }

    #[test]
    fn tiny_budget_cannot_prove_anything() {
        let outcome = trap(3).solve_with(SolverConfig::default().with_node_budget(Some(1)));
        assert_eq!(outcome, Err(SolverFailure::BudgetExhausted { budget: 1 }));
    }

    #[test]
    fn spent_budget_still_yields_a_valid_plan() {
        let colony = trap(10);
        let config = SolverConfig::default().with_parallel(false);

        let outcome = (0..500)
            .filter_map(|budget| colony.solve_with(config.with_node_budget(Some(budget))).ok())
            .find(|outcome| !outcome.is_optimal())
            .expect("some budget runs out after the first route");

        assert!(matches!(outcome.truncation(), [Truncation::NodeBudgetExhausted { .. }]));
        assert!(outcome.plan().schedule().verify(&colony).is_ok());
    }

    #[test]
    fn replay_catches_collisions() {
        let colony = trap(2);
        let turns = read_moves("L1-p L2-u\nL1-q L2-v\nL1-e L2-q\nL2-e\n");
        assert!(colony.replay(&turns).is_ok());

        let turns = read_moves("L1-p\nL1-q L2-p\nL1-e L2-q\nL2-e\n");
        assert!(colony.replay(&turns).is_ok());

        let turns = read_moves("L1-p L2-u\nL1-q L2-v\nL2-q\n");
        assert_eq!(colony.replay(&turns), Err(ReplayError::Collision { turn: 3, room: "q".into() }));
    }

    #[test]
    fn replay_catches_illegal_moves() {
        let colony = trap(2);
        let cases = [
            ("L1-q\n", ReplayError::NoTunnel { turn: 1, ant: 1, from: "s".into(), to: "q".into() }),
            ("L3-p\n", ReplayError::UnknownAnt { turn: 1, ant: 3 }),
            ("L0-p\n", ReplayError::UnknownAnt { turn: 1, ant: 0 }),
            ("L1-x\n", ReplayError::UnknownRoom { turn: 1, room: "x".into() }),
            ("L1-p L1-q\n", ReplayError::MovedTwice { turn: 1, ant: 1 }),
            ("L1-p\nL1-q\nL1-e\nL1-q\n", ReplayError::MovedAfterArrival { turn: 4, ant: 1 }),
            ("L1-p\nL1-q\nL1-e\n", ReplayError::Stranded { ant: 2, room: "s".into() }),
        ];

        for (text, expected) in cases {
            assert_eq!(colony.replay(&read_moves(text)), Err(expected), "{text}");
        }
    }

    #[test]
    fn builder_ignores_repeated_tunnels() {
        let colony = ColonyBuilder::with_ants(1)
            .add_start("s", None)
            .add_end("e", None)
            .add_tunnel("s", "e")
            .add_tunnel("e", "s")
            .add_tunnel("s", "e")
            .build()
            .unwrap();

        assert_eq!(colony.tunnel_count(), 1);
        assert_eq!(colony.neighbors(colony.start()).collect::<Vec<_>>(), vec![colony.end()]);
    }

    #[test]
    fn builder_marks_existing_rooms() {
        let colony = ColonyBuilder::with_ants(1)
            .add_room("a", None)
            .add_room("b", None)
            .add_tunnel("a", "b")
            .mark("a", RoomKind::Start)
            .mark("b", RoomKind::End)
            .build()
            .unwrap();

        assert_eq!(colony.room(colony.start()).unwrap().kind(), RoomKind::Start);
        assert_eq!(colony.room(colony.end()).unwrap().name(), "b");
    }

    #[test]
    fn builder_collects_invalid_reasons() {
        let mut builder = ColonyBuilder::with_ants(1);
        builder.add_start("s", None).mark("s", RoomKind::End);
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::StartIsEnd]));

        // further changes are ignored once invalid
        builder.add_end("e", None);
        assert_eq!(builder.build().unwrap_err(), vec![BuilderInvalidReason::StartIsEnd]);

        let reasons = ColonyBuilder::default().add_room("a", None).build().unwrap_err();
        assert_eq!(reasons, vec![
            BuilderInvalidReason::NoAnts,
            BuilderInvalidReason::MissingStart,
            BuilderInvalidReason::MissingEnd,
        ]);

        let reasons = ColonyBuilder::with_ants(1).add_start("s", None).add_start("t", None).build().unwrap_err();
        assert_eq!(reasons, vec![BuilderInvalidReason::DuplicateStart]);

        let reasons = ColonyBuilder::with_ants(1).add_room("a", None).add_tunnel("a", "a").build().unwrap_err();
        assert_eq!(reasons, vec![BuilderInvalidReason::SelfTunnel("a".into())]);

        let reasons = ColonyBuilder::with_ants(usize::MAX).build().unwrap_err();
        assert_eq!(reasons, vec![BuilderInvalidReason::TooManyAnts(usize::MAX)]);
        assert!(ColonyBuilder::with_ants(MAX_ANTS).add_start("s", None).add_end("e", None).build().is_ok());
    }
}
