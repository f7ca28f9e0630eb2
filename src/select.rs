//! Choosing the best set of mutually disjoint routes.
//!
//! Routes are considered in the order given (shortest first), each one either taken or skipped. A route may only be
//! taken if none of its interior rooms is already used by a taken route. Every complete set of decisions is scored by
//! [`min_turns`], and candidates compare as follows:
//!
//! 1. fewer turns wins;
//! 2. otherwise the index lists are compared position by position, and the first smaller index wins;
//! 3. otherwise the shorter index list wins.
//!
//! This is a strict total order, so the winner does not depend on the order the search visits candidates in.
//! That makes it safe to seed the search with the shortest route alone, to prune subtrees that cannot beat the best
//! known candidate, and to explore the first few decisions in parallel.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use itertools::Itertools;
use log::debug;

use crate::capacity::min_turns;
use crate::room::RoomId;
use crate::solver::Budget;

/// A scored set of routes, identified by their indices in the sorted route list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) turns: usize,
    pub(crate) picks: Vec<usize>,
}

impl Candidate {
    /// Whether `self` should replace `other` as the best selection.
    pub(crate) fn beats(&self, other: &Candidate) -> bool {
        match self.turns.cmp(&other.turns) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match self.picks.iter().zip(&other.picks).find(|(a, b)| a != b) {
                Some((a, b)) => a < b,
                None => self.picks.len() < other.picks.len(),
            },
        }
    }
}

fn better(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

pub(crate) struct Selection {
    pub(crate) best: Option<Candidate>,
    pub(crate) explored: usize,
    pub(crate) exhausted: bool,
}

struct Search<'a> {
    interiors: Vec<&'a [RoomId]>,
    hops: &'a [usize],
    ants: usize,
    budget: &'a Budget,
    split_depth: usize,
    // read-mostly bound shared between parallel branches
    best_turns: AtomicUsize,
    explored: AtomicUsize,
}

/// Per-branch search state. Parallel branches each own a copy.
#[derive(Clone)]
struct Branch {
    used: Vec<bool>,
    picks: Vec<usize>,
    best: Option<Candidate>,
}

/// Picks the best disjoint subset of `interiors` (one entry per route, sorted by hop count).
///
/// The first `split_depth` decisions are forked onto the rayon pool; pass 0 for a purely sequential search.
pub(crate) fn select(
    interiors: Vec<&[RoomId]>,
    hops: &[usize],
    ants: usize,
    room_count: usize,
    budget: &Budget,
    split_depth: usize,
) -> Selection {
    // the shortest route alone is always a legal selection
    let seed = hops.first().and_then(|&first| min_turns(ants, &[first])).map(|turns| Candidate {
        turns,
        picks: vec![0],
    });

    let search = Search {
        interiors,
        hops,
        ants,
        budget,
        split_depth,
        best_turns: AtomicUsize::new(seed.as_ref().map_or(usize::MAX, |seed| seed.turns)),
        explored: AtomicUsize::new(0),
    };

    let mut branch = Branch {
        used: vec![false; room_count],
        picks: Vec::with_capacity(hops.len()),
        best: seed,
    };
    search.explore(0, &mut branch);

    let explored = search.explored.into_inner();
    debug!(
        "explored {} selection node(s) over {} route(s), best: {:?}",
        explored,
        hops.len(),
        branch.best
    );

    Selection {
        best: branch.best,
        explored,
        exhausted: budget.is_exhausted(),
    }
}

impl Search<'_> {
    fn explore(&self, index: usize, branch: &mut Branch) {
        if !self.budget.tick() {
            return;
        }
        self.explored.fetch_add(1, AtomicOrdering::Relaxed);

        if index == self.hops.len() {
            self.score(branch);
            return;
        }

        if self.is_hopeless(index, branch) {
            return;
        }

        let fits = self.interiors[index].iter().all(|room| !branch.used[room.0]);

        if index < self.split_depth {
            let mut take = branch.clone();
            let mut skip = branch.clone();
            rayon::join(
                || {
                    if fits {
                        self.include(index, &mut take);
                    }
                },
                || self.explore(index + 1, &mut skip),
            );
            branch.best = better(take.best, skip.best);
            return;
        }

        // take before skip; large disjoint sets turn up first
        if fits {
            self.include(index, branch);
        }
        self.explore(index + 1, branch);
    }

    fn include(&self, index: usize, branch: &mut Branch) {
        let interior = self.interiors[index];
        interior.iter().for_each(|room| branch.used[room.0] = true);
        branch.picks.push(index);

        self.explore(index + 1, branch);

        branch.picks.pop();
        interior.iter().for_each(|room| branch.used[room.0] = false);
    }

    fn score(&self, branch: &mut Branch) {
        if branch.picks.is_empty() {
            return;
        }

        let Some(turns) = min_turns(self.ants, &self.picked_hops(&branch.picks)) else {
            return;
        };
        self.best_turns.fetch_min(turns, AtomicOrdering::Relaxed);

        let candidate = Candidate {
            turns,
            picks: branch.picks.clone(),
        };
        branch.best = better(branch.best.take(), Some(candidate));
    }

    fn picked_hops(&self, picks: &[usize]) -> Vec<usize> {
        picks.iter().map(|&i| self.hops[i]).collect_vec()
    }

    /// Whether no completion of the current branch can beat the best known candidate.
    ///
    /// Completions add routes from `index` onwards, which never raises the turn count. Taking every remaining route
    /// that fits the rooms used so far (ignoring conflicts among themselves) gives a lower bound on the turns any
    /// completion needs.
    fn is_hopeless(&self, index: usize, branch: &Branch) -> bool {
        let mut optimistic = self.picked_hops(&branch.picks);
        optimistic.extend(
            (index..self.hops.len())
                .filter(|&i| self.interiors[i].iter().all(|room| !branch.used[room.0]))
                .map(|i| self.hops[i]),
        );
        let Some(bound) = min_turns(self.ants, &optimistic) else {
            return true;
        };

        if bound > self.best_turns.load(AtomicOrdering::Relaxed) {
            return true;
        }

        let Some(best) = &branch.best else {
            return false;
        };
        if bound > best.turns {
            return true;
        }
        if bound < best.turns {
            return false;
        }

        // equal turns at best: only the index order can still decide
        let picks = &branch.picks;
        match picks.iter().zip(&best.picks).find(|(a, b)| a != b) {
            Some((a, b)) => a > b,
            // the best is a prefix of (or equal to) every completion
            None if picks.len() >= best.picks.len() => true,
            // every completion is either the current picks alone, or continues with an index >= `index`
            None => {
                let next_of_best = best.picks[picks.len()];
                let alone_loses = picks.is_empty()
                    || min_turns(self.ants, &self.picked_hops(picks)).map_or(true, |turns| turns > best.turns);
                index > next_of_best && alone_loses
            }
        }
    }
}
