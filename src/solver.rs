use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use itertools::Itertools;
use log::{info, warn};
use thiserror::Error;

use crate::colony::Colony;
use crate::route::{self, Route};
use crate::schedule::Schedule;
use crate::select;

/// Tuning knobs for a [`Solver`].
///
/// Route selection is exponential in `max_paths`; keep it in the tens.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// How many start-to-end routes to discover before selecting among them.
    pub max_paths: usize,
    /// Upper bound on search steps (route discovery and selection together). `None` for no bound.
    pub node_budget: Option<u64>,
    /// Whether to spread route selection over the rayon thread pool.
    pub parallel: bool,
    /// How many leading take/skip decisions are forked when `parallel` is set.
    pub split_depth: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_paths: 32,
            node_budget: None,
            parallel: true,
            split_depth: 4,
        }
    }
}

impl SolverConfig {
    /// Sets [`Self::max_paths`].
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    /// Sets [`Self::node_budget`].
    pub fn with_node_budget(mut self, node_budget: Option<u64>) -> Self {
        self.node_budget = node_budget;
        self
    }

    /// Sets [`Self::parallel`].
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets [`Self::split_depth`].
    pub fn with_split_depth(mut self, split_depth: usize) -> Self {
        self.split_depth = split_depth;
        self
    }
}

/// Reasons a [`Solver`] may fail.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SolverFailure {
    /// The end room cannot be reached from the start room, so no ant can ever arrive.
    #[error("no route leads from the start room to the end room")]
    Unsolvable,
    /// The node budget ran out before a single route was found. Unlike [`Self::Unsolvable`] this says nothing about
    /// whether a route exists.
    #[error("node budget of {budget} ran out before any route was found")]
    BudgetExhausted {
        /// The configured node budget.
        budget: u64,
    },
    /// `max_paths` was zero.
    #[error("max_paths must be at least 1")]
    InvalidConfig,
}

/// Why a plan may not be the best one possible.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Truncation {
    /// Route discovery stopped at the cap; more routes may exist.
    RouteCapReached {
        /// The configured route cap.
        max_paths: usize,
    },
    /// The search stopped early once its step budget was spent.
    NodeBudgetExhausted {
        /// The configured node budget.
        budget: u64,
    },
}

/// The chosen routes and the moves that walk every ant along them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    routes: Vec<Route>,
    indices: Vec<usize>,
    turns: usize,
    schedule: Schedule,
    discovered: usize,
}

impl Plan {
    /// The chosen routes, shortest first. No two share an interior room.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Positions of [`Self::routes`] among all discovered routes once sorted by length.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Turns needed for every ant to arrive.
    #[inline]
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Every ant's moves, turn by turn.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// How many routes were discovered and considered.
    pub fn discovered(&self) -> usize {
        self.discovered
    }
}

/// Result of a successful solve.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The plan needs as few turns as any plan over the routes the colony allows.
    Optimal(Plan),
    /// The search was cut short; the plan is valid but a better one may exist.
    BestEffort {
        /// The best plan found before the search stopped.
        plan: Plan,
        /// Every reason the search stopped early.
        truncation: Vec<Truncation>,
    },
}

impl Outcome {
    /// The plan, optimal or not.
    pub fn plan(&self) -> &Plan {
        match self {
            Outcome::Optimal(plan) | Outcome::BestEffort { plan, .. } => plan,
        }
    }

    /// Consumes the outcome, keeping only the plan.
    pub fn into_plan(self) -> Plan {
        match self {
            Outcome::Optimal(plan) | Outcome::BestEffort { plan, .. } => plan,
        }
    }

    /// Whether the search ran to completion.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, Outcome::Optimal(_))
    }

    /// Empty for [`Outcome::Optimal`].
    pub fn truncation(&self) -> &[Truncation] {
        match self {
            Outcome::Optimal(_) => &[],
            Outcome::BestEffort { truncation, .. } => truncation,
        }
    }
}

/// Step counter shared by every phase of one solve.
#[derive(Debug)]
pub(crate) struct Budget {
    limit: Option<u64>,
    spent: AtomicU64,
    exhausted: AtomicBool,
}

impl Budget {
    pub(crate) fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            spent: AtomicU64::new(0),
            exhausted: AtomicBool::new(false),
        }
    }

    pub(crate) fn unlimited() -> Self {
        Self::new(None)
    }

    #[cfg(test)]
    pub(crate) fn limited(limit: u64) -> Self {
        Self::new(Some(limit))
    }

    /// Spends one step. Returns `false` once the budget is gone.
    pub(crate) fn tick(&self) -> bool {
        let Some(limit) = self.limit else {
            return true;
        };
        if self.exhausted.load(Ordering::Relaxed) {
            return false;
        }
        if self.spent.fetch_add(1, Ordering::Relaxed) >= limit {
            self.exhausted.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }
}

/// Plans how a colony's ants travel from start to end in as few turns as possible.
///
/// Solving runs in three steps:
/// 1. discover up to [`SolverConfig::max_paths`] routes depth-first, then sort them by length (stable);
/// 2. search the subsets of pairwise interior-disjoint routes for the one needing the fewest turns;
/// 3. dispatch ants onto the chosen routes and lay out their moves.
///
/// A [`Solver`] holds no state between solves and may be shared freely.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver using `config`.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration every solve uses.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `colony`, returning [`Ok`] with an [`Outcome`] or [`Err`] with a [`SolverFailure`] reason.
    ///
    /// An [`Outcome::BestEffort`] is returned whenever the route cap or the node budget cut the search short.
    pub fn solve(&self, colony: &Colony) -> Result<Outcome, SolverFailure> {
        let config = &self.config;
        if config.max_paths == 0 {
            return Err(SolverFailure::InvalidConfig);
        }

        let budget = Budget::new(config.node_budget);
        let enumeration = route::enumerate(colony, config.max_paths, &budget);
        let mut routes = enumeration.routes;
        if routes.is_empty() {
            return Err(match config.node_budget {
                Some(budget) if enumeration.exhausted => SolverFailure::BudgetExhausted { budget },
                _ => SolverFailure::Unsolvable,
            });
        }
        routes.sort_by_key(Route::hops);

        let hops = routes.iter().map(Route::hops).collect_vec();
        let split_depth = if config.parallel { config.split_depth } else { 0 };
        let selection = select::select(
            routes.iter().map(Route::interior).collect(),
            &hops,
            colony.ants(),
            colony.room_count(),
            &budget,
            split_depth,
        );
        let best = selection.best.ok_or(SolverFailure::Unsolvable)?;

        let chosen = best.picks.iter().map(|&i| routes[i].clone()).collect_vec();
        let schedule = Schedule::build(&chosen, colony.ants());
        debug_assert_eq!(schedule.turn_count(), best.turns);

        info!(
            "{} ant(s) over {} of {} route(s) in {} turn(s), {} selection node(s)",
            colony.ants(),
            chosen.len(),
            routes.len(),
            best.turns,
            selection.explored
        );

        let plan = Plan {
            routes: chosen,
            indices: best.picks,
            turns: best.turns,
            schedule,
            discovered: routes.len(),
        };

        let mut truncation = Vec::new();
        if enumeration.capped {
            truncation.push(Truncation::RouteCapReached {
                max_paths: config.max_paths,
            });
        }
        if let Some(budget) = config.node_budget.filter(|_| enumeration.exhausted || selection.exhausted) {
            truncation.push(Truncation::NodeBudgetExhausted { budget });
        }

        if truncation.is_empty() {
            Ok(Outcome::Optimal(plan))
        } else {
            warn!("search was cut short ({truncation:?}); the plan may not be optimal");
            Ok(Outcome::BestEffort { plan, truncation })
        }
    }
}
