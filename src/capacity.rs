//! Turn arithmetic shared by route selection and scheduling.
//!
//! A route of `L` hops can launch one ant per turn starting at turn 1. An ant launched on turn `s` arrives on turn
//! `s + L - 1`, so by turn `T` the route has delivered `T - L + 1` ants, or none while `T < L`.

/// Number of ants a route of `hops` hops has delivered by the end of turn `turns`.
#[inline]
pub fn capacity(hops: usize, turns: usize) -> usize {
    turns.saturating_add(1).saturating_sub(hops)
}

/// Ants delivered by the end of turn `turns` over every route in `hops`.
pub fn total_capacity(hops: &[usize], turns: usize) -> usize {
    hops.iter().map(|&l| capacity(l, turns)).fold(0, usize::saturating_add)
}

/// The minimum number of turns `T ≥ 1` in which routes of the given hop counts deliver `ants` ants,
/// i.e. the least `T` with `Σ max(0, T - Lᵢ + 1) ≥ ants`.
///
/// Returns `None` only when `hops` is empty (nothing can ever be delivered).
///
/// The capacity is monotone in `T`, so this binary searches between 1 and the turn count the shortest route alone
/// would need.
pub fn min_turns(ants: usize, hops: &[usize]) -> Option<usize> {
    let shortest = hops.iter().copied().min()?.max(1);
    let ants = ants.max(1);

    // the shortest route by itself finishes at turn shortest + ants - 1
    let (mut lo, mut hi) = (1, shortest.saturating_add(ants - 1));
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if total_capacity(hops, mid) >= ants {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    Some(lo)
}
