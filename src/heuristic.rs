//! Cost estimate for best-first search.

use crate::grid::Layout;
use crate::state::Config;
use crate::Estimate;

/// Stand-in distance when there is nothing to measure to.
pub const UNREACHABLE: i64 = 2_000_000_000;

/// Weighted distance of every stone to its nearest switch, plus an agent-to-stone tie-break.
///
/// `cost` is a lower bound on the remaining push cost: each stone has to travel at least
/// its Manhattan distance to some switch, paying its weight per cell.
///
/// `steps` only orders ties. It is not the distance from the agent to its nearest stone: each
/// stone overwrites it with the smaller of the agent distance and the nearest-switch distance
/// left over from the last stone of the `cost` loop, so it ends up describing the last stone
/// only. Kept as is, since it never changes which solutions are found, only which of equally
/// ranked states is expanded first.
///
/// "Last" is last in position order (top to bottom, then left to right), not the stone that
/// was pushed most recently, so A* can check a different number of states than a solver that
/// keeps its stones in push order.
///
/// The weighted sum saturates at `i64::MAX` rather than overflow on huge weights.
pub fn estimate(config: &Config, layout: &Layout) -> Estimate {
    let mut cost = 0;
    let mut nearest = UNREACHABLE;

    for (stone, weight) in config.stones.iter() {
        nearest = layout
            .switches()
            .iter()
            .map(|switch| stone.manhattan_distance(*switch))
            .min()
            .unwrap_or(UNREACHABLE);
        cost = nearest.saturating_mul(*weight).saturating_add(cost);
    }

    let mut steps = UNREACHABLE;
    for stone in config.stones.keys() {
        steps = nearest.min(config.agent.manhattan_distance(*stone));
    }

    Estimate { cost, steps }
}
