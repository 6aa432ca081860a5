//! Arithmetic shared by resource-accumulation problems.

use super::engine::Budget;

/// Turns of production before `required` units are on hand, starting from
/// `have` and gaining `rate` per turn.
///
/// `Some(0)` if the stock already suffices. `None` if it does not and
/// nothing is being produced, so waiting would never help.
///
/// ```rust
/// use aoc_search::turns_to_afford;
///
/// assert_eq!(turns_to_afford(4, 0, 2), Some(2));
/// assert_eq!(turns_to_afford(5, 0, 2), Some(3));
/// assert_eq!(turns_to_afford(3, 7, 0), Some(0));
/// assert_eq!(turns_to_afford(3, 1, 0), None);
/// ```
pub fn turns_to_afford(required: u32, have: u32, rate: u32) -> Option<Budget> {
    if have >= required {
        return Some(0);
    }
    if rate == 0 {
        return None;
    }
    Some((required - have).div_ceil(rate))
}

/// Whether more producers of a resource can no longer help.
///
/// True when the current `rate` already covers `max_use`, the most any
/// single decision spends per turn, or when stock plus future production
/// already covers spending `max_use` on every remaining turn.
pub fn is_saturated(rate: u32, have: u32, remaining: Budget, max_use: u32) -> bool {
    if rate >= max_use {
        return true;
    }
    let supply = u64::from(rate) * u64::from(remaining) + u64::from(have);
    supply >= u64::from(max_use) * u64::from(remaining)
}
