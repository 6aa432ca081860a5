//! Numeric quantities accumulated along a search.
//!
//! Both engines are generic over the quantity they add up: path cost for
//! [`GraphSearch`](crate::GraphSearch), collected value for
//! [`BranchAndBound`](crate::BranchAndBound). The [`Cost`] trait is the small
//! amount of arithmetic they need.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;

/// An additive, totally ordered quantity.
///
/// Implemented for every primitive integer type. Signed types may hold
/// negative values; the graph engine rejects those on transitions.
pub trait Cost: Copy + Ord + Hash + Debug + Add<Output = Self> {
    /// Additive identity, the cost of a start state
    const ZERO: Self;
    /// Cost of a single unit-cost transition
    const ONE: Self;

    /// Addition that reports overflow instead of wrapping
    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn is_negative(&self) -> bool {
        *self < Self::ZERO
    }
}

macro_rules! impl_cost {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Cost for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$ty>::checked_add(self, rhs)
                }
            }
        )*
    };
}

impl_cost!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_costs_report_negativity() {
        assert!((-1i32).is_negative());
        assert!(!0i64.is_negative());
        assert!(!u32::MAX.is_negative());
    }

    #[test]
    fn test_checked_add_reports_overflow() {
        assert_eq!(Cost::checked_add(250u8, 5), Some(255));
        assert_eq!(Cost::checked_add(250u8, 6), None);
    }
}
