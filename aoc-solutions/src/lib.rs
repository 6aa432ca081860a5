//! Advent of Code 2022 search puzzles
//!
//! Each day is a solver registered through `#[derive(AutoRegisterSolver)]`,
//! so linking this crate is enough for a runner to find them. The searches
//! themselves live in `aoc-search`; the modules here parse input and map
//! each puzzle onto a graph search or a branch-and-bound problem.

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
