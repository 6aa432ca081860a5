//! Property tests for part dispatch and range checks

use aoc_solver::{
    AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver, SolverExt,
    SolverRegistryBuilder,
};
use proptest::prelude::*;

/// Hand-written solver with `N` parts that echoes the part number
struct Echo<const N: u8>;

impl<const N: u8> AocParser for Echo<N> {
    type SharedData<'a> = ();

    fn parse(_input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(())
    }
}

impl<const N: u8> Solver for Echo<N> {
    const PARTS: u8 = N;

    fn solve_part(_shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
        Ok(format!("part{part}"))
    }
}

/// Cube coordinates; part 1 counts cubes, part 2 the largest coordinate sum.
#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Cubes;

impl AocParser for Cubes {
    type SharedData<'a> = Vec<[i32; 3]>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(i, line)| {
                let mut cube = [0; 3];
                let mut fields = line.split(',');
                for slot in &mut cube {
                    *slot = fields
                        .next()
                        .and_then(|f| f.trim().parse().ok())
                        .ok_or_else(|| ParseError::at_line(i + 1, "expected x,y,z"))?;
                }
                Ok(cube)
            })
            .collect()
    }
}

impl PartSolver<1> for Cubes {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.len().to_string())
    }
}

impl PartSolver<2> for Cubes {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .map(|c| c.iter().sum::<i32>())
            .max()
            .map(|m| m.to_string())
            .ok_or_else(|| SolveError::Unsolvable("no cubes".into()))
    }
}

fn checked(parts: u8, part: u8) -> Result<String, SolveError> {
    match parts {
        1 => Echo::<1>::solve_part_checked_range(&mut (), part),
        2 => Echo::<2>::solve_part_checked_range(&mut (), part),
        3 => Echo::<3>::solve_part_checked_range(&mut (), part),
        _ => Echo::<25>::solve_part_checked_range(&mut (), part),
    }
}

fn cube_input(cubes: &[[i32; 3]]) -> String {
    cubes
        .iter()
        .map(|[x, y, z]| format!("{x},{y},{z}"))
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_out_of_range_rejected(parts in prop::sample::select(vec![1u8, 2, 3, 25]), part in 0u8..=255) {
        let result = checked(parts, part);
        if part == 0 || part > parts {
            prop_assert!(matches!(result, Err(SolveError::PartOutOfRange(p)) if p == part));
        } else {
            prop_assert_eq!(result.unwrap(), format!("part{part}"));
        }
    }

    #[test]
    fn prop_derive_matches_direct_call(
        cubes in prop::collection::vec(prop::array::uniform3(-5i32..20), 1..12),
        part in 1u8..=2,
    ) {
        let input = cube_input(&cubes);
        let mut dispatched = Cubes::parse(&input).unwrap();
        let mut direct = Cubes::parse(&input).unwrap();

        let via_dispatch = Cubes::solve_part(&mut dispatched, part).unwrap();
        let via_direct = match part {
            1 => <Cubes as PartSolver<1>>::solve(&mut direct),
            _ => <Cubes as PartSolver<2>>::solve(&mut direct),
        }
        .unwrap();
        prop_assert_eq!(via_dispatch, via_direct);
    }

    #[test]
    fn prop_undeclared_parts_not_implemented(part in prop_oneof![Just(0u8), 3u8..=255]) {
        let mut shared = Cubes::parse("1,2,3").unwrap();
        prop_assert!(matches!(
            Cubes::solve_part(&mut shared, part),
            Err(SolveError::PartNotImplemented(p)) if p == part
        ));
    }
}

#[test]
fn test_registry_instance_reports_timings() {
    let registry = SolverRegistryBuilder::new()
        .register::<Cubes>(2022, 18)
        .unwrap()
        .build();
    let mut solver = registry.create_solver(2022, 18, "1,1,1\n2,1,1").unwrap();

    assert!(solver.parse_end() >= solver.parse_start());
    let result = solver.solve(2).unwrap();
    assert_eq!(result.answer, "4");
    assert!(result.duration() >= chrono::TimeDelta::zero());
    assert!(matches!(solver.solve(3), Err(SolveError::PartOutOfRange(3))));
}

#[test]
fn test_bad_line_is_reported() {
    let err = Cubes::parse("1,1,1\n2,x,1").unwrap_err();
    assert_eq!(err, ParseError::at_line(2, "expected x,y,z"));
}
