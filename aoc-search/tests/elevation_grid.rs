//! Shortest climbs over the 5x8 elevation grid, driven through the public API only.

use std::convert::Infallible;

use aoc_search::{GraphSearch, SearchLimits, SearchError, bfs};

const GRID: [&[u8]; 5] = [
    b"Sabqponm",
    b"abcryxxl",
    b"accszExk",
    b"acctuvwj",
    b"abdefghi",
];

type Pos = (usize, usize);

fn height(cell: u8) -> u8 {
    match cell {
        b'S' => b'a',
        b'E' => b'z',
        other => other,
    }
}

fn find(glyph: u8) -> Pos {
    GRID.iter()
        .enumerate()
        .find_map(|(r, row)| row.iter().position(|&c| c == glyph).map(|c| (r, c)))
        .unwrap()
}

fn climbs((r, c): Pos) -> Vec<Pos> {
    let here = height(GRID[r][c]);
    [
        r.checked_sub(1).map(|r| (r, c)),
        Some((r + 1, c)),
        c.checked_sub(1).map(|c| (r, c)),
        Some((r, c + 1)),
    ]
    .into_iter()
    .flatten()
    .filter(|&(nr, nc)| nr < GRID.len() && nc < GRID[0].len())
    .filter(|&(nr, nc)| height(GRID[nr][nc]) <= here + 1)
    .collect()
}

#[test]
fn test_climb_from_start() {
    let goal = find(b'E');
    let steps = bfs([find(b'S')], |&p| p == goal, |&p| climbs(p)).unwrap();
    assert_eq!(steps, Some(31));
}

#[test]
fn test_climb_from_any_lowland() {
    let goal = find(b'E');
    let lowland: Vec<Pos> = (0..GRID.len())
        .flat_map(|r| (0..GRID[0].len()).map(move |c| (r, c)))
        .filter(|&(r, c)| height(GRID[r][c]) == b'a')
        .collect();
    let steps = bfs(lowland, |&p| p == goal, |&p| climbs(p)).unwrap();
    assert_eq!(steps, Some(29));
}

#[test]
fn test_reconstructed_path_only_climbs_one_level() {
    let goal = find(b'E');
    let found = GraphSearch::unit_cost()
        .track_paths(true)
        .search([find(b'S')], |&p| p == goal, |&p: &Pos| {
            Ok::<_, Infallible>(climbs(p).into_iter().map(|next| (next, 1u32)))
        })
        .unwrap()
        .unwrap();
    let path = found.path.unwrap();
    assert_eq!(path.len(), 32);
    assert_eq!(path.first(), Some(&find(b'S')));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        assert_eq!(from.0.abs_diff(to.0) + from.1.abs_diff(to.1), 1);
        assert!(height(GRID[to.0][to.1]) <= height(GRID[from.0][from.1]) + 1);
    }
}

#[test]
fn test_expansion_budget_is_an_error_not_a_miss() {
    let goal = find(b'E');
    let err = GraphSearch::unit_cost()
        .limits(SearchLimits::unbounded().max_expansions(5))
        .search([find(b'S')], |&p| p == goal, |&p: &Pos| {
            Ok::<_, Infallible>(climbs(p).into_iter().map(|next| (next, 1u32)))
        })
        .unwrap_err();
    assert!(err.is_aborted());
    assert!(matches!(err, SearchError::ExpansionLimit { limit: 5, .. }));
}
