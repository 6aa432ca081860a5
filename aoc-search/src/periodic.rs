//! Obstacles that drift across a wrapping grid.
//!
//! Each obstacle moves one cell per tick in a fixed heading and wraps around
//! the interior. After `lcm(rows, cols)` ticks the whole field is back in its
//! initial layout, so a time-dependent search only has to key its visited
//! states on `time % cycle_length()`.
//!
//! Occupancy is answered without simulating: to know whether a cell is hit at
//! tick `t`, walk back `t` cells against each heading and look for an obstacle
//! that started there with that heading.

/// Direction an obstacle drifts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Parse the usual `^ v < >` map glyphs.
    pub fn from_glyph(glyph: u8) -> Option<Self> {
        match glyph {
            b'^' => Some(Heading::Up),
            b'v' => Some(Heading::Down),
            b'<' => Some(Heading::Left),
            b'>' => Some(Heading::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Heading::Up => 1,
            Heading::Down => 2,
            Heading::Left => 4,
            Heading::Right => 8,
        }
    }
}

pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// Initial obstacle layout of a `rows x cols` wrapping interior.
///
/// Coordinates are zero-based interior coordinates; surrounding walls are the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftField {
    rows: usize,
    cols: usize,
    // Heading bits per cell at tick 0, row-major
    origins: Vec<u8>,
}

impl DriftField {
    /// Empty field. `None` if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self {
            rows,
            cols,
            origins: vec![0; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Place an obstacle at its tick-0 position. Out-of-range cells are ignored
    /// and reported with `false`.
    pub fn place(&mut self, row: usize, col: usize, heading: Heading) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.origins[row * self.cols + col] |= heading.bit();
        true
    }

    /// Ticks until the layout repeats.
    pub fn cycle_length(&self) -> usize {
        lcm(self.rows, self.cols)
    }

    fn started_at(&self, row: usize, col: usize, heading: Heading) -> bool {
        self.origins[row * self.cols + col] & heading.bit() != 0
    }

    /// Whether any obstacle covers interior cell `(row, col)` at tick `time`.
    pub fn is_occupied(&self, row: usize, col: usize, time: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        let dr = time % self.rows;
        let dc = time % self.cols;
        let up_origin = (row + dr) % self.rows;
        let down_origin = (row + self.rows - dr) % self.rows;
        let left_origin = (col + dc) % self.cols;
        let right_origin = (col + self.cols - dc) % self.cols;

        self.started_at(up_origin, col, Heading::Up)
            || self.started_at(down_origin, col, Heading::Down)
            || self.started_at(row, left_origin, Heading::Left)
            || self.started_at(row, right_origin, Heading::Right)
    }
}
