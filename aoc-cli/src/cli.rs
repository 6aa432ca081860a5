//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all solvers sequentially in order
    Sequential,
    /// Parallelize across years; days and parts run sequentially within each year
    Year,
    /// Parallelize across year/day combinations; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all year/day/part combinations
    Part,
}

/// Advent of Code search puzzle runner
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Run Advent of Code solvers on local inputs", version)]
pub struct Args {
    /// Year to run (runs all years if omitted)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Day to run (runs all days if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub part: Option<u8>,

    /// Tags to filter solvers (comma-separated, all must match)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Directory holding `{year}/day{DD}/input.txt` and `test.txt`
    #[arg(long, env = "AOC_INPUT_DIR", default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Read `test.txt` instead of `input.txt`
    #[arg(long)]
    pub test: bool,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is not set (e.g. `debug`, `aoc_search=trace`)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["aoc"]).unwrap();
        assert_eq!(args.parallelize_by, ParallelizeBy::Day);
        assert!(!args.test);
        assert_eq!(args.log_level, "warn");
        assert!(args.tags.is_empty());
    }

    #[test]
    fn test_filters_and_tags() {
        let args = Args::try_parse_from([
            "aoc", "-y", "2022", "-d", "16", "-p", "2", "--tags", "bnb,pairing", "--test",
            "--input-dir", "/tmp/aoc",
        ])
        .unwrap();
        assert_eq!(args.year, Some(2022));
        assert_eq!(args.day, Some(16));
        assert_eq!(args.part, Some(2));
        assert_eq!(args.tags, ["bnb", "pairing"]);
        assert!(args.test);
        assert_eq!(args.input_dir, PathBuf::from("/tmp/aoc"));
    }

    #[test]
    fn test_day_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["aoc", "--day", "26"]).is_err());
        assert!(Args::try_parse_from(["aoc", "--parallelize-by", "minute"]).is_err());
    }
}
