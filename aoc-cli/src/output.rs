//! Answer lines and the closing timing summary.
//!
//! Answers go to stdout, failures to stderr. The line builders are pure so
//! they can be tested without capturing output.

use crate::executor::SolverResult;
use chrono::TimeDelta;
use std::time::{Duration, Instant};

pub struct OutputFormatter {
    quiet: bool,
    started: Instant,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            started: Instant::now(),
        }
    }

    pub fn print_result(&self, result: &SolverResult) {
        match (&result.answer, self.quiet) {
            (Ok(answer), true) => println!("{answer}"),
            (Ok(_), false) => println!("{}", answer_line(result)),
            (Err(e), true) => eprintln!("Error: {e}"),
            (Err(e), false) => eprintln!("{}: Error - {e}", label(result)),
        }
    }

    /// Totals over successful parts plus wall-clock time. Silent in quiet mode.
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }
        println!();
        for line in summary_lines(results, self.started.elapsed()) {
            println!("{line}");
        }
    }
}

fn label(result: &SolverResult) -> String {
    format!("{}/{:02} Part {}", result.year, result.day, result.part)
}

/// `2022/16 Part 1: 1651 (parse: 1.20ms, solve: 35.00ms)`
fn answer_line(result: &SolverResult) -> String {
    let answer = result.answer.as_deref().unwrap_or("-");
    let parse = result
        .parse_duration
        .map(|d| format!("parse: {}, ", format_delta(d)))
        .unwrap_or_default();
    format!(
        "{}: {answer} ({parse}solve: {})",
        label(result),
        format_delta(result.solve_duration)
    )
}

fn summary_lines(results: &[SolverResult], elapsed: Duration) -> Vec<String> {
    let solved: Vec<&SolverResult> = results.iter().filter(|r| r.answer.is_ok()).collect();
    let failed = results.len() - solved.len();
    let parse: TimeDelta = solved.iter().filter_map(|r| r.parse_duration).sum();
    let solve: TimeDelta = solved.iter().map(|r| r.solve_duration).sum();

    let mut lines = vec![
        "--- Summary ---".to_string(),
        format!("Solvers: {} solved, {failed} failed", solved.len()),
        format!("Total parse time: {}", format_delta(parse)),
        format!("Total solve time: {}", format_delta(solve)),
        format!("Elapsed wall-clock time: {}", format_micros(elapsed.as_micros())),
    ];
    if !elapsed.is_zero() {
        let compute_secs = (parse + solve).num_microseconds().unwrap_or(0) as f64 / 1e6;
        lines.push(format!("Speedup factor: {:.2}x", compute_secs / elapsed.as_secs_f64()));
    }
    lines
}

fn format_delta(d: TimeDelta) -> String {
    match d.num_microseconds() {
        None => "N/A".to_string(),
        Some(micros) if micros < 0 => format!("-{}", format_micros(micros.unsigned_abs().into())),
        Some(micros) => format_micros(micros.unsigned_abs().into()),
    }
}

fn format_micros(micros: u128) -> String {
    if micros < 1_000 {
        format!("{micros}µs")
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1e3)
    } else {
        format!("{:.2}s", micros as f64 / 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArcExecutorError, ExecutorError};

    fn result(part: u8, answer: Result<&str, ArcExecutorError>) -> SolverResult {
        SolverResult {
            year: 2022,
            day: 16,
            part,
            answer: answer.map(str::to_string),
            solve_duration: TimeDelta::milliseconds(30),
            parse_duration: (part == 1).then(|| TimeDelta::microseconds(1_200)),
        }
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_delta(TimeDelta::microseconds(420)), "420µs");
        assert_eq!(format_delta(TimeDelta::microseconds(12_340)), "12.34ms");
        assert_eq!(format_delta(TimeDelta::milliseconds(2_500)), "2.50s");
        assert_eq!(format_delta(TimeDelta::microseconds(-7)), "-7µs");
        assert_eq!(format_micros(61_000_000), "61.00s");
    }

    #[test]
    fn test_answer_line_shows_parse_only_when_paid() {
        assert_eq!(
            answer_line(&result(1, Ok("1651"))),
            "2022/16 Part 1: 1651 (parse: 1.20ms, solve: 30.00ms)"
        );
        assert_eq!(
            answer_line(&result(2, Ok("1707"))),
            "2022/16 Part 2: 1707 (solve: 30.00ms)"
        );
    }

    #[test]
    fn test_summary_counts_only_successes() {
        let results = [
            result(1, Ok("1651")),
            result(2, Err(ExecutorError::ChannelSend.into())),
        ];
        let lines = summary_lines(&results, Duration::from_millis(15));
        assert_eq!(lines[1], "Solvers: 1 solved, 1 failed");
        assert_eq!(lines[2], "Total parse time: 1.20ms");
        assert_eq!(lines[3], "Total solve time: 30.00ms");
        assert_eq!(lines[4], "Elapsed wall-clock time: 15.00ms");
        assert_eq!(lines[5], "Speedup factor: 2.08x");
    }
}
