//! The three-stage trimming heuristic.
//!
//! Applied once per run, in fixed order, each stage reading what the previous
//! one left behind. The sequence is not idempotent. Stages:
//! - A: parity trim, driven by the turn's logical length
//! - B: additive-prime trim over the current line count
//! - C: single-line recovery from the backup

use crate::transcript::Transcript;
use anyhow::Result;

/// What one trim run did, for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimReport {
    pub lines_before: usize,
    pub lines_after: usize,
    /// Whether stage C pulled a line back from the backup
    pub recovered: bool,
}

/// Trial division primality. n < 2 is not prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Smallest `i >= 2` with `i` and `total - i` both prime, with its complement.
///
/// For odd or small totals no such pair may exist; the caller treats that as
/// "leave the file alone".
pub fn prime_pair(total: usize) -> Option<(usize, usize)> {
    (2..total).find(|&i| is_prime(i) && is_prime(total - i)).map(|i| (i, total - i))
}

/// Stage A: keep the tail of the file, sized by the logical length's parity.
///
/// Even: the last 4 lines. Odd: the last `logical_length / 2` lines, at
/// least 1. The decision is driven by the logical length, not by how many
/// lines the file currently has.
pub fn parity_trim(lines: Vec<String>, logical_length: usize) -> Vec<String> {
    let keep = if logical_length % 2 == 0 {
        4
    } else {
        (logical_length / 2).max(1)
    };
    tail(lines, keep)
}

/// Stage B: split the line count into the lowest additive prime pair and keep
/// the larger side. Under 2 lines, or with no pair, the file is unchanged.
pub fn additive_prime_trim(lines: Vec<String>) -> Vec<String> {
    let total = lines.len();
    if total < 2 {
        return lines;
    }
    match prime_pair(total) {
        Some((i, j)) if j > i => tail(lines, j),
        Some((i, _)) => head(lines, i),
        None => lines,
    }
}

/// Stage C: a file collapsed to exactly one line gets the backup's
/// second-to-last line appended, restoring one unit of prior context.
pub fn single_line_recovery(mut lines: Vec<String>, backup: &[String]) -> Vec<String> {
    if lines.len() == 1 && backup.len() >= 2 {
        lines.push(backup[backup.len() - 2].clone());
    }
    lines
}

/// Run all three stages over `lines`.
pub fn trim(lines: Vec<String>, logical_length: usize, backup: &[String]) -> (Vec<String>, bool) {
    let after_a = parity_trim(lines, logical_length);
    let after_b = additive_prime_trim(after_a);
    let single = after_b.len() == 1;
    let after_c = single_line_recovery(after_b, backup);
    let recovered = single && after_c.len() == 2;
    (after_c, recovered)
}

/// Trim `memory` in place, reading recovery context from `backup`.
pub fn apply(memory: &Transcript, backup: &Transcript, logical_length: usize) -> Result<TrimReport> {
    let lines = memory.lines()?;
    let lines_before = lines.len();
    let backup_lines = backup.lines()?;
    let (trimmed, recovered) = trim(lines, logical_length, &backup_lines);
    let lines_after = trimmed.len();
    memory.write_lines(&trimmed)?;
    Ok(TrimReport {
        lines_before,
        lines_after,
        recovered,
    })
}

fn tail(lines: Vec<String>, keep: usize) -> Vec<String> {
    let total = lines.len();
    if total <= keep {
        return lines;
    }
    lines[total - keep..].to_vec()
}

fn head(mut lines: Vec<String>, keep: usize) -> Vec<String> {
    lines.truncate(keep);
    lines
}
