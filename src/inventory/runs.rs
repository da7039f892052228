//! Locating blocks of adjacent free seats.

use super::{OccupancyTable, SeatCoord};

/// A maximal stretch of consecutive free seats within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRun {
    pub start: usize,
    pub len: usize,
}

/// Iterator over the maximal free runs of a row, left to right. Equivalent to a run-length encoding of the row that
/// keeps only the free stretches.
#[derive(Debug, Clone)]
pub struct FreeRuns<'a> {
    row: &'a [bool],
    position: usize,
}

/// Run-length encode the free seats of `row` (`false` is free, `true` is sold).
pub fn free_runs(row: &[bool]) -> FreeRuns<'_> {
    FreeRuns { row, position: 0 }
}

impl Iterator for FreeRuns<'_> {
    type Item = FreeRun;

    fn next(&mut self) -> Option<FreeRun> {
        let rest = &self.row[self.position..];
        let offset = rest.iter().position(|&sold| !sold)?;
        let start = self.position + offset;
        let len = self.row[start..].iter().take_while(|&&sold| !sold).count();
        self.position = start + len;
        Some(FreeRun { start, len })
    }
}

/// Find the first place `n` free seats sit next to each other in a single row.
///
/// Scans sections in order, rows within each section in order, and runs within each row left to right, returning the
/// start of the first run at least `n` seats long. A longer run later in the scan never wins over an earlier one that
/// fits. Returns `None` if no row has room, or if `n` is zero.
pub fn find_contiguous_run(table: &OccupancyTable, n: usize) -> Option<SeatCoord> {
    if n == 0 {
        return None;
    }

    let shape = table.shape();
    for section in 0..shape.sections {
        for row in 0..shape.rows {
            if let Some(run) = free_runs(table.row(section, row)).find(|run| run.len >= n) {
                return Some(SeatCoord {
                    section,
                    row,
                    seat: run.start,
                });
            }
        }
    }
    None
}
