// In: src/stream/machine.rs

//! The solution-stream state machine.
//!
//! Solver output is a line stream: solution content interleaved with fixed
//! out-of-band marker lines. The machine is an explicit transition function
//! over (buffer, status, next line), so the same code runs unchanged whether
//! it is driven synchronously over a fully materialized line list or pumped
//! incrementally from a live process with unbounded delays between lines.

use log::{debug, trace};

use crate::model::Status;

//==================================================================================
// 1. Marker Lines
//==================================================================================

/// End of one solution.
pub const SOLUTION_SEPARATOR: &str = "----------";
/// Search complete: no further solutions exist (terminal, success).
pub const SEARCH_COMPLETE: &str = "==========";
/// No solution found (terminal).
pub const UNKNOWN_MARKER: &str = "=====UNKNOWN=====";
/// Proven that no solution exists (terminal).
pub const UNSATISFIABLE_MARKER: &str = "=====UNSATISFIABLE=====";
/// Objective unbounded (terminal).
pub const UNBOUNDED_MARKER: &str = "=====UNBOUNDED=====";
/// Ambiguous unsat/unbounded (terminal).
pub const UNSAT_OR_UNBOUNDED_MARKER: &str = "=====UNSATorUNBOUNDED=====";
/// Generic solver error (terminal).
pub const ERROR_MARKER: &str = "=====ERROR=====";

//==================================================================================
// 2. The State Machine
//==================================================================================

/// Incremental state of one solver-output stream.
///
/// Starts `Incomplete`; a marker line advances the status exactly once, after
/// which further input is treated as trailing solver statistics/log text.
/// End-of-input while still `Incomplete` is a valid, non-exceptional terminal
/// condition ("partial/best-effort result").
#[derive(Debug, Clone)]
pub struct StreamState {
    buffer: Vec<String>,
    status: Status,
    log: Vec<String>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamState {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            status: Status::Incomplete,
            log: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Trailing log text collected after a terminal marker, joined by
    /// newlines.
    pub fn log(&self) -> String {
        self.log.join("\n")
    }

    /// Feeds one line; returns the raw text of a completed solution when the
    /// line is a solution separator.
    pub fn feed(&mut self, line: &str) -> Option<String> {
        let trimmed = line.trim();

        // Once terminal, everything that follows is solver statistics/log.
        if self.status.is_terminal() {
            self.log.push(line.to_string());
            return None;
        }

        match trimmed {
            SOLUTION_SEPARATOR => {
                let text = self.buffer.join("\n");
                self.buffer.clear();
                trace!("solution separator: flushed {} bytes", text.len());
                Some(text)
            }
            SEARCH_COMPLETE => {
                self.terminate(Status::Complete);
                None
            }
            UNKNOWN_MARKER => {
                self.terminate(Status::Unknown);
                None
            }
            UNSATISFIABLE_MARKER => {
                self.terminate(Status::Unsatisfiable);
                None
            }
            UNBOUNDED_MARKER => {
                self.terminate(Status::Unbounded);
                None
            }
            UNSAT_OR_UNBOUNDED_MARKER => {
                self.terminate(Status::UnsatOrUnbounded);
                None
            }
            ERROR_MARKER => {
                self.terminate(Status::Error);
                None
            }
            "" => None,
            _ => {
                self.buffer.push(line.to_string());
                None
            }
        }
    }

    fn terminate(&mut self, status: Status) {
        debug!("stream terminated with status {}", status);
        self.status = status;
        // Content buffered before a terminal marker is not a solution; it is
        // the head of the trailing log.
        self.log.append(&mut self.buffer);
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> (Vec<String>, Status, String) {
        let mut state = StreamState::new();
        let mut solutions = Vec::new();
        for line in lines {
            if let Some(sol) = state.feed(line) {
                solutions.push(sol);
            }
        }
        let log = state.log();
        (solutions, state.status(), log)
    }

    #[test]
    fn test_two_solutions_then_complete() {
        let (sols, status, _) = run(&["x = 1;", "----------", "x = 2;", "----------", "=========="]);
        assert_eq!(sols, vec!["x = 1;", "x = 2;"]);
        assert_eq!(status, Status::Complete);
    }

    #[test]
    fn test_unsatisfiable_yields_no_solutions() {
        let (sols, status, _) = run(&["=====UNSATISFIABLE====="]);
        assert!(sols.is_empty());
        assert_eq!(status, Status::Unsatisfiable);
    }

    #[test]
    fn test_end_of_input_while_incomplete_is_valid() {
        let (sols, status, _) = run(&["x = 1;", "----------", "x = 2;"]);
        // The trailing partial buffer is not a solution.
        assert_eq!(sols, vec!["x = 1;"]);
        assert_eq!(status, Status::Incomplete);
    }

    #[test]
    fn test_lines_after_terminal_become_log() {
        let (sols, status, log) = run(&[
            "x = 1;",
            "----------",
            "==========",
            "%%%mzn-stat: solveTime=0.01",
            "%%%mzn-stat-end",
        ]);
        assert_eq!(sols.len(), 1);
        assert_eq!(status, Status::Complete);
        assert!(log.contains("solveTime"));
    }

    #[test]
    fn test_multi_line_solution_is_joined() {
        let (sols, _, _) = run(&["x = 1;", "y = 2;", "----------"]);
        assert_eq!(sols, vec!["x = 1;\ny = 2;"]);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (sols, _, _) = run(&["", "x = 1;", "   ", "----------"]);
        assert_eq!(sols, vec!["x = 1;"]);
    }

    #[test]
    fn test_separator_tolerates_surrounding_whitespace() {
        let (sols, status, _) = run(&["x = 1;", "  ----------  ", " ========== "]);
        assert_eq!(sols.len(), 1);
        assert_eq!(status, Status::Complete);
    }

    #[test]
    fn test_each_error_marker_maps_to_its_status() {
        for (marker, status) in [
            (UNKNOWN_MARKER, Status::Unknown),
            (UNBOUNDED_MARKER, Status::Unbounded),
            (UNSAT_OR_UNBOUNDED_MARKER, Status::UnsatOrUnbounded),
            (ERROR_MARKER, Status::Error),
        ] {
            let (_, got, _) = run(&[marker]);
            assert_eq!(got, status);
        }
    }
}
