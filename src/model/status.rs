// In: src/model/status.rs

//! The overall status of a solving session, advanced monotonically by the
//! solution-stream state machine.

use std::fmt;

/// Search status of a solution stream.
///
/// A stream starts `Incomplete` and is advanced to exactly one terminal value
/// when a marker line is recognized, or stays `Incomplete` if the producing
/// process is still running or was cut off. The variant order is the status
/// severity order and is relied upon by `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Search exhausted: all solutions found / optimality proven.
    Complete,
    /// Still solving, or the output was cut off before a terminal marker.
    Incomplete,
    /// The solver gave up without an answer.
    Unknown,
    /// Proven that no solution exists.
    Unsatisfiable,
    /// The objective is unbounded.
    Unbounded,
    /// The solver could not distinguish unsatisfiable from unbounded.
    UnsatOrUnbounded,
    /// A generic solver error.
    Error,
}

impl Status {
    /// True once no further solutions can be produced. `Incomplete` is the
    /// only non-terminal status; note that a stream whose underlying process
    /// has exited can legitimately stay `Incomplete` forever ("best-effort
    /// partial result").
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Incomplete)
    }

    /// True for the statuses that mean "something went wrong" rather than
    /// "here is (part of) the answer".
    pub fn is_error_family(&self) -> bool {
        matches!(
            self,
            Status::Unknown
                | Status::Unsatisfiable
                | Status::Unbounded
                | Status::UnsatOrUnbounded
                | Status::Error
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Complete => "COMPLETE",
            Status::Incomplete => "INCOMPLETE",
            Status::Unknown => "UNKNOWN",
            Status::Unsatisfiable => "UNSATISFIABLE",
            Status::Unbounded => "UNBOUNDED",
            Status::UnsatOrUnbounded => "UNSAT_OR_UNBOUNDED",
            Status::Error => "ERROR",
        };
        f.write_str(s)
    }
}
