//! The routine seam and the native reference provider

use crate::case::Routine;
use coco_ast::CocoError;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RoutineError {
    #[error(transparent)]
    Script(#[from] CocoError),

    #[error("{routine} returned {found} instead of an integer")]
    NotAnInteger {
        routine: Routine,
        found: &'static str,
    },

    #[error("{routine} takes {expected} argument(s), got {found}")]
    Arity {
        routine: Routine,
        expected: usize,
        found: usize,
    },

    #[error("{routine} is not defined by the routine script")]
    Missing { routine: Routine },

    #[error("{routine} overflowed a 32-bit integer")]
    Overflow { routine: Routine },

    #[error("cannot read routine script {}: {source}", path.display())]
    ScriptFile { path: PathBuf, source: io::Error },

    #[error("linked routines are not available: built without the `linked` feature")]
    Unavailable,

    #[error("cannot write to the output sink: {0}")]
    Io(#[from] io::Error),
}

/// Provider of the three routines under test
///
/// Routines may print to `out`; `coco` always does.
pub trait Routines {
    /// Sum of the integers 1 through `n`
    fn loopysum(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError>;

    /// 1 if `n` is even, 0 otherwise
    fn even(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError>;

    /// Print `a` then `b`, return `b`
    fn coco(&mut self, a: i32, b: i32, out: &mut dyn Write) -> Result<i32, RoutineError>;
}

/// Native rendition of the documented routine behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceRoutines;

impl Routines for ReferenceRoutines {
    fn loopysum(&mut self, n: i32, _out: &mut dyn Write) -> Result<i32, RoutineError> {
        (1..=n)
            .try_fold(0_i32, i32::checked_add)
            .ok_or(RoutineError::Overflow {
                routine: Routine::Loopysum,
            })
    }

    fn even(&mut self, n: i32, _out: &mut dyn Write) -> Result<i32, RoutineError> {
        Ok(i32::from(n % 2 == 0))
    }

    fn coco(&mut self, a: i32, b: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        writeln!(out, "{a}")?;
        writeln!(out, "{b}")?;
        Ok(b)
    }
}
