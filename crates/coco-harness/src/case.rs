//! Test cases for the routine smoke run

use crate::routines::{RoutineError, Routines};
use std::fmt;
use std::io::Write;

/// The routines under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    Loopysum,
    Even,
    Coco,
}

impl Routine {
    pub const ALL: [Self; 3] = [Self::Loopysum, Self::Even, Self::Coco];

    /// Symbol name, shared by the linked externals and the script functions
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Loopysum => "loopysum",
            Self::Even => "even",
            Self::Coco => "coco",
        }
    }

    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Loopysum | Self::Even => 1,
            Self::Coco => 2,
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Literal arguments of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Args {
    One(i32),
    Two(i32, i32),
}

impl Args {
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Two(_, _) => 2,
        }
    }

    #[must_use]
    pub fn to_vec(self) -> Vec<i32> {
        match self {
            Self::One(a) => vec![a],
            Self::Two(a, b) => vec![a, b],
        }
    }
}

/// Arguments as they appear in verdict lines: `4, 12`
impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(a) => write!(f, "{a}"),
            Self::Two(a, b) => write!(f, "{a}, {b}"),
        }
    }
}

/// One routine call with the result it must produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    pub routine: Routine,
    pub args: Args,
    pub expected: i32,
}

impl TestCase {
    #[must_use]
    pub const fn new(routine: Routine, args: Args, expected: i32) -> Self {
        Self {
            routine,
            args,
            expected,
        }
    }

    /// The call as written in phase headers: `coco(4,12)`
    #[must_use]
    pub fn call(&self) -> String {
        let args: Vec<String> = self.args.to_vec().iter().map(ToString::to_string).collect();
        format!("{}({})", self.routine, args.join(","))
    }

    /// Invoke the routine through the given provider
    ///
    /// # Errors
    ///
    /// Returns `RoutineError` when the arguments do not fit the routine or the
    /// provider fails to produce a value.
    pub fn invoke(
        &self,
        routines: &mut dyn Routines,
        out: &mut dyn Write,
    ) -> Result<i32, RoutineError> {
        match (self.routine, self.args) {
            (Routine::Loopysum, Args::One(n)) => routines.loopysum(n, out),
            (Routine::Even, Args::One(n)) => routines.even(n, out),
            (Routine::Coco, Args::Two(a, b)) => routines.coco(a, b, out),
            (routine, args) => Err(RoutineError::Arity {
                routine,
                expected: routine.arity(),
                found: args.len(),
            }),
        }
    }
}

/// The fixed smoke suite, in run order
pub const SUITE: [TestCase; 6] = [
    // 5 + 4 + 3 + 2 + 1
    TestCase::new(Routine::Loopysum, Args::One(5), 15),
    TestCase::new(Routine::Loopysum, Args::One(6), 21),
    TestCase::new(Routine::Even, Args::One(4), 1),
    TestCase::new(Routine::Even, Args::One(3), 0),
    // prints 4 then 12
    TestCase::new(Routine::Coco, Args::Two(4, 12), 12),
    TestCase::new(Routine::Coco, Args::Two(7, 2), 2),
];
