//! Sequential test runner
//!
//! Writes a banner, then for every case a phase header, whatever the routine
//! prints, and one verdict line. Verdicts are handed back to the caller but
//! never turned into an exit status.

use crate::case::TestCase;
use crate::routines::{RoutineError, Routines};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const BANNER: &str = "Starting Testing...";

/// Outcome of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failed { actual: i32 },
    /// The routine produced no value at all
    Errored { message: String },
}

impl Verdict {
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub case: TestCase,
    pub verdict: Verdict,
}

/// Human readable verdict for a case, without the trailing newline
#[must_use]
pub fn verdict_line(case: &TestCase, verdict: &Verdict) -> String {
    let routine = case.routine;
    let args = case.args;
    match verdict {
        Verdict::Success => {
            format!("TEST Success : {routine} value {args} result {}.", case.expected)
        }
        Verdict::Failed { actual } => format!("TEST Failed : {routine} value {args} result {actual}"),
        Verdict::Errored { message } => {
            format!("TEST Failed : {routine} value {args} error {message}")
        }
    }
}

pub struct Runner<W: Write> {
    out: W,
    startup_delay: Duration,
}

impl<W: Write> Runner<W> {
    /// Runner writing to `out`, starting without delay
    pub const fn new(out: W) -> Self {
        Self {
            out,
            startup_delay: Duration::ZERO,
        }
    }

    /// Wait this long before the first line, giving the target time to settle
    #[must_use]
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Run every case in order
    ///
    /// A wrong result or a failing routine only produces a failure line; the
    /// remaining cases still run.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only when the output sink cannot be written.
    pub fn run(
        &mut self,
        routines: &mut dyn Routines,
        cases: &[TestCase],
    ) -> io::Result<Vec<CaseReport>> {
        if !self.startup_delay.is_zero() {
            info!(delay = ?self.startup_delay, "waiting before the first test");
            thread::sleep(self.startup_delay);
        }

        writeln!(self.out, "{BANNER}")?;
        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            reports.push(self.run_case(routines, case)?);
        }
        self.out.flush()?;

        let passed = reports.iter().filter(|report| report.verdict.passed()).count();
        info!(passed, total = reports.len(), "smoke run finished");
        Ok(reports)
    }

    fn run_case(&mut self, routines: &mut dyn Routines, case: &TestCase) -> io::Result<CaseReport> {
        writeln!(self.out, "Execute {} output:", case.call())?;

        let verdict = match case.invoke(routines, &mut self.out) {
            Ok(actual) if actual == case.expected => Verdict::Success,
            Ok(actual) => Verdict::Failed { actual },
            Err(RoutineError::Io(err)) => return Err(err),
            Err(err) => Verdict::Errored {
                message: err.to_string(),
            },
        };

        match &verdict {
            Verdict::Success => debug!(call = %case.call(), "passed"),
            Verdict::Failed { actual } => {
                warn!(call = %case.call(), expected = case.expected, actual, "unexpected result");
            }
            Verdict::Errored { message } => warn!(call = %case.call(), %message, "routine failed"),
        }

        writeln!(self.out, "{}", verdict_line(case, &verdict))?;
        Ok(CaseReport {
            case: *case,
            verdict,
        })
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
