//! Smoke-test harness for the `coco`, `loopysum` and `even` routines
//!
//! Calls each routine with hard-coded arguments and prints whether the
//! result matched. The routines come from a pluggable provider: the
//! Controller Code script run on the interpreter, a native reference, or
//! (with the `linked` feature) the externally linked symbols.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub mod case;
pub mod routines;
pub mod runner;
pub mod script;

#[cfg(feature = "linked")]
pub mod linked;

pub use case::{Args, Routine, SUITE, TestCase};
pub use routines::{ReferenceRoutines, RoutineError, Routines};
pub use runner::{CaseReport, Runner, Verdict};
pub use script::ScriptRoutines;

/// Wait before the first test, matching the target's power-up settle time
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(2000);

/// Which provider supplies the routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutineSource {
    /// Controller Code run on the interpreter
    #[default]
    Script,
    /// Native Rust rendition
    Reference,
    /// Externally linked C symbols
    Linked,
}

impl FromStr for RoutineSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(Self::Script),
            "reference" => Ok(Self::Reference),
            "linked" => Ok(Self::Linked),
            other => Err(format!("unknown routine source `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub startup_delay: Duration,
    pub source: RoutineSource,
    /// Routine script to load instead of the bundled one
    pub script: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            startup_delay: DEFAULT_STARTUP_DELAY,
            source: RoutineSource::default(),
            script: None,
        }
    }
}

/// Build the routine provider selected by `config`
///
/// # Errors
///
/// Returns `RoutineError` if the routine script cannot be loaded, or linked
/// routines were requested from a build without the `linked` feature
pub fn load_routines(config: &HarnessConfig) -> Result<Box<dyn Routines>, RoutineError> {
    match config.source {
        RoutineSource::Script => {
            let routines = match &config.script {
                Some(path) => ScriptRoutines::from_file(path)?,
                None => ScriptRoutines::bundled()?,
            };
            Ok(Box::new(routines))
        }
        RoutineSource::Reference => Ok(Box::new(ReferenceRoutines)),
        RoutineSource::Linked => linked_routines(),
    }
}

#[cfg(feature = "linked")]
fn linked_routines() -> Result<Box<dyn Routines>, RoutineError> {
    Ok(Box::new(linked::LinkedRoutines))
}

#[cfg(not(feature = "linked"))]
fn linked_routines() -> Result<Box<dyn Routines>, RoutineError> {
    Err(RoutineError::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_source_from_str() {
        assert_eq!("script".parse(), Ok(RoutineSource::Script));
        assert_eq!("reference".parse(), Ok(RoutineSource::Reference));
        assert_eq!("linked".parse(), Ok(RoutineSource::Linked));
        assert!("asm".parse::<RoutineSource>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.startup_delay, Duration::from_secs(2));
        assert_eq!(config.source, RoutineSource::Script);
        assert!(config.script.is_none());
    }

    #[test]
    fn test_load_each_source() {
        let mut out = Vec::new();
        for source in [RoutineSource::Script, RoutineSource::Reference] {
            let config = HarnessConfig {
                source,
                ..HarnessConfig::default()
            };
            let mut routines = load_routines(&config).unwrap();
            assert_eq!(routines.loopysum(5, &mut out).unwrap(), 15);
        }
    }

    #[cfg(not(feature = "linked"))]
    #[test]
    fn test_linked_requires_feature() {
        let config = HarnessConfig {
            source: RoutineSource::Linked,
            ..HarnessConfig::default()
        };
        assert!(matches!(load_routines(&config), Err(RoutineError::Unavailable)));
    }
}
