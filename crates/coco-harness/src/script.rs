//! Routines written in Controller Code, run on the interpreter

use crate::case::Routine;
use crate::routines::{RoutineError, Routines};
use coco_ast::Value;
use coco_interpreter::Interpreter;
use coco_parser::Parser;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Controller Code source of the routines shipped with the harness
pub const BUNDLED_ROUTINES: &str = include_str!("../scripts/routines.coco");

pub struct ScriptRoutines {
    interpreter: Interpreter,
}

impl ScriptRoutines {
    /// Load the routines shipped with the harness
    ///
    /// # Errors
    ///
    /// Returns `RoutineError` if the bundled script fails to load
    pub fn bundled() -> Result<Self, RoutineError> {
        Self::load(BUNDLED_ROUTINES, "routines.coco")
    }

    /// Load the routines from a `.coco` file
    ///
    /// # Errors
    ///
    /// Returns `RoutineError` if the file cannot be read or does not define
    /// the routines
    pub fn from_file(path: &Path) -> Result<Self, RoutineError> {
        let source = std::fs::read_to_string(path).map_err(|source| RoutineError::ScriptFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&source, &path.display().to_string())
    }

    /// Run `source` and check that it defines every routine with the right arity
    ///
    /// # Errors
    ///
    /// Returns `RoutineError` on syntax or runtime errors, or when a routine
    /// is missing or takes the wrong number of parameters
    pub fn load(source: &str, filename: &str) -> Result<Self, RoutineError> {
        let parser = Parser::new_with_filename(source, filename)?;
        let program = parser.parse()?;

        let mut interpreter =
            Interpreter::new().with_source(parser.source_map().clone(), parser.filename());
        let outcome = interpreter.execute(program)?;
        if !outcome.stdout.is_empty() {
            debug!(filename, output = %outcome.stdout.trim_end(), "routine script printed while loading");
        }

        for routine in Routine::ALL {
            match interpreter.function_arity(routine.name()) {
                Some(arity) if arity == routine.arity() => {}
                Some(found) => {
                    return Err(RoutineError::Arity {
                        routine,
                        expected: routine.arity(),
                        found,
                    });
                }
                None => return Err(RoutineError::Missing { routine }),
            }
        }

        Ok(Self { interpreter })
    }

    fn invoke(
        &mut self,
        routine: Routine,
        args: &[i32],
        out: &mut dyn Write,
    ) -> Result<i32, RoutineError> {
        let values: Vec<Value> = args.iter().copied().map(Value::Int).collect();
        let outcome = match self.interpreter.call(routine.name(), &values) {
            Ok(outcome) => outcome,
            Err(err) => {
                out.write_all(self.interpreter.take_output().as_bytes())?;
                return Err(err.into());
            }
        };

        out.write_all(outcome.stdout.as_bytes())?;
        match outcome.value {
            Some(Value::Int(value)) => Ok(value),
            other => Err(RoutineError::NotAnInteger {
                routine,
                found: other.as_ref().map_or("nothing", Value::type_name),
            }),
        }
    }
}

impl Routines for ScriptRoutines {
    fn loopysum(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        self.invoke(Routine::Loopysum, &[n], out)
    }

    fn even(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        self.invoke(Routine::Even, &[n], out)
    }

    fn coco(&mut self, a: i32, b: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        self.invoke(Routine::Coco, &[a, b], out)
    }
}
