//! Routines provided by externally linked objects
//!
//! The routines are plain C symbols, usually hand written assembly, and they
//! report through the exported `print` callback. That callback writes
//! straight to stdout, so pair this provider with a stdout sink.

use crate::routines::{RoutineError, Routines};
use std::ffi::c_int;
use std::io::Write;

unsafe extern "C" {
    fn coco(x: c_int, y: c_int) -> c_int;
    fn loopysum(x: c_int) -> c_int;
    fn even(x: c_int) -> c_int;
}

/// Console callback used by the linked routines
#[unsafe(no_mangle)]
pub extern "C" fn print(x: c_int) {
    let mut stdout = std::io::stdout().lock();
    // Nowhere to report a failed console write from inside a C callback.
    let _ = writeln!(stdout, "{x}");
    let _ = stdout.flush();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedRoutines;

impl Routines for LinkedRoutines {
    fn loopysum(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        out.flush()?;
        // SAFETY: plain integer in, integer out; the symbol takes no pointers.
        Ok(unsafe { loopysum(n) })
    }

    fn even(&mut self, n: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        out.flush()?;
        // SAFETY: as above.
        Ok(unsafe { even(n) })
    }

    fn coco(&mut self, a: i32, b: i32, out: &mut dyn Write) -> Result<i32, RoutineError> {
        // The routine prints through `print`, so earlier sink output goes first.
        out.flush()?;
        // SAFETY: as above; `coco` only calls back into `print`.
        Ok(unsafe { coco(a, b) })
    }
}
