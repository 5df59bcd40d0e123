//! Progress output for the launcher CLI.
//!
//! All user-facing progress goes to stderr so the launched application's
//! stdout stays clean for scripting. Writers are passed in explicitly so
//! tests can capture output.

use std::io::Write;

/// Writes a single line to the given writer, ignoring write failures.
///
/// Progress output is best-effort; a broken pipe must not abort the
/// pipeline.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the message shown once all prerequisites are resolvable.
#[must_use]
pub fn tools_ready_message(count: usize) -> String {
    let plural = if count == 1 { "tool" } else { "tools" };
    format!("All {count} required {plural} available.")
}
