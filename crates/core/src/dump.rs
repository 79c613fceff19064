//! Human-readable failure dumps: the failed search target, the complete
//! current instruction listing, and the other rewrite passes applied to
//! the same method.

use crate::instruction::{Instruction, TargetMethod};
use std::fmt::Write as _;
use std::path::Path;

/// Renders the diagnostic listing produced when a search fails.
pub fn render_dump(search: &str, instructions: &[Instruction], applied: &[String]) -> String {
    let mut out = String::new();
    out.push_str("Searching for:\n");
    for line in search.lines() {
        let _ = writeln!(out, "\t{line}");
    }

    out.push_str("\n<-- START OF INSTRUCTION LIST -->\n");
    for (index, ins) in instructions.iter().enumerate() {
        let _ = writeln!(out, "{index:04}  {ins}");
    }
    out.push_str("<-- END OF INSTRUCTION LIST -->\n");

    if !applied.is_empty() {
        out.push_str("\nApplied passes:\n");
        for pass in applied {
            let _ = writeln!(out, "\t{pass}");
        }
    }
    out
}

/// Writes the dump next to the process as `<Owner>_<name>.dump`.
///
/// Best-effort and fire-and-forget: this only runs on the failure path,
/// and an unwritable sink must not mask the search error being reported.
pub fn export_dump(dir: &Path, target: &TargetMethod, dump: &str) {
    let file_name = format!("{}.dump", sanitize(&target.to_string()));
    let path = dir.join(file_name);
    match std::fs::write(&path, dump) {
        Ok(()) => tracing::info!("exported instruction listing to {}", path.display()),
        Err(err) => tracing::warn!("failed to export instruction listing to {}: {err}", path.display()),
    }
}

/// Replaces path-hostile characters so the target identity can name a file.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
