//! Text rendering for debugger frames. Pure: no terminal access.

use std::fmt::Write;

use crate::{RegisterStore, Snapshot};

/// Command list shown by `help`.
pub const HELP_TEXT: &str = "\
Commands:
  <enter>, step       Execute the pending command
  continue            Run to the end without rendering
  states              List every snapshot with its index
  rollback <index>    Restore the engine to snapshot <index>
  reset               Same as `rollback 0`
  suspenduntil <line> Run silently until <line> is reached (0 = never)
  help                Show this list
  exit                End the session";

const CURRENT_MARKER: &str = "->";

/// Renders the register store followed by the last `lines` snapshots.
///
/// The newest snapshot (the command about to execute) is marked with `->`.
/// Frames shorter than `lines` are padded with blank rows so every frame has
/// `lines + 2` rows.
#[must_use]
pub fn render_frame(history: &[Snapshot], registers: &RegisterStore, lines: usize) -> String {
    let mut frame = format!("registers: {registers}\n\n");

    let start = history.len().saturating_sub(lines);
    let shown = history.len() - start;
    let newest = history.len().checked_sub(1);

    for (index, snapshot) in history.iter().enumerate().skip(start) {
        let marker = if Some(index) == newest {
            CURRENT_MARKER
        } else {
            ""
        };
        let _ = writeln!(frame, "{marker:>2} #{index:<4} {}", snapshot.command);
    }
    for _ in shown..lines {
        frame.push('\n');
    }
    frame
}

/// Renders every snapshot with its index, one per row.
#[must_use]
pub fn render_states(history: &[Snapshot]) -> String {
    let mut listing = String::new();
    for (index, snapshot) in history.iter().enumerate() {
        let _ = writeln!(listing, "#{index:<4} {snapshot}");
    }
    if listing.is_empty() {
        listing.push_str("no snapshots recorded\n");
    }
    listing
}
