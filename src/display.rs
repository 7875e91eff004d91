//! Verbose Dumps
//!
//! Deterministic human-readable renderings of authentication paths,
//! ladders, and rungs. Output is plain text with lower-case hex and a
//! fixed field order, suitable for diffing across runs.

use std::fmt::Write;

use crate::mtl::{AuthPath, Ladder, Randomizer, Rung};

fn push_buffer(out: &mut String, label: &str, bytes: &[u8]) {
    let _ = writeln!(out, "    {:>15} - {}", label, hex::encode(bytes));
}

fn push_number(out: &mut String, label: &str, value: u32) {
    let _ = writeln!(out, "    {:>15} - {}", label, value);
}

/// Render an authentication path (and its randomizer, when present)
pub fn describe_auth_path(auth: &AuthPath, randomizer: Option<&Randomizer>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, " ======== Authentication Path ========");
    if let Some(randomizer) = randomizer {
        push_buffer(&mut out, "randomizer", &randomizer.value);
    }
    push_number(&mut out, "flags", u32::from(auth.flags));
    push_buffer(&mut out, "sid", auth.sid.as_bytes());
    push_number(&mut out, "leaf index", auth.leaf_index);
    push_number(&mut out, "rung left", auth.rung_left);
    push_number(&mut out, "rung right", auth.rung_right);
    push_number(&mut out, "sibling count", u32::from(auth.sibling_hash_count()));
    for (level, sibling) in auth.sibling_hashes.iter().enumerate() {
        push_buffer(&mut out, &format!("sibling {}", level), sibling);
    }
    out
}

/// Render one rung as `label (left,right) hash`
pub fn describe_rung(rung: &Rung) -> String {
    format!(
        "    rung ({},{}) {}",
        rung.left,
        rung.right,
        hex::encode(&rung.hash)
    )
}

/// Render a ladder with one line per rung
pub fn describe_ladder(ladder: &Ladder) -> String {
    let mut out = String::new();
    let _ = writeln!(out, " ======== Ladder ========");
    push_number(&mut out, "flags", u32::from(ladder.flags));
    push_buffer(&mut out, "sid", ladder.sid.as_bytes());
    push_number(&mut out, "rung count", u32::from(ladder.rung_count()));
    for rung in &ladder.rungs {
        let _ = writeln!(out, "{}", describe_rung(rung));
    }
    out
}
