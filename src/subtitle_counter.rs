use anyhow::{anyhow, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Counting translatable cues in raw SRT text

// @const: Text that is exactly one bracketed span, e.g. "[music playing]"
static ANNOTATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\[\]]*\]$").unwrap());

/// Approximate cues per kilobyte, measured over a corpus of English SRT files.
/// Seeds the fallback heuristic when structured counting fails.
const CUES_PER_KILOBYTE: f64 = 13.6;

/// Count the translatable cues in a raw subtitle document.
///
/// Accepts a leading BOM and any mix of CRLF/LF/CR line endings. A cue block
/// needs an index line, a timing line containing `-->`, and at least one text
/// line; blocks whose text is purely a bracketed annotation (sound effects,
/// music tags) are skipped since the backend does not translate them.
///
/// Never fails: if the document is non-empty but structured counting finds no
/// cues at all, a size-based heuristic supplies a rough count so the duration
/// estimator always has a usable input.
pub fn count(raw: &str) -> usize {
    match count_structured(raw) {
        Ok(count) => count,
        Err(e) => {
            let fallback = fallback_count(raw);
            warn!(
                "Structured cue counting failed ({}), falling back to size heuristic: {} cues",
                e, fallback
            );
            fallback
        }
    }
}

/// Structured pass: split into cue blocks and count the translatable ones.
fn count_structured(raw: &str) -> Result<usize> {
    let text = normalize(raw);

    if text.trim().is_empty() {
        return Ok(0);
    }

    let mut cue_blocks = 0;
    let mut translatable = 0;

    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let lines: Vec<&str> = block.lines().collect();

        // Valid cue: index line, timing line, at least one text line
        if lines.len() < 3 || !lines[1].contains("-->") {
            continue;
        }
        cue_blocks += 1;

        let body = lines[2..].join("\n");
        if ANNOTATION_REGEX.is_match(body.trim()) {
            debug!("Skipping annotation-only cue: {}", body.trim());
            continue;
        }
        translatable += 1;
    }

    if cue_blocks == 0 {
        return Err(anyhow!("no valid cue blocks found in non-empty document"));
    }

    Ok(translatable)
}

/// Terminal recovery path: estimate the cue count from the document size.
fn fallback_count(raw: &str) -> usize {
    (raw.len() as f64 / 1024.0 * CUES_PER_KILOBYTE).ceil() as usize
}

/// Strip a leading BOM and normalize all line-ending variants to LF.
fn normalize(raw: &str) -> String {
    let without_bom = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    without_bom.replace("\r\n", "\n").replace('\r', "\n")
}
