//! Minimal LRC reader.
//!
//! Supports `[mm:ss]`, `[mm:ss.xx]` and `[mm:ss.xxx]` time tags, several tags
//! on one line, and the `[offset:±ms]` header. Other header tags (`[ar:]`,
//! `[ti:]`, ...) are ignored.

use std::path::Path;

use tracing::{debug, warn};

use crate::lyrics::LyricLine;

use super::error::CatalogError;

/// Parse LRC text into lyric lines sorted by time.
///
/// Lines sharing a timestamp keep their file order.
pub fn parse_lrc(text: &str) -> Vec<LyricLine> {
    let mut offset_ms: i64 = 0;
    let mut lines: Vec<LyricLine> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let mut rest = raw.trim();
        let mut times: Vec<f64> = Vec::new();

        while let Some(after_open) = rest.strip_prefix('[') {
            let Some(close) = after_open.find(']') else {
                break;
            };
            let tag = &after_open[..close];
            if let Some(t) = parse_timestamp(tag) {
                times.push(t);
            } else if let Some(v) = tag.strip_prefix("offset:") {
                match v.trim().parse::<i64>() {
                    Ok(ms) => offset_ms = ms,
                    Err(_) => warn!(line = lineno + 1, value = v, "Ignoring bad LRC offset"),
                }
            } else if tag.starts_with(|c: char| c.is_ascii_digit()) {
                warn!(line = lineno + 1, tag, "Skipping unreadable LRC time tag");
            } else {
                debug!(line = lineno + 1, tag, "Skipping LRC header tag");
            }
            rest = &after_open[close + 1..];
        }

        let text = rest.trim();
        for t in times {
            lines.push(LyricLine::new(t, text));
        }
    }

    if offset_ms != 0 {
        // A positive offset makes lyrics show up earlier.
        let shift = offset_ms as f64 / 1000.0;
        for l in &mut lines {
            l.time = (l.time - shift).max(0.0);
        }
    }

    lines.sort_by(|a, b| a.time.total_cmp(&b.time));
    lines
}

/// Read and parse an LRC file.
pub fn load_lrc(path: &Path) -> Result<Vec<LyricLine>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    Ok(parse_lrc(&text))
}

/// Parse `mm:ss(.frac)` into seconds.
fn parse_timestamp(tag: &str) -> Option<f64> {
    let (minutes, seconds) = tag.split_once(':')?;
    if minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    let t = minutes as f64 * 60.0 + seconds;
    t.is_finite().then_some(t)
}
