use super::model::LyricLine;

/// Return the index of the line that is active at `current_time` (seconds).
///
/// The active line is the last one whose timestamp does not exceed
/// `current_time`. `None` means no line is active: `lines` is empty, playback
/// has not reached the first timestamp yet, or `current_time` is NaN.
///
/// The scan is linear. Lyric lists are short and this runs a handful of times
/// per second, so there is nothing to gain from bisecting. For input whose
/// timestamps are not sorted the result is still well defined: the greatest
/// index whose timestamp is `<= current_time`.
pub fn active_line_index(lines: &[LyricLine], current_time: f64) -> Option<usize> {
    if current_time.is_nan() {
        return None;
    }
    lines.iter().rposition(|l| l.time <= current_time)
}
