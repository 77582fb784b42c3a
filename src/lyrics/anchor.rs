//! Keeping the active lyric line vertically centered.

use super::layout::LyricsLayout;

/// Scroll offset (in rows) that centers a line of `line_height` rows starting
/// at `line_offset_top` inside a container showing `container_height` rows.
///
/// The result is not clamped and may be negative for lines near the top;
/// clamping is the job of whoever applies the scroll.
pub fn target_scroll_top(line_offset_top: usize, line_height: usize, container_height: u16) -> i32 {
    line_offset_top as i32 - i32::from(container_height) / 2 + line_height as i32 / 2
}

/// The lyrics panel as currently laid out on screen.
#[derive(Debug, Copy, Clone)]
pub struct Viewport<'a> {
    pub layout: &'a LyricsLayout,
    /// Visible rows inside the panel.
    pub height: u16,
}

/// Remembers which line was last centered and only asks for a new scroll
/// when the active line changes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollAnchor {
    anchored: Option<usize>,
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line index the last scroll request centered, if any.
    pub fn anchored(&self) -> Option<usize> {
        self.anchored
    }

    /// Forget the anchored line so the next `follow` recenters.
    pub fn reset(&mut self) {
        self.anchored = None;
    }

    /// Return a scroll target when `active` differs from the anchored line.
    ///
    /// Nothing is requested (and nothing is recorded) when there is no active
    /// line or the panel geometry is unavailable. That way the request is made
    /// as soon as the panel becomes visible again.
    pub fn follow(&mut self, active: Option<usize>, viewport: Option<Viewport<'_>>) -> Option<i32> {
        let index = active?;
        if self.anchored == Some(index) {
            return None;
        }

        let viewport = viewport.filter(|v| v.height > 0)?;
        let line = viewport.layout.line(index)?;

        self.anchored = Some(index);
        Some(target_scroll_top(line.offset_top, line.height, viewport.height))
    }
}

/// Animated scroll offset of the lyrics panel.
///
/// `request` sets a (clamped) target; each `tick` moves the current offset a
/// fraction of the remaining distance towards it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothScroll {
    position: f32,
    target: f32,
}

impl SmoothScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new target offset, clamped to `[0, content_height - container_height]`.
    pub fn request(&mut self, target: i32, content_height: usize, container_height: u16) {
        let max = content_height.saturating_sub(container_height as usize) as f32;
        self.target = (target as f32).clamp(0.0, max);
    }

    /// Snap straight to the current target.
    pub fn finish(&mut self) {
        self.position = self.target;
    }

    /// Jump to the top, e.g. when a new track is loaded.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.target = 0.0;
    }

    /// Advance the animation by one frame. `easing` is the fraction of the
    /// remaining distance covered per frame; values >= 1 jump immediately.
    pub fn tick(&mut self, easing: f32) {
        let remaining = self.target - self.position;
        if remaining.abs() < 0.5 || easing >= 1.0 {
            self.position = self.target;
            return;
        }
        self.position += remaining * easing.max(0.01);
    }

    pub fn is_settled(&self) -> bool {
        self.position == self.target
    }

    pub fn target(&self) -> u16 {
        self.target.round() as u16
    }

    /// Offset to render with, in whole rows.
    pub fn offset(&self) -> u16 {
        self.position.round().max(0.0) as u16
    }
}
