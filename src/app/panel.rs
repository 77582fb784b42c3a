use crate::config::UiSettings;
use crate::lyrics::{LyricsLayout, ScrollAnchor, SmoothScroll, Viewport};

/// Which track the panel is laid out for: (album, track).
pub type PanelKey = (usize, usize);

/// Scroll and layout state of the lyrics panel.
///
/// The layout is rebuilt when the shown track or the panel width changes; the
/// anchor and scroll position are reset whenever the shown track changes.
#[derive(Debug, Default)]
pub struct LyricsPanel {
    key: Option<PanelKey>,
    layout: Option<LyricsLayout>,
    height: u16,
    anchor: ScrollAnchor,
    scroll: SmoothScroll,
}

impl LyricsPanel {
    pub fn layout(&self) -> Option<&LyricsLayout> {
        self.layout.as_ref()
    }

    pub fn offset(&self) -> u16 {
        self.scroll.offset()
    }

    pub fn anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    /// Recenter on the next sync, e.g. after the panel was reopened or the
    /// terminal was resized.
    pub fn recenter(&mut self) {
        self.anchor.reset();
    }

    /// Drop layout and scroll state entirely.
    pub fn reset(&mut self) {
        self.key = None;
        self.layout = None;
        self.anchor.reset();
        self.scroll.reset();
    }

    /// Bring the panel up to date for one frame.
    ///
    /// `area` is the inner size of the panel (`None` when it is not shown),
    /// `lines` yields the text rows for `key`, `active` is the active line.
    pub fn sync<'a, I>(
        &mut self,
        key: Option<PanelKey>,
        area: Option<(u16, u16)>,
        lines: impl FnOnce() -> I,
        active: Option<usize>,
        ui: &UiSettings,
    ) where
        I: IntoIterator<Item = &'a str>,
    {
        if key != self.key {
            self.reset();
            self.key = key;
        }

        let Some((width, height)) = area.filter(|(w, h)| *w > 0 && *h > 0) else {
            // Panel hidden: keep the scroll position, recenter once it is back.
            self.height = 0;
            return;
        };

        if self.height != height {
            self.anchor.reset();
        }
        self.height = height;

        if self.layout.as_ref().map(LyricsLayout::width) != Some(width) {
            self.layout = Some(LyricsLayout::build(lines(), width));
            self.anchor.reset();
        }

        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        let viewport = Viewport { layout, height };
        if let Some(target) = self.anchor.follow(active, Some(viewport)) {
            self.scroll.request(target, layout.content_height(), height);
            if !ui.smooth_scroll {
                self.scroll.finish();
            }
        }

        if ui.smooth_scroll {
            self.scroll.tick(ui.scroll_easing);
        } else {
            self.scroll.finish();
        }
    }
}
