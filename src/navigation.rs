use std::cell::Cell;

pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const FALLBACK_PROBE_OFFSET_PX: f64 = 150.0;

/// Inline style for one hamburger line. Empty strings clear the property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineStyle {
    pub transform: &'static str,
    pub opacity: &'static str,
}

const CLEARED: LineStyle = LineStyle {
    transform: "",
    opacity: "",
};

pub fn hamburger_line_style(index: usize, open: bool) -> LineStyle {
    if !open {
        return CLEARED;
    }

    match index {
        0 => LineStyle {
            transform: "rotate(45deg) translate(5px, 5px)",
            opacity: "",
        },
        1 => LineStyle {
            transform: "",
            opacity: "0",
        },
        2 => LineStyle {
            transform: "rotate(-45deg) translate(7px, -6px)",
            opacity: "",
        },
        _ => CLEARED,
    }
}

#[derive(Debug, Default)]
pub struct MenuState {
    open: Cell<bool>,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Flips the menu and returns the new state.
    pub fn toggle(&self) -> bool {
        let next = !self.open.get();
        self.open.set(next);
        next
    }

    /// Returns `true` when the menu was open.
    pub fn close(&self) -> bool {
        self.open.replace(false)
    }
}

/// Returns the section id an in-page link points at.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset that leaves the section `navbar_height + margin` below
/// the top of the viewport.
pub fn scroll_target(section_viewport_top: f64, page_y_offset: f64, navbar_height: f64, margin: f64) -> f64 {
    section_viewport_top + page_y_offset - navbar_height - margin
}

pub fn active_probe(scroll_y: f64, navbar_height: Option<f64>, probe_offset: f64) -> f64 {
    match navbar_height {
        Some(height) => scroll_y + height + probe_offset,
        None => scroll_y + FALLBACK_PROBE_OFFSET_PX,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, probe: f64) -> bool {
        probe >= self.top && probe < self.top + self.height
    }
}

/// Section whose span contains `probe`. Sections are visited in document
/// order and the last match wins; `None` leaves the current highlight as is.
pub fn active_section(sections: &[SectionSpan], probe: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|section| section.contains(probe))
        .last()
        .map(|section| section.id.as_str())
}

pub fn navbar_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}
