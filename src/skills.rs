use std::{cell::Cell, rc::Rc};

use crate::schedule::Scheduler;

pub const PROGRESS_ATTRIBUTE: &str = "data-progress";

pub trait ProgressBar: 'static {
    fn fill_to(&self, percent: f64);
}

/// Parses a `data-progress` value into a width percentage in `0..=100`.
pub fn parse_progress(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0))
}

pub fn section_reached(section_top: f64, viewport_height: f64) -> bool {
    section_top < viewport_height / 2.0
}

/// Fills every bar once per page load, staggered in document order. A bar
/// without a target keeps its slot in the stagger.
pub struct SkillBarAnimator<S: Scheduler, B: ProgressBar> {
    scheduler: S,
    bars: Vec<(Rc<B>, Option<f64>)>,
    stagger_ms: u32,
    animated: Cell<bool>,
}

impl<S: Scheduler, B: ProgressBar> SkillBarAnimator<S, B> {
    pub fn new(scheduler: S, bars: Vec<(B, Option<f64>)>, stagger_ms: u32) -> Self {
        Self {
            scheduler,
            bars: bars
                .into_iter()
                .map(|(bar, target)| (Rc::new(bar), target))
                .collect(),
            stagger_ms,
            animated: Cell::new(false),
        }
    }

    #[cfg(test)]
    pub fn animated(&self) -> bool {
        self.animated.get()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns `true` only on the call that starts the animation.
    pub fn check(&self, section_top: f64, viewport_height: f64) -> bool {
        if self.animated.get() || !section_reached(section_top, viewport_height) {
            return false;
        }
        self.animated.set(true);

        let mut delay_ms: u32 = 0;
        for (bar, target) in &self.bars {
            if let Some(target) = *target {
                let bar = Rc::clone(bar);
                self.scheduler.defer(delay_ms, move || bar.fill_to(target));
            }
            delay_ms = delay_ms.saturating_add(self.stagger_ms);
        }
        true
    }
}
