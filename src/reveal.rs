pub const REVEALED_CLASS: &str = "visible";
pub const TAGGED_SELECTOR: &str = ".fade-in, .slide-in-left, .slide-in-right";
pub const PENDING_SELECTOR: &str =
    ".fade-in:not(.visible), .slide-in-left:not(.visible), .slide-in-right:not(.visible)";
pub const OBSERVER_THRESHOLD: f64 = 0.1;
pub const OBSERVER_ROOT_MARGIN: &str = "0px 0px -50px 0px";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    FadeIn,
    SlideInLeft,
    SlideInRight,
}

impl Effect {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::SlideInLeft => "slide-in-left",
            Self::SlideInRight => "slide-in-right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPattern {
    Uniform(Effect),
    /// Even indices slide in from the left, odd ones from the right.
    Alternating,
}

#[derive(Clone, Copy, Debug)]
pub struct AnimationGroup {
    pub selector: &'static str,
    pub pattern: EffectPattern,
    pub stagger_ms: Option<u32>,
    /// Only the first match is tagged.
    pub single: bool,
}

pub const ANIMATION_GROUPS: [AnimationGroup; 6] = [
    AnimationGroup {
        selector: ".about-paragraph",
        pattern: EffectPattern::Uniform(Effect::FadeIn),
        stagger_ms: Some(100),
        single: false,
    },
    AnimationGroup {
        selector: ".stat-item",
        pattern: EffectPattern::Uniform(Effect::FadeIn),
        stagger_ms: Some(150),
        single: false,
    },
    AnimationGroup {
        selector: ".timeline-item",
        pattern: EffectPattern::Alternating,
        stagger_ms: Some(200),
        single: false,
    },
    AnimationGroup {
        selector: ".skill-category",
        pattern: EffectPattern::Uniform(Effect::FadeIn),
        stagger_ms: Some(100),
        single: false,
    },
    AnimationGroup {
        selector: ".contact-item",
        pattern: EffectPattern::Uniform(Effect::SlideInLeft),
        stagger_ms: Some(100),
        single: false,
    },
    AnimationGroup {
        selector: ".contact-form",
        pattern: EffectPattern::Uniform(Effect::SlideInRight),
        stagger_ms: None,
        single: true,
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub effect: Effect,
    /// CSS `transition-delay` value, if the group staggers.
    pub transition_delay: Option<String>,
}

impl AnimationGroup {
    pub fn assignment(&self, index: usize) -> Assignment {
        let effect = match self.pattern {
            EffectPattern::Uniform(effect) => effect,
            EffectPattern::Alternating if index % 2 == 0 => Effect::SlideInLeft,
            EffectPattern::Alternating => Effect::SlideInRight,
        };
        let transition_delay = self.stagger_ms.map(|step| {
            let delay = u64::from(step).saturating_mul(index as u64);
            format!("{delay}ms")
        });

        Assignment {
            effect,
            transition_delay,
        }
    }
}

/// An element taking part in the reveal pipeline.
pub trait Revealable {
    /// Top edge relative to the visible viewport.
    fn viewport_top(&self) -> f64;

    fn is_revealed(&self) -> bool;

    fn reveal(&self);
}

pub fn should_reveal(top: f64, viewport_height: f64, offset: f64) -> bool {
    top < viewport_height - offset
}

/// Reveals every pending element whose top edge has entered the viewport and
/// returns how many were newly revealed. Revealed elements are never touched.
pub fn reveal_in_view<E: Revealable>(elements: &[E], viewport_height: f64, offset: f64) -> usize {
    let mut revealed = 0;
    for element in elements {
        if element.is_revealed() {
            continue;
        }
        if should_reveal(element.viewport_top(), viewport_height, offset) {
            element.reveal();
            revealed += 1;
        }
    }
    revealed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeElement {
        top: Cell<f64>,
        revealed: Cell<bool>,
    }

    impl FakeElement {
        fn at(top: f64) -> Self {
            Self {
                top: Cell::new(top),
                revealed: Cell::new(false),
            }
        }
    }

    impl Revealable for FakeElement {
        fn viewport_top(&self) -> f64 {
            self.top.get()
        }

        fn is_revealed(&self) -> bool {
            self.revealed.get()
        }

        fn reveal(&self) {
            self.revealed.set(true);
        }
    }

    fn scroll_by(elements: &[FakeElement], delta: f64) {
        for element in elements {
            element.top.set(element.top.get() - delta);
        }
    }

    #[test]
    fn threshold_is_strictly_above_viewport_minus_offset() {
        assert!(should_reveal(599.0, 700.0, 100.0));
        assert!(!should_reveal(600.0, 700.0, 100.0));
        assert!(should_reveal(-2_000.0, 700.0, 100.0));
    }

    #[test]
    fn only_elements_in_view_are_revealed() {
        let elements = [FakeElement::at(100.0), FakeElement::at(650.0), FakeElement::at(1_500.0)];

        assert_eq!(reveal_in_view(&elements, 700.0, 100.0), 1);
        assert!(elements[0].is_revealed());
        assert!(!elements[1].is_revealed());
        assert!(!elements[2].is_revealed());
    }

    #[test]
    fn revealed_elements_stay_revealed_under_any_scroll() {
        let elements = [FakeElement::at(300.0), FakeElement::at(900.0), FakeElement::at(1_800.0)];

        for delta in [0.0, 500.0, 1_200.0, -3_000.0, 4_000.0, -10_000.0] {
            let before: Vec<bool> = elements.iter().map(Revealable::is_revealed).collect();
            scroll_by(&elements, delta);
            reveal_in_view(&elements, 700.0, 100.0);

            for (was, element) in before.iter().zip(&elements) {
                assert!(!*was || element.is_revealed());
            }
        }
        assert!(elements.iter().all(Revealable::is_revealed));
    }

    #[test]
    fn rescanning_reveals_nothing_new() {
        let elements = [FakeElement::at(10.0), FakeElement::at(20.0)];
        assert_eq!(reveal_in_view(&elements, 700.0, 100.0), 2);
        assert_eq!(reveal_in_view(&elements, 700.0, 100.0), 0);
    }

    #[test]
    fn groups_stagger_by_index() {
        let stats = &ANIMATION_GROUPS[1];
        assert_eq!(stats.assignment(0).transition_delay.as_deref(), Some("0ms"));
        assert_eq!(stats.assignment(3).transition_delay.as_deref(), Some("450ms"));
        assert_eq!(stats.assignment(3).effect, Effect::FadeIn);
    }

    #[test]
    fn timeline_alternates_sides() {
        let timeline = ANIMATION_GROUPS
            .iter()
            .find(|group| group.selector == ".timeline-item")
            .expect("timeline group exists");

        assert_eq!(timeline.assignment(0).effect, Effect::SlideInLeft);
        assert_eq!(timeline.assignment(1).effect, Effect::SlideInRight);
        assert_eq!(timeline.assignment(2).effect, Effect::SlideInLeft);
        assert_eq!(timeline.assignment(2).transition_delay.as_deref(), Some("400ms"));
    }

    #[test]
    fn contact_form_is_single_and_unstaggered() {
        let form = ANIMATION_GROUPS
            .iter()
            .find(|group| group.selector == ".contact-form")
            .expect("contact form group exists");

        assert!(form.single);
        assert_eq!(
            form.assignment(0),
            Assignment {
                effect: Effect::SlideInRight,
                transition_delay: None,
            }
        );
    }
}
