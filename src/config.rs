use serde::Serialize;

use crate::logging::{LogLevel, DEFAULT_LOG_LEVEL};

pub const DEFAULT_NOTIFICATION_DURATION_MS: u32 = 4_000;
pub const DEFAULT_NOTIFICATION_EXIT_MS: u32 = 300;
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u32 = 16;
pub const DEFAULT_REVEAL_OFFSET_PX: f64 = 100.0;
pub const DEFAULT_NAVBAR_FALLBACK_HEIGHT_PX: f64 = 70.0;
pub const DEFAULT_SCROLL_MARGIN_PX: f64 = 20.0;
pub const DEFAULT_ACTIVE_PROBE_OFFSET_PX: f64 = 100.0;
pub const DEFAULT_NAVBAR_SCROLLED_THRESHOLD_PX: f64 = 50.0;
pub const DEFAULT_SKILL_BAR_START_DELAY_MS: u32 = 500;
pub const DEFAULT_SKILL_BAR_STAGGER_MS: u32 = 100;
pub const DEFAULT_INITIAL_CHECK_DELAY_MS: u32 = 100;
pub const DEFAULT_MAIL_HANDOFF_DELAY_MS: u32 = 1_000;
pub const DEFAULT_FORM_RESET_DELAY_MS: u32 = 3_000;
pub const DEFAULT_CONTACT_RECIPIENT: &str = "rkumarhk@outlook.com";
pub const DEFAULT_SIGNATURE: &str = "This message was sent from Rohit Kumar's portfolio website.";

const NOTIFICATION_DURATION_MS_BOUNDS: (u32, u32) = (500, 60_000);
const NOTIFICATION_EXIT_MS_BOUNDS: (u32, u32) = (0, 5_000);
const SCROLL_DEBOUNCE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const PIXEL_OFFSET_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const DELAY_MS_BOUNDS: (u32, u32) = (0, 30_000);
const STAGGER_MS_BOUNDS: (u32, u32) = (0, 2_000);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settings {
    pub notification_duration_ms: u32,
    pub notification_exit_ms: u32,
    pub scroll_debounce_ms: u32,
    pub reveal_offset_px: f64,
    pub navbar_fallback_height_px: f64,
    pub scroll_margin_px: f64,
    pub active_probe_offset_px: f64,
    pub navbar_scrolled_threshold_px: f64,
    pub skill_bar_start_delay_ms: u32,
    pub skill_bar_stagger_ms: u32,
    pub initial_check_delay_ms: u32,
    pub mail_handoff_delay_ms: u32,
    pub form_reset_delay_ms: u32,
    pub contact_recipient: String,
    #[serde(skip)]
    pub signature: String,
    #[serde(serialize_with = "serialize_log_level")]
    pub log_level: LogLevel,
}

fn serialize_log_level<S: serde::Serializer>(level: &LogLevel, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.as_str())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            notification_exit_ms: DEFAULT_NOTIFICATION_EXIT_MS,
            scroll_debounce_ms: DEFAULT_SCROLL_DEBOUNCE_MS,
            reveal_offset_px: DEFAULT_REVEAL_OFFSET_PX,
            navbar_fallback_height_px: DEFAULT_NAVBAR_FALLBACK_HEIGHT_PX,
            scroll_margin_px: DEFAULT_SCROLL_MARGIN_PX,
            active_probe_offset_px: DEFAULT_ACTIVE_PROBE_OFFSET_PX,
            navbar_scrolled_threshold_px: DEFAULT_NAVBAR_SCROLLED_THRESHOLD_PX,
            skill_bar_start_delay_ms: DEFAULT_SKILL_BAR_START_DELAY_MS,
            skill_bar_stagger_ms: DEFAULT_SKILL_BAR_STAGGER_MS,
            initial_check_delay_ms: DEFAULT_INITIAL_CHECK_DELAY_MS,
            mail_handoff_delay_ms: DEFAULT_MAIL_HANDOFF_DELAY_MS,
            form_reset_delay_ms: DEFAULT_FORM_RESET_DELAY_MS,
            contact_recipient: DEFAULT_CONTACT_RECIPIENT.to_string(),
            signature: DEFAULT_SIGNATURE.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Settings {
    /// Resolves settings from `data-*` attributes. `lookup` receives the
    /// attribute name (e.g. `data-scroll-debounce-ms`) and returns its raw
    /// value when present.
    pub fn from_attributes(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let u32_attr = |name: &str, default: u32, bounds: (u32, u32)| {
            parse_u32_with_bounds(lookup(name).as_deref(), default, bounds)
        };
        let px_attr = |name: &str, default: f64| {
            parse_f64_with_bounds(lookup(name).as_deref(), default, PIXEL_OFFSET_BOUNDS)
        };

        let notification_duration_ms = u32_attr(
            "data-notification-duration-ms",
            DEFAULT_NOTIFICATION_DURATION_MS,
            NOTIFICATION_DURATION_MS_BOUNDS,
        );
        let notification_exit_ms = u32_attr(
            "data-notification-exit-ms",
            DEFAULT_NOTIFICATION_EXIT_MS,
            NOTIFICATION_EXIT_MS_BOUNDS,
        );
        let scroll_debounce_ms = u32_attr(
            "data-scroll-debounce-ms",
            DEFAULT_SCROLL_DEBOUNCE_MS,
            SCROLL_DEBOUNCE_MS_BOUNDS,
        );
        let skill_bar_start_delay_ms = u32_attr(
            "data-skill-bar-start-delay-ms",
            DEFAULT_SKILL_BAR_START_DELAY_MS,
            DELAY_MS_BOUNDS,
        );
        let skill_bar_stagger_ms = u32_attr(
            "data-skill-bar-stagger-ms",
            DEFAULT_SKILL_BAR_STAGGER_MS,
            STAGGER_MS_BOUNDS,
        );
        let initial_check_delay_ms = u32_attr(
            "data-initial-check-delay-ms",
            DEFAULT_INITIAL_CHECK_DELAY_MS,
            DELAY_MS_BOUNDS,
        );
        let mail_handoff_delay_ms = u32_attr(
            "data-mail-handoff-delay-ms",
            DEFAULT_MAIL_HANDOFF_DELAY_MS,
            DELAY_MS_BOUNDS,
        );
        // The reset always lands after the handoff it follows.
        let form_reset_delay_ms = u32_attr(
            "data-form-reset-delay-ms",
            DEFAULT_FORM_RESET_DELAY_MS,
            DELAY_MS_BOUNDS,
        )
        .max(mail_handoff_delay_ms);

        let contact_recipient = lookup("data-contact-recipient")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty() && value.contains('@'))
            .unwrap_or_else(|| DEFAULT_CONTACT_RECIPIENT.to_string());
        let log_level = lookup("data-log-level")
            .map(|value| LogLevel::parse(&value, DEFAULT_LOG_LEVEL))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            notification_duration_ms,
            notification_exit_ms,
            scroll_debounce_ms,
            reveal_offset_px: px_attr("data-reveal-offset-px", DEFAULT_REVEAL_OFFSET_PX),
            navbar_fallback_height_px: px_attr(
                "data-navbar-fallback-height-px",
                DEFAULT_NAVBAR_FALLBACK_HEIGHT_PX,
            ),
            scroll_margin_px: px_attr("data-scroll-margin-px", DEFAULT_SCROLL_MARGIN_PX),
            active_probe_offset_px: px_attr(
                "data-active-probe-offset-px",
                DEFAULT_ACTIVE_PROBE_OFFSET_PX,
            ),
            navbar_scrolled_threshold_px: px_attr(
                "data-navbar-scrolled-threshold-px",
                DEFAULT_NAVBAR_SCROLLED_THRESHOLD_PX,
            ),
            skill_bar_start_delay_ms,
            skill_bar_stagger_ms,
            initial_check_delay_ms,
            mail_handoff_delay_ms,
            form_reset_delay_ms,
            contact_recipient,
            signature: DEFAULT_SIGNATURE.to_string(),
            log_level,
        }
    }
}

fn parse_u32_with_bounds(value: Option<&str>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_f64_with_bounds(value: Option<&str>, default: f64, bounds: (f64, f64)) -> f64 {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}
