use std::cell::Cell;

pub const THEME_ATTRIBUTE: &str = "data-color-scheme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Describes what the toggle would do next, not the current state.
    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    /// Moon while light is active, sun while dark is active.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }

    pub fn changed_message(self) -> String {
        format!("Switched to {} theme", self.as_str())
    }
}

/// In-memory theme for the lifetime of the page.
#[derive(Debug, Default)]
pub struct ThemeState {
    current: Cell<Theme>,
}

impl ThemeState {
    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn toggle(&self) -> Theme {
        let next = self.current.get().toggled();
        self.current.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_light_and_alternates() {
        let state = ThemeState::default();
        assert_eq!(state.current(), Theme::Light);
        assert_eq!(state.toggle(), Theme::Dark);
        assert_eq!(state.toggle(), Theme::Light);
        assert_eq!(state.current(), Theme::Light);
    }

    #[test]
    fn label_and_icon_describe_the_other_theme() {
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark theme");
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light theme");
        assert_eq!(Theme::Light.icon_class(), "fas fa-moon");
        assert_eq!(Theme::Dark.icon_class(), "fas fa-sun");
    }

    #[test]
    fn changed_message_names_new_theme() {
        assert_eq!(Theme::Dark.changed_message(), "Switched to dark theme");
    }
}
