#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
}

impl Theme {
    pub fn toggle(&mut self) {
        self.dark = !self.dark;
    }

    pub fn body_class(&self) -> &'static str {
        if self.dark {
            "dark"
        } else {
            ""
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.dark {
            "🌞 Light Mode"
        } else {
            "🌙 Dark Mode"
        }
    }
}
