/// Input, visibility and navigation state of the palette.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteState {
    shown: bool,
    input: String,
    keyboard_index: usize,
    hover_index: Option<usize>,
}

impl PaletteState {
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    /// Returns the new visibility.
    pub fn toggle(&mut self) -> bool {
        self.shown = !self.shown;
        self.shown
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.keyboard_index = 0;
    }

    pub fn keyboard_index(&self) -> usize {
        self.keyboard_index
    }

    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    /// The hovered result wins over the keyboard selection.
    pub fn active_result_index(&self) -> usize {
        self.hover_index.unwrap_or(self.keyboard_index)
    }

    pub fn arrow_up(&mut self) {
        self.keyboard_index = self.keyboard_index.saturating_sub(1);
        self.hover_index = None;
    }

    pub fn arrow_down(&mut self, max_index: usize) {
        self.keyboard_index = if self.keyboard_index < max_index {
            self.keyboard_index + 1
        } else {
            max_index
        };
        self.hover_index = None;
    }

    pub fn mouse_enter_result(&mut self, index: usize) {
        self.hover_index = Some(index);
    }

    pub fn mouse_leave_result(&mut self) {
        self.hover_index = None;
    }

    /// Applied whenever a flow is entered or left.
    pub fn reset_session(&mut self) {
        self.input.clear();
        self.keyboard_index = 0;
        self.hover_index = None;
    }

    pub fn is_squeak(&self) -> bool {
        self.input.trim().eq_ignore_ascii_case("squeak")
    }
}
