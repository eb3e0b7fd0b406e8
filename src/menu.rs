use tracing::debug;

/// Marker applied to the page root while the navigation menu is hidden
pub const MENU_HIDDEN_MARKER: &str = "menu-hidden";

/// Open/closed state of the navigation menu.
///
/// Starts hidden. Each activation flips the state exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuToggle {
    hidden: bool,
}

impl Default for MenuToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuToggle {
    pub fn new() -> Self {
        Self { hidden: true }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Flip the menu; returns whether it is hidden afterwards
    pub fn toggle(&mut self) -> bool {
        self.hidden = !self.hidden;
        debug!(hidden = self.hidden, "Menu toggled");
        self.hidden
    }

    pub fn toggle_n(&mut self, n: usize) -> bool {
        for _ in 0..n {
            self.toggle();
        }
        self.hidden
    }

    /// The root marker derived from the state, if any
    pub fn marker(&self) -> Option<&'static str> {
        self.hidden.then_some(MENU_HIDDEN_MARKER)
    }
}
