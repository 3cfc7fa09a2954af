//! Click-intent policy for listing rows.
//!
//! Decides what a click on a row means before it reaches the selection model.
//! A click with a modifier key never navigates; the selection model itself
//! does not assume navigation follows a click.

use super::SelectionModel;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl ClickModifiers {
    /// No modifier held.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// User preferences that change how rows react to clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickSettings {
    /// Open entries on double click; single clicks do nothing.
    pub open_with_double_click: bool,
    /// Single click toggles the row instead of opening it.
    pub toggle_with_click: bool,
}

/// What a click should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickIntent {
    /// Do nothing.
    Ignore,
    /// Open the entry.
    Navigate,
    /// Flip the row's membership in the selection.
    Toggle,
    /// Select only this row, then open it.
    SelectAndOpen,
    /// Open the image gallery at this entry.
    OpenGallery,
}

impl ClickIntent {
    /// Apply the selection side of this intent to `model`.
    ///
    /// Returns true when the caller should go on to open the entry.
    pub fn apply(self, model: &mut SelectionModel, index: usize) -> bool {
        match self {
            ClickIntent::Ignore | ClickIntent::OpenGallery => false,
            ClickIntent::Navigate => true,
            ClickIntent::Toggle => {
                model.toggle(index, true, false);
                false
            }
            ClickIntent::SelectAndOpen => {
                model.toggle(index, true, true);
                true
            }
        }
    }
}

/// Intent of a single click on a row.
pub fn row_click(modifiers: ClickModifiers, settings: ClickSettings) -> ClickIntent {
    if settings.open_with_double_click || modifiers.any() {
        return ClickIntent::Ignore;
    }
    if settings.toggle_with_click {
        ClickIntent::Toggle
    } else {
        ClickIntent::Navigate
    }
}

/// Intent of a double click on a row.
pub fn row_double_click(settings: ClickSettings) -> ClickIntent {
    if settings.open_with_double_click {
        ClickIntent::SelectAndOpen
    } else {
        ClickIntent::Ignore
    }
}

/// Intent of a click on a row's icon. Only images react.
pub fn icon_click(modifiers: ClickModifiers, is_image: bool) -> ClickIntent {
    if !is_image || modifiers.any() {
        ClickIntent::Ignore
    } else {
        ClickIntent::OpenGallery
    }
}
