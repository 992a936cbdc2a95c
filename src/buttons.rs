use serde::Serialize;

/// A single inline button: visible label plus callback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    pub callback_data: String,
}

/// Rows of buttons, top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ButtonMenu {
    pub rows: Vec<Vec<Button>>,
}

impl ButtonMenu {
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Default)]
pub struct ButtonMaker {
    buttons: Vec<Button>,
}

impl ButtonMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback button
    pub fn ibutton(&mut self, text: impl Into<String>, callback_data: impl Into<String>) {
        self.buttons.push(Button {
            text: text.into(),
            callback_data: callback_data.into(),
        });
    }

    /// Arrange the buttons into rows of `columns`; the last row may be shorter
    pub fn build_menu(self, columns: usize) -> ButtonMenu {
        let columns = columns.max(1);
        let rows = self
            .buttons
            .chunks(columns)
            .map(|row| row.to_vec())
            .collect();
        ButtonMenu { rows }
    }
}
