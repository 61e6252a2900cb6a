//! The editable config form pane.
//!
//! A cursor over a fixed field table, with text editing delegated to
//! `tui-input`. The backing [`FormState`] is kept in sync on every
//! keystroke, so submitting is just `state.to_update()` — no separate
//! "collect the widgets" step to get wrong.

use crossterm::event::{Event as CrosstermEvent, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use camdeck_core::FormState;

/// How a field is edited and rendered.
pub enum FieldKind {
    Text(fn(&mut FormState) -> &mut String),
    Flag(fn(&mut FormState) -> &mut bool),
}

pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
}

/// Field table in display order. Mirrors the device config payload;
/// the token row is write-only and always starts blank.
pub const FIELDS: &[Field] = &[
    Field {
        label: "Frame size",
        kind: FieldKind::Text(|s| &mut s.framesize),
    },
    Field {
        label: "JPEG quality",
        kind: FieldKind::Text(|s| &mut s.jpeg_quality),
    },
    Field {
        label: "Upload interval (s)",
        kind: FieldKind::Text(|s| &mut s.upload_interval_sec),
    },
    Field {
        label: "Auto upload",
        kind: FieldKind::Flag(|s| &mut s.auto_upload),
    },
    Field {
        label: "Upload URL",
        kind: FieldKind::Text(|s| &mut s.upload_url),
    },
    Field {
        label: "Upload token",
        kind: FieldKind::Text(|s| &mut s.upload_token),
    },
    Field {
        label: "White balance",
        kind: FieldKind::Flag(|s| &mut s.whitebal),
    },
    Field {
        label: "WB mode",
        kind: FieldKind::Text(|s| &mut s.wb_mode),
    },
    Field {
        label: "H-mirror",
        kind: FieldKind::Flag(|s| &mut s.hmirror),
    },
    Field {
        label: "V-flip",
        kind: FieldKind::Flag(|s| &mut s.vflip),
    },
    Field {
        label: "Brightness",
        kind: FieldKind::Text(|s| &mut s.brightness),
    },
    Field {
        label: "Contrast",
        kind: FieldKind::Text(|s| &mut s.contrast),
    },
    Field {
        label: "Saturation",
        kind: FieldKind::Text(|s| &mut s.saturation),
    },
    Field {
        label: "Sharpness",
        kind: FieldKind::Text(|s| &mut s.sharpness),
    },
    Field {
        label: "AWB gain",
        kind: FieldKind::Flag(|s| &mut s.awb_gain),
    },
    Field {
        label: "Gain control",
        kind: FieldKind::Flag(|s| &mut s.gain_ctrl),
    },
    Field {
        label: "Exposure control",
        kind: FieldKind::Flag(|s| &mut s.exposure_ctrl),
    },
    Field {
        label: "Gain ceiling",
        kind: FieldKind::Text(|s| &mut s.gainceiling),
    },
    Field {
        label: "AE level",
        kind: FieldKind::Text(|s| &mut s.ae_level),
    },
    Field {
        label: "Lens correction",
        kind: FieldKind::Flag(|s| &mut s.lens_corr),
    },
    Field {
        label: "Raw gamma",
        kind: FieldKind::Flag(|s| &mut s.raw_gma),
    },
    Field {
        label: "Black pixel correction",
        kind: FieldKind::Flag(|s| &mut s.bpc),
    },
    Field {
        label: "White pixel correction",
        kind: FieldKind::Flag(|s| &mut s.wpc),
    },
    Field {
        label: "Downsize crop",
        kind: FieldKind::Flag(|s| &mut s.dcw),
    },
    Field {
        label: "Color bar",
        kind: FieldKind::Flag(|s| &mut s.colorbar),
    },
    Field {
        label: "Special effect",
        kind: FieldKind::Text(|s| &mut s.special_effect),
    },
    Field {
        label: "Low-light boost",
        kind: FieldKind::Flag(|s| &mut s.low_light_boost),
    },
    Field {
        label: "AI host",
        kind: FieldKind::Text(|s| &mut s.ai_host),
    },
    Field {
        label: "AI model",
        kind: FieldKind::Text(|s| &mut s.ai_model),
    },
    Field {
        label: "AI prompt",
        kind: FieldKind::Text(|s| &mut s.ai_prompt),
    },
    Field {
        label: "AI num ctx",
        kind: FieldKind::Text(|s| &mut s.ai_num_ctx),
    },
    Field {
        label: "AI num predict",
        kind: FieldKind::Text(|s| &mut s.ai_num_predict),
    },
];

/// Cursor + edit buffer over [`FIELDS`].
pub struct FormView {
    state: FormState,
    cursor: usize,
    input: Input,
}

impl Default for FormView {
    fn default() -> Self {
        Self::new(FormState::default())
    }
}

impl FormView {
    pub fn new(state: FormState) -> Self {
        let mut view = Self {
            state,
            cursor: 0,
            input: Input::default(),
        };
        view.seed_input();
        view
    }

    /// Replace the backing state (a new device was selected). The cursor
    /// stays put so the operator doesn't lose their place in the form.
    pub fn replace(&mut self, state: FormState) {
        self.state = state;
        self.seed_input();
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.seed_input();
    }

    pub fn down(&mut self) {
        self.cursor = (self.cursor + 1).min(FIELDS.len() - 1);
        self.seed_input();
    }

    /// Flip the flag under the cursor; no-op on text fields.
    pub fn toggle(&mut self) {
        if let FieldKind::Flag(get) = &FIELDS[self.cursor].kind {
            let flag = get(&mut self.state);
            *flag = !*flag;
        }
    }

    /// Feed a key into the focused text field; no-op on flag fields.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let FieldKind::Text(get) = &FIELDS[self.cursor].kind {
            self.input.handle_event(&CrosstermEvent::Key(key));
            *get(&mut self.state) = self.input.value().to_owned();
        }
    }

    /// Cursor column within the focused text field, for the terminal
    /// cursor; `None` on flag fields.
    pub fn input_cursor(&self) -> Option<usize> {
        match &FIELDS[self.cursor].kind {
            FieldKind::Text(_) => Some(self.input.visual_cursor()),
            FieldKind::Flag(_) => None,
        }
    }

    /// Display value of a field. The token is masked once typed.
    pub fn display_value(&mut self, index: usize) -> String {
        match &FIELDS[index].kind {
            FieldKind::Text(get) => {
                let value = get(&mut self.state).clone();
                if FIELDS[index].label == "Upload token" && !value.is_empty() {
                    "•".repeat(value.chars().count())
                } else {
                    value
                }
            }
            FieldKind::Flag(get) => {
                if *get(&mut self.state) {
                    "[x]".into()
                } else {
                    "[ ]".into()
                }
            }
        }
    }

    fn seed_input(&mut self) {
        if let FieldKind::Text(get) = &FIELDS[self.cursor].kind {
            self.input = Input::new(get(&mut self.state).clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn typing_updates_backing_state() {
        let mut form = FormView::default();
        // Cursor starts on "Frame size".
        form.handle_key(key('V'));
        form.handle_key(key('G'));
        form.handle_key(key('A'));
        assert_eq!(form.state().framesize, "VGA");
    }

    #[test]
    fn toggle_only_touches_flag_fields() {
        let mut form = FormView::default();
        form.toggle();
        assert_eq!(form.state().framesize, "");

        // Move to "Auto upload".
        form.down();
        form.down();
        form.down();
        assert!(!form.state().auto_upload);
        form.toggle();
        assert!(form.state().auto_upload);
        assert_eq!(form.input_cursor(), None);
    }

    #[test]
    fn cursor_clamps_and_reseeds_input() {
        let mut form = FormView::new(FormState {
            jpeg_quality: "15".into(),
            ..FormState::default()
        });
        form.up();
        assert_eq!(form.cursor(), 0);
        form.down();
        assert_eq!(FIELDS[form.cursor()].label, "JPEG quality");
        // Editing appends to the seeded value.
        form.handle_key(key('0'));
        assert_eq!(form.state().jpeg_quality, "150");
    }

    #[test]
    fn token_is_masked_in_display() {
        let mut form = FormView::default();
        let token_row = FIELDS
            .iter()
            .position(|f| f.label == "Upload token")
            .expect("token field");
        while form.cursor() < token_row {
            form.down();
        }
        form.handle_key(key('a'));
        form.handle_key(key('b'));
        assert_eq!(form.display_value(token_row), "••");
        assert_eq!(form.state().upload_token, "ab");
    }

    #[test]
    fn replace_keeps_cursor_position() {
        let mut form = FormView::default();
        form.down();
        form.down();
        let cursor = form.cursor();
        form.replace(FormState {
            upload_interval_sec: "30".into(),
            ..FormState::default()
        });
        assert_eq!(form.cursor(), cursor);
        assert_eq!(form.state().upload_interval_sec, "30");
    }
}
