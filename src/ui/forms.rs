//! Input forms and their validation. Each form owns its raw field text and a
//! sticky error slot the dialogs render in place of the hint line, following
//! the same modal-form shape throughout.

use std::mem;

use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Render a single labelled field line for a form dialog.
fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        "<empty>".to_string()
    } else {
        value.to_string()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Single-line text input, used for the manual add and the title editor.
#[derive(Default, Clone)]
pub(crate) struct TextForm {
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl TextForm {
    pub(crate) fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn build_line(&self, label: &str) -> Line<'static> {
        field_line(label, &self.value, true)
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// Accumulator for the bulk-paste dialog. Each Enter commits the line being
/// typed; an Enter on an empty line submits the whole batch, which makes a
/// multi-line terminal paste land correctly without any extra chrome.
#[derive(Default, Clone)]
pub(crate) struct BulkForm {
    pub(crate) lines: Vec<String>,
    pub(crate) current: String,
}

impl BulkForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.current.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        if self.current.is_empty() {
            // Pull the previous line back for editing.
            if let Some(line) = self.lines.pop() {
                self.current = line;
            }
        } else {
            self.current.pop();
        }
    }

    /// Whether the pending Enter should submit the batch rather than commit
    /// another line.
    pub(crate) fn submit_on_enter(&self) -> bool {
        self.current.trim().is_empty()
    }

    pub(crate) fn commit_line(&mut self) {
        let line = mem::take(&mut self.current);
        self.lines.push(line);
    }

    /// The raw newline-delimited text to hand to the session.
    pub(crate) fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !self.current.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&self.current);
        }
        text
    }

    /// Committed non-blank lines, shown as a running count in the dialog.
    pub(crate) fn entry_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .count()
    }
}

/// Fields available within the generate form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum GenerateField {
    #[default]
    Prefix,
    Count,
}

/// Form for templated batch generation: a free-text prefix plus a count,
/// producing `prefix1 .. prefixN`.
#[derive(Clone)]
pub(crate) struct GenerateForm {
    pub(crate) prefix: String,
    pub(crate) count: String,
    pub(crate) active: GenerateField,
    pub(crate) error: Option<String>,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            prefix: "成員".to_string(),
            count: "10".to_string(),
            active: GenerateField::Prefix,
            error: None,
        }
    }
}

impl GenerateForm {
    /// Swap focus between the prefix and count fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            GenerateField::Prefix => GenerateField::Count,
            GenerateField::Count => GenerateField::Prefix,
        };
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            GenerateField::Prefix => {
                if ch.is_control() {
                    return false;
                }
                self.prefix.push(ch);
                true
            }
            GenerateField::Count => {
                if ch.is_ascii_digit() {
                    self.count.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            GenerateField::Prefix => {
                self.prefix.pop();
            }
            GenerateField::Count => {
                self.count.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for the session.
    pub(crate) fn parse_inputs(&self) -> Result<(String, usize)> {
        let count_raw = self.count.trim();
        if count_raw.is_empty() {
            return Err(anyhow!("Count is required."));
        }
        let count = count_raw
            .parse::<usize>()
            .context("Count must be a number.")?;
        if count == 0 {
            return Err(anyhow!("Count must be at least one."));
        }
        Ok((self.prefix.clone(), count))
    }

    pub(crate) fn build_line(&self, label: &str, field: GenerateField) -> Line<'static> {
        let (value, active) = match field {
            GenerateField::Prefix => (&self.prefix, self.active == GenerateField::Prefix),
            GenerateField::Count => (&self.count, self.active == GenerateField::Count),
        };
        field_line(label, value, active)
    }

    pub(crate) fn value_len(&self, field: GenerateField) -> usize {
        match field {
            GenerateField::Prefix => self.prefix.chars().count(),
            GenerateField::Count => self.count.chars().count(),
        }
    }
}

/// Numeric form for the winners-per-draw setting.
#[derive(Default, Clone)]
pub(crate) struct CountForm {
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl CountForm {
    pub(crate) fn with_value(count: usize) -> Self {
        Self {
            value: count.to_string(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() {
            self.value.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn parse(&self) -> Result<usize> {
        let raw = self.value.trim();
        if raw.is_empty() {
            return Err(anyhow!("A number is required."));
        }
        let count = raw.parse::<usize>().context("Must be a number.")?;
        if count == 0 {
            return Err(anyhow!("Must draw at least one winner."));
        }
        Ok(count)
    }

    pub(crate) fn build_line(&self, label: &str) -> Line<'static> {
        field_line(label, &self.value, true)
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}
