//! Form rendering.
//!
//! Turns the controller state into styled lines. Pure, so the layout can be
//! checked without a terminal.

use pizza_lib::form::Phase;
use pizza_lib::{FormController, OrderValues, Outcome, Size, TOPPINGS};
use unicode_width::UnicodeWidthStr;

/// Width of the name input box, in cells.
const INPUT_WIDTH: usize = 24;

/// Placeholder shown in an empty name input.
const NAME_PLACEHOLDER: &str = "Type full name";

/// Label of the blank size option.
const SIZE_PLACEHOLDER: &str = "----Choose Size----";

/// Key help shown at the bottom.
const HELP: &str = "Tab/↑↓ move · Space toggle · ←→ size · Enter submit · Esc quit";

/// Values offered by the size select, blank first.
pub fn size_options() -> [&'static str; 4] {
    ["", Size::Small.code(), Size::Medium.code(), Size::Large.code()]
}

fn size_label(values: &OrderValues) -> &str {
    match values.parsed_size() {
        Some(size) => size.label(),
        None if values.size.is_empty() => SIZE_PLACEHOLDER,
        None => &values.size,
    }
}

/// The control that receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Size,
    Topping(usize),
    Submit,
}

impl Focus {
    /// Next control in tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Size,
            Self::Size => Self::Topping(0),
            Self::Topping(i) if i + 1 < TOPPINGS.len() => Self::Topping(i + 1),
            Self::Topping(_) => Self::Submit,
            Self::Submit => Self::Name,
        }
    }

    /// Previous control in tab order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Submit,
            Self::Size => Self::Name,
            Self::Topping(0) => Self::Size,
            Self::Topping(i) => Self::Topping(i - 1),
            Self::Submit => Self::Topping(TOPPINGS.len() - 1),
        }
    }
}

/// How a span is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Label,
    Text,
    Muted,
    Focused,
    Error,
    Success,
    Failure,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    fn push(&mut self, text: impl Into<String>, tone: Tone) -> &mut Self {
        self.spans.push(Span {
            text: text.into(),
            tone,
        });
        self
    }

    fn of(text: impl Into<String>, tone: Tone) -> Self {
        let mut line = Self::default();
        line.push(text, tone);
        line
    }

    /// The line's text without styling.
    #[cfg(test)]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A full frame plus where the text cursor goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub lines: Vec<Line>,
    /// `(column, row)` of the caret when the name input is focused.
    pub cursor: Option<(u16, u16)>,
}

impl Screen {
    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn row(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }

    /// All lines as plain text, joined by newlines.
    #[cfg(test)]
    pub fn plain(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn marker(focused: bool) -> (&'static str, Tone) {
    if focused {
        ("› ", Tone::Focused)
    } else {
        ("  ", Tone::Text)
    }
}

fn field_error(screen: &mut Screen, message: &str) {
    if !message.is_empty() {
        screen.lines.push(Line::of(format!("    {}", message), Tone::Error));
    }
}

/// Renders the form. `name_cursor` is the caret position in characters.
pub fn render(form: &FormController, focus: Focus, name_cursor: usize) -> Screen {
    let mut screen = Screen::default();
    let values = form.values();
    let errors = form.errors();

    screen.lines.push(Line::of(" Order Your Pizza", Tone::Title));
    match form.outcome() {
        Outcome::Success(msg) => screen.lines.push(Line::of(format!(" ✔ {}", msg), Tone::Success)),
        Outcome::Failure(msg) => screen.lines.push(Line::of(format!(" ✘ {}", msg), Tone::Failure)),
        Outcome::None => screen.blank(),
    }
    screen.blank();

    // name
    screen.lines.push(Line::of("  Name", Tone::Label));
    let (mark, mark_tone) = marker(focus == Focus::Name);
    let mut line = Line::default();
    line.push(mark, mark_tone).push("[", Tone::Muted);
    if values.name.is_empty() {
        line.push(format!("{:<INPUT_WIDTH$}", NAME_PLACEHOLDER), Tone::Muted);
    } else {
        let pad = INPUT_WIDTH.saturating_sub(values.name.width());
        line.push(format!("{}{}", values.name, " ".repeat(pad)), Tone::Text);
    }
    line.push("]", Tone::Muted);
    if focus == Focus::Name {
        let before: String = values.name.chars().take(name_cursor).collect();
        let col = mark.width() + 1 + before.width();
        screen.cursor = Some((u16::try_from(col).unwrap_or(u16::MAX), screen.row()));
    }
    screen.lines.push(line);
    field_error(&mut screen, &errors.name);
    screen.blank();

    // size
    screen.lines.push(Line::of("  Size", Tone::Label));
    let (mark, mark_tone) = marker(focus == Focus::Size);
    let tone = if values.size.is_empty() { Tone::Muted } else { Tone::Text };
    let mut line = Line::default();
    line.push(mark, mark_tone)
        .push("◂ ", Tone::Muted)
        .push(size_label(values), tone)
        .push(" ▸", Tone::Muted);
    screen.lines.push(line);
    field_error(&mut screen, &errors.size);
    screen.blank();

    // toppings
    screen.lines.push(Line::of("  Toppings", Tone::Label));
    for (i, topping) in TOPPINGS.iter().enumerate() {
        let (mark, mark_tone) = marker(focus == Focus::Topping(i));
        let check = if values.has_topping(topping.id) { "[x] " } else { "[ ] " };
        let mut line = Line::default();
        line.push(mark, mark_tone)
            .push(check, Tone::Text)
            .push(topping.text, Tone::Text);
        screen.lines.push(line);
    }
    field_error(&mut screen, &errors.toppings);
    screen.blank();

    // submit
    let (mark, mark_tone) = marker(focus == Focus::Submit);
    let (label, tone) = match form.phase() {
        Phase::Submitting => ("[ Submitting… ]", Tone::Disabled),
        Phase::Editing if form.can_submit() => ("[ Submit ]", Tone::Text),
        Phase::Editing => ("[ Submit ]", Tone::Disabled),
    };
    let mut line = Line::default();
    line.push(mark, mark_tone).push(label, tone);
    screen.lines.push(line);
    screen.blank();

    screen.lines.push(Line::of(format!(" {}", HELP), Tone::Muted));
    screen
}
