//! Event loop: keys in, controller updates, frames out.
//!
//! Field checks and the order POST run on spawned tasks and report back over
//! a channel, so every controller mutation happens on this loop.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use log::{debug, info};
use tokio::sync::mpsc;

use pizza_lib::form::{FieldChecked, SubmitResult};
use pizza_lib::{FieldChange, FormController, OrderSink, TOPPINGS};

use crate::error::TuiError;
use crate::terminal::Terminal;
use crate::view::{self, Focus};

/// Results of background work.
#[derive(Debug)]
pub enum AppEvent {
    Checked(FieldChecked),
    Submitted(SubmitResult),
}

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

enum Step {
    Input(Option<std::io::Result<Event>>),
    Background(AppEvent),
}

pub struct App<S> {
    form: FormController,
    sink: std::sync::Arc<S>,
    focus: Focus,
    name_cursor: usize,
    tx: mpsc::UnboundedSender<AppEvent>,
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<S: OrderSink + 'static> App<S> {
    pub fn new(sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            form: FormController::new(),
            sink: std::sync::Arc::new(sink),
            focus: Focus::Name,
            name_cursor: 0,
            tx,
            rx,
        }
    }

    #[cfg(test)]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    #[cfg(test)]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Runs until the user quits or the input stream ends.
    pub async fn run(mut self, terminal: &mut Terminal) -> Result<(), TuiError> {
        let mut events = EventStream::new();

        loop {
            terminal.draw(&view::render(&self.form, self.focus, self.name_cursor))?;

            let step = tokio::select! {
                input = events.next() => Step::Input(input),
                Some(event) = self.rx.recv() => Step::Background(event),
            };

            match step {
                Step::Input(Some(Ok(Event::Key(key)))) => {
                    if self.handle_key(key) == Control::Quit {
                        info!("Quit requested");
                        return Ok(());
                    }
                }
                Step::Input(Some(Ok(_))) => {}
                Step::Input(Some(Err(e))) => return Err(e.into()),
                Step::Input(None) => return Ok(()),
                Step::Background(event) => self.handle_event(event),
            }
        }
    }

    /// Waits for the next background result.
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Applies a background result.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Checked(checked) => {
                self.form.apply_check(checked);
            }
            AppEvent::Submitted(result) => self.form.finish_submit(result),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => return Control::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Control::Quit,
            (KeyCode::Tab, _) | (KeyCode::Down, _) => self.move_focus(self.focus.next()),
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => self.move_focus(self.focus.prev()),
            _ => match self.focus {
                Focus::Name => self.name_key(key),
                Focus::Size => self.size_key(key),
                Focus::Topping(i) => self.topping_key(i, key),
                Focus::Submit => self.submit_key(key),
            },
        }

        Control::Continue
    }

    fn move_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Name {
            self.name_cursor = self.form.values().name.chars().count();
        }
    }

    fn name_key(&mut self, key: KeyEvent) {
        let mut chars: Vec<char> = self.form.values().name.chars().collect();
        let cursor = self.name_cursor.min(chars.len());

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                chars.insert(cursor, c);
                self.name_cursor = cursor + 1;
            }
            KeyCode::Backspace if cursor > 0 => {
                chars.remove(cursor - 1);
                self.name_cursor = cursor - 1;
            }
            KeyCode::Delete if cursor < chars.len() => {
                chars.remove(cursor);
            }
            KeyCode::Left => {
                self.name_cursor = cursor.saturating_sub(1);
                return;
            }
            KeyCode::Right => {
                self.name_cursor = (cursor + 1).min(chars.len());
                return;
            }
            KeyCode::Home => {
                self.name_cursor = 0;
                return;
            }
            KeyCode::End => {
                self.name_cursor = chars.len();
                return;
            }
            KeyCode::Enter => {
                self.move_focus(self.focus.next());
                return;
            }
            _ => return,
        }

        self.change(FieldChange::Name(chars.into_iter().collect()));
    }

    fn size_key(&mut self, key: KeyEvent) {
        let options = view::size_options();
        let current = options
            .iter()
            .position(|o| *o == self.form.values().size)
            .unwrap_or(0);

        let next = match key.code {
            KeyCode::Right | KeyCode::Char(' ') => (current + 1) % options.len(),
            KeyCode::Left => (current + options.len() - 1) % options.len(),
            KeyCode::Char(c) => {
                let code = c.to_ascii_uppercase().to_string();
                match options.iter().position(|o| *o == code) {
                    Some(i) => i,
                    None => return,
                }
            }
            KeyCode::Enter => {
                self.move_focus(self.focus.next());
                return;
            }
            _ => return,
        };

        self.change(FieldChange::Size(options[next].to_string()));
    }

    fn topping_key(&mut self, index: usize, key: KeyEvent) {
        if !matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
            return;
        }
        let Some(topping) = TOPPINGS.get(index) else { return };
        let checked = !self.form.values().has_topping(topping.id);
        self.change(FieldChange::Topping {
            id: topping.id.to_string(),
            checked,
        });
    }

    fn submit_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            self.submit();
        }
    }

    fn change(&mut self, change: FieldChange) {
        let check = self.form.change(change);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::Checked(check.run().await));
        });
    }

    fn submit(&mut self) {
        let submission = match self.form.begin_submit() {
            Ok(submission) => submission,
            Err(e) => {
                debug!("Submit refused: {}", e);
                return;
            }
        };

        let sink = std::sync::Arc::clone(&self.sink);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = submission.send(sink.as_ref()).await;
            let _ = tx.send(AppEvent::Submitted(result));
        });
    }
}
