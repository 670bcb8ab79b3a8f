//! Terminal setup and teardown with panic safety.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::view::{Screen, Tone};

/// Owns the terminal while the form is shown. Restores it on drop.
pub struct Terminal {
    stdout: Stdout,
}

impl Terminal {
    /// Initialize the terminal for TUI rendering.
    pub fn new() -> io::Result<Self> {
        // Restore the terminal before the panic message is printed
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        Ok(Self { stdout })
    }

    /// Draws a full frame.
    pub fn draw(&mut self, screen: &Screen) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::Hide,
            terminal::Clear(ClearType::All),
            SetAttribute(Attribute::Reset)
        )?;

        for (y, line) in screen.lines.iter().enumerate() {
            let y = u16::try_from(y).unwrap_or(u16::MAX);
            queue!(self.stdout, cursor::MoveTo(0, y))?;
            for span in &line.spans {
                let (color, bold) = style(span.tone);
                if bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                queue!(
                    self.stdout,
                    SetForegroundColor(color),
                    Print(&span.text),
                    ResetColor,
                    SetAttribute(Attribute::Reset)
                )?;
            }
        }

        if let Some((x, y)) = screen.cursor {
            queue!(self.stdout, cursor::MoveTo(x, y), cursor::Show)?;
        }

        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn style(tone: Tone) -> (Color, bool) {
    match tone {
        Tone::Title => (Color::Yellow, true),
        Tone::Label => (Color::White, true),
        Tone::Text => (Color::Reset, false),
        Tone::Muted => (Color::DarkGrey, false),
        Tone::Focused => (Color::Cyan, true),
        Tone::Error => (Color::Red, false),
        Tone::Success => (Color::Green, true),
        Tone::Failure => (Color::Red, true),
        Tone::Disabled => (Color::DarkGrey, false),
    }
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
