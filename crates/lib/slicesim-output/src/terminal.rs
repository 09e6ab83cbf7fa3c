use std::{io, panic};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::error;
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::error::OutputError;
use crate::ui::{Message, Renderer, SimContent};

pub type ContentResult<T> = Result<T, OutputError>;

/// Terminal front end of a running simulation.
#[derive(Debug)]
pub struct TerminalUI<B: Backend, R: Renderer> {
    terminal: Terminal<B>,
    renderer: R,
}

impl<B: Backend, R: Renderer> TerminalUI<B, R> {
    pub fn new(terminal: Terminal<B>, renderer: R) -> Self {
        Self { terminal, renderer }
    }

    /// Raw mode and alternate screen until <code>exit</code> is called.
    pub fn init(&mut self) -> ContentResult<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic| {
            if let Err(e) = Self::reset() {
                error!("Could not restore the terminal after a panic: {}", e);
            }
            panic_hook(panic);
        }));

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    pub fn draw_ui(&mut self, content: &mut SimContent) -> ContentResult<()> {
        self.terminal
            .draw(|frame| self.renderer.render_sim_ui(content, frame))?;
        Ok(())
    }

    fn reset() -> ContentResult<()> {
        terminal::disable_raw_mode()?;
        crossterm::execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }

    pub fn exit(&mut self) -> ContentResult<()> {
        Self::reset()?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Folds one message from the simulation or the keyboard into the displayed content.
pub fn apply_message(content: &mut SimContent, message: Message) {
    match message {
        Message::CurrentTime(now) => content.update_now(now),
        Message::Status(status) => content.update_status(status),
        Message::Key(key_event) => handle_sim_key_events(key_event, content),
        Message::Quit => content.quit(),
        Message::Mouse(_) | Message::Resize(_, _) => {}
    }
}

/// Esc, q and Ctrl-C stop the simulation.
pub fn handle_sim_key_events(key_event: KeyEvent, content: &mut SimContent) {
    match key_event.code {
        KeyCode::Esc | KeyCode::Char('q') => content.quit(),
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            content.quit()
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;

    use crate::tables::status::StatusRecord;
    use crate::ui::SimUIMetadata;

    use super::*;

    #[test]
    fn quit_keys_stop_the_run() {
        for (code, modifiers) in [
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut content = SimContent::new(5, SimUIMetadata::default());
            let event = KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press);
            handle_sim_key_events(event, &mut content);
            assert!(!content.running);
        }

        let mut content = SimContent::new(5, SimUIMetadata::default());
        handle_sim_key_events(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE),
            &mut content,
        );
        assert!(content.running);
    }

    #[test]
    fn tick_reports_update_the_content() {
        let mut content = SimContent::new(10, SimUIMetadata::default());
        apply_message(&mut content, Message::CurrentTime(5));
        apply_message(
            &mut content,
            Message::Status(
                StatusRecord::builder()
                    .connected(6)
                    .total(8)
                    .embb(4)
                    .urllc(2)
                    .build(),
            ),
        );
        apply_message(&mut content, Message::Resize(80, 24));

        assert!(content.running);
        assert_eq!(content.now, 5);
        assert_eq!(content.status.urllc, 2);
        assert!((content.connection_ratio() - 0.75).abs() < 1e-12);

        apply_message(&mut content, Message::Quit);
        assert!(!content.running);
    }
}
