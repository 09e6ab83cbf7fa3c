use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;

use crate::tables::status::StatusRecord;

#[derive(Clone, Copy, Debug)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    CurrentTime(u64),
    Status(StatusRecord),
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct SimUIMetadata {
    pub scenario: String,
    pub input_file: String,
    pub output_path: String,
    pub log_path: String,
}

#[derive(Debug, Default)]
pub struct SimContent {
    pub running: bool,
    pub total_steps: u64,
    pub now: u64,
    pub metadata: SimUIMetadata,
    pub status: StatusRecord,
}

impl SimContent {
    pub fn new(total_steps: u64, metadata: SimUIMetadata) -> Self {
        Self {
            total_steps,
            running: true,
            metadata,
            ..Self::default()
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn update_now(&mut self, now: u64) {
        self.now = now;
    }

    pub fn update_status(&mut self, status: StatusRecord) {
        self.status = status;
    }

    pub fn completion(&self) -> f64 {
        if self.total_steps == 0 {
            return 1.0;
        }
        (self.now as f64 / self.total_steps as f64).min(1.0)
    }

    pub fn connection_ratio(&self) -> f64 {
        if self.status.total == 0 {
            return 0.0;
        }
        self.status.connected as f64 / self.status.total as f64
    }
}

pub trait Renderer: Send {
    fn render_sim_ui(&self, content: &mut SimContent, frame: &mut Frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_handle_empty_runs() {
        let mut content = SimContent::new(0, SimUIMetadata::default());
        assert_eq!(content.completion(), 1.0);
        assert_eq!(content.connection_ratio(), 0.0);

        content.total_steps = 10;
        content.update_now(4);
        content.update_status(StatusRecord::builder().connected(3).total(4).build());
        assert!((content.completion() - 0.4).abs() < 1e-12);
        assert!((content.connection_ratio() - 0.75).abs() < 1e-12);
    }
}
