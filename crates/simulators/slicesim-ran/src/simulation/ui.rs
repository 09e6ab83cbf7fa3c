use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Borders, Gauge};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use slicesim_output::ui::{Renderer, SimContent};

#[derive(Debug, Default)]
pub struct SimRenderer {}

impl SimRenderer {
    pub fn new() -> Self {
        Self {}
    }

    fn slice_lines(content: &SimContent) -> String {
        let status = &content.status;
        format!(
            "  eMBB:  {}\n  URLLC: {}\n  mMTC:  {}",
            status.embb, status.urllc, status.mmtc
        )
    }
}

impl Renderer for SimRenderer {
    fn render_sim_ui(&self, content: &mut SimContent, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Percentage(25),
                Constraint::Percentage(15),
                Constraint::Percentage(15),
                Constraint::Percentage(45),
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(format!(
                " ================= S L I C E S I M =================\n\
              \n\
              Scenario: {}\n\
              \n\
              ====================================================
            ",
                content.metadata.scenario
            ))
            .block(
                Block::bordered()
                    .title("slicesim")
                    .title_alignment(Alignment::Center)
                    .border_type(BorderType::Rounded),
            )
            .style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .centered(),
            layout[0],
        );

        let progress_text = format!(
            "Tick: {} / {}. {:.2}%. ",
            content.now,
            content.total_steps,
            content.completion() * 100.0
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(
                    Style::default()
                        .fg(Color::LightBlue)
                        .bg(Color::Black)
                        .add_modifier(Modifier::ITALIC),
                )
                .label(progress_text)
                .ratio(content.completion())
                .use_unicode(true)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Simulation Progress")
                        .title_alignment(Alignment::Center),
                ),
            layout[1],
        );

        let connected_text = format!(
            "{} / {} nodes connected. {:.1}%. ",
            content.status.connected,
            content.status.total,
            content.connection_ratio() * 100.0
        );
        frame.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::LightGreen).bg(Color::Black))
                .label(connected_text)
                .ratio(content.connection_ratio())
                .use_unicode(true)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Connected")
                        .title_alignment(Alignment::Center),
                ),
            layout[2],
        );

        let simulation_details = format!(
            "Input File: {}\n\
        Output Path: {}\n\
        Log Path: {}\n\
        Slice Distribution:\n{}
        ",
            content.metadata.input_file,
            content.metadata.output_path,
            content.metadata.log_path,
            Self::slice_lines(content),
        );
        frame.render_widget(
            Paragraph::new(simulation_details)
                .block(Block::default().borders(Borders::ALL).title("More details"))
                .style(Style::default().fg(Color::White).bg(Color::Black))
                .alignment(Alignment::Left),
            layout[3],
        );
    }
}
