use std::sync::mpsc;
use std::sync::mpsc::{Receiver, SyncSender};
use std::time::Duration;
use std::{io, thread};

use crossterm::event::{self, Event as CrosstermEvent};
use log::{error, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use slicesim_output::error::OutputError;
use slicesim_output::terminal::{apply_message, ContentResult, TerminalUI};
use slicesim_output::ui::{Message, Renderer, SimContent, SimUIMetadata};

use crate::ran::report::TickReport;
use crate::ran::simulator::Simulator;

/// Runs the simulation without a terminal UI and hands back every tick report.
pub fn run_headless(mut simulator: Simulator, steps: u64) -> Vec<TickReport> {
    simulator.initialize();
    let reports = simulator.run(steps);
    if let Some(last) = reports.last() {
        info!(
            "Finished at tick {} with {}/{} nodes connected",
            last.tick, last.connected, last.total
        );
    }
    simulator.terminate();
    reports
}

/// Runs the simulation next to a terminal UI. The UI stops the run when the user quits, and
/// a terminal failure stops it with an error. Returns the number of ticks that ran.
pub fn run_with_ui<R: Renderer>(
    simulator: Simulator,
    steps: u64,
    metadata: SimUIMetadata,
    renderer: R,
) -> Result<u64, OutputError> {
    drive_with_listener(simulator, steps, move |receiver_ui, poller| {
        thread::spawn(move || add_event_poller(&poller));
        add_event_listener(receiver_ui, steps, metadata, renderer)
    })
}

/// Steps the simulator while <code>listener</code> consumes the tick messages on its own
/// thread. The run ends early when the listener hangs up, and the listener's error wins
/// over the ticks completed so far.
pub fn drive_with_listener<L>(
    mut simulator: Simulator,
    steps: u64,
    listener: L,
) -> Result<u64, OutputError>
where
    L: FnOnce(Receiver<Message>, SyncSender<Message>) -> Result<(), OutputError> + Send,
{
    let (sender_ui, receiver_ui) = mpsc::sync_channel(0);
    let poller = sender_ui.clone();

    thread::scope(|s| {
        let listener = s.spawn(move || listener(receiver_ui, poller));

        simulator.initialize();
        let mut completed = 0;
        for _ in 0..steps {
            let report = simulator.tick();
            completed += 1;
            let now = report.tick.as_u64() + 1;
            if sender_ui.send(Message::CurrentTime(now)).is_err()
                || sender_ui.send(Message::Status(report.status_record())).is_err()
            {
                break;
            }
        }
        simulator.terminate();
        let _ = sender_ui.send(Message::Quit);
        drop(sender_ui);

        match listener.join() {
            Ok(Ok(())) => Ok(completed),
            Ok(Err(e)) => {
                error!("Terminal UI failed after {} ticks: {}", completed, e);
                Err(e)
            }
            Err(_) => Err(OutputError::Ui("listener thread panicked".to_string())),
        }
    })
}

pub fn add_event_listener<R: Renderer>(
    receiver_ui: Receiver<Message>,
    steps: u64,
    metadata: SimUIMetadata,
    renderer: R,
) -> ContentResult<()> {
    let mut ui_content = SimContent::new(steps, metadata);
    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;
    let mut tui = TerminalUI::new(terminal, renderer);
    tui.init()?;

    while ui_content.running {
        tui.draw_ui(&mut ui_content)?;
        match receiver_ui.recv() {
            Ok(message) => apply_message(&mut ui_content, message),
            Err(_) => ui_content.quit(),
        }
    }
    tui.exit()
}

/// Forwards terminal events until the UI side hangs up.
pub fn add_event_poller(sender: &SyncSender<Message>) {
    let tick_rate = Duration::from_millis(250);
    loop {
        let message = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(CrosstermEvent::Key(e)) => Some(Message::Key(e)),
                Ok(CrosstermEvent::Mouse(e)) => Some(Message::Mouse(e)),
                Ok(CrosstermEvent::Resize(w, h)) => Some(Message::Resize(w, h)),
                Ok(_) => None,
                Err(_) => return,
            },
            Ok(false) => None,
            Err(_) => return,
        };
        if let Some(m) = message {
            if sender.send(m).is_err() {
                return;
            }
        }
    }
}
