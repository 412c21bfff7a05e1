pub mod app;
pub mod ui;

use std::io;
use chrono::NaiveDateTime;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::models::TaskKind;
use crate::policy::MaintenancePolicy;
use app::{App, InputField, InputMode};
use ui::ui;

/// Runs the interactive UI until the user quits. The terminal is restored
/// before any error from the event loop is returned.
pub fn run_tui(policy: MaintenancePolicy, now: NaiveDateTime) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(policy, now);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        log::error!("TUI loop failed: {}", err);
    }
    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char('s') => app.cycle_sort(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('o') => app.start_edit(InputField::Odometer),
                    KeyCode::Char('1') => app.start_edit(InputField::Service(TaskKind::Oil)),
                    KeyCode::Char('2') => app.start_edit(InputField::Service(TaskKind::AirFilter)),
                    KeyCode::Char('3') => app.start_edit(InputField::Service(TaskKind::FuelFilter)),
                    KeyCode::Char('4') => app.start_edit(InputField::Service(TaskKind::DpfCleaning)),
                    KeyCode::Char('i') => app.start_edit(InputField::Inspection),
                    _ => {}
                },
                InputMode::Editing | InputMode::Adding => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => {
                        app.input_mode = InputMode::Normal;
                        app.input_buffer.clear();
                    }
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}
