use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::status::{evaluate_all_tasks, fleet_inspection_status, Status};
use crate::urgency::urgency_score;
use super::app::{App, InputField, InputMode};

fn status_style(status: Status) -> Style {
    match status {
        Status::Due => Style::default().fg(Color::Red),
        Status::Approaching => Style::default().fg(Color::Yellow),
        Status::Ok => Style::default().fg(Color::Green),
        Status::Unknown => Style::default().fg(Color::DarkGray),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let rows: Vec<Row> = app
        .vehicles
        .iter()
        .map(|v| {
            let mut cells = vec![
                Cell::from(v.id.to_string()),
                Cell::from(v.unit_number.clone()),
                Cell::from(v.year.map(|y| y.to_string()).unwrap_or_default()),
                Cell::from(match v.odometer() {
                    Some(o) => format!("{} {}", o, v.distance_unit.label()),
                    None => "-".to_string(),
                }),
            ];
            for (_, eval) in evaluate_all_tasks(&app.policy, v, app.now) {
                cells.push(Cell::from(eval.status.label()).style(status_style(eval.status)));
            }
            let inspection = fleet_inspection_status(&app.policy, v, app.now);
            cells.push(Cell::from(inspection.label()).style(status_style(inspection)));
            cells.push(Cell::from(urgency_score(&app.policy, v, app.now).to_string()));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(6),
    ];

    let title = format!("Fleetust - Sorted by {}", app.sort_mode.label());
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Unit", "Year", "Odometer", "Oil", "Air", "Fuel", "DPF", "Inspection", "Urg"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => match &app.message {
            Some(m) => format!("{} | q: Quit | s: Sort | a: Add | o: Odometer | 1-4: Service | i: Inspect | d: Del", m),
            None => "q: Quit | s: Sort | a: Add | o: Odometer | 1: Oil | 2: Air | 3: Fuel | 4: DPF | i: Inspect | d: Del".to_string(),
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel".to_string(),
        InputMode::Adding => "Enter: Next Step | Esc: Cancel".to_string(),
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Vehicle: Enter Unit Number".to_string(),
                1 => "Add Vehicle: Enter Model Year (Optional)".to_string(),
                2 => "Add Vehicle: Enter Odometer (km, Optional)".to_string(),
                _ => "Add Vehicle".to_string(),
            },
            _ => match app.input_field {
                InputField::Odometer => "Update Odometer".to_string(),
                InputField::Service(kind) => format!("{}: Odometer at Service", kind.label()),
                InputField::Inspection => "Safety Inspection Date (YYYY-MM-DD)".to_string(),
                InputField::None => "Edit".to_string(),
            },
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
