use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use clinicdesk_core::DoctorRecord;

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_fees, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_doctor_list(frame, app, chunks[0]);
    render_doctor_detail(frame, app, chunks[1]);
}

fn render_doctor_list(frame: &mut Frame, app: &App, area: Rect) {
    let doctors = app.filtered_doctors();

    let items: Vec<ListItem> = doctors
        .iter()
        .enumerate()
        .map(|(i, doctor)| {
            let line = Line::from(vec![
                Span::raw(format!(
                    "{:<24} {:<20} ",
                    truncate_string(&doctor.display_name(), 24),
                    truncate_string(doctor.speciality().unwrap_or("-"), 20),
                )),
                Span::styled(
                    doctor.availability_display(),
                    styles::availability_style(doctor.available()),
                ),
            ]);

            let style = if i == app.doctor_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = if app.search_query.is_empty() {
        format!(" Doctors ({}) ", doctors.len())
    } else {
        format!(
            " Doctors ({} of {}) /{} ",
            doctors.len(),
            app.ctx.doctors().len(),
            app.search_query
        )
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let hint = if !app.is_authenticated() {
            "Not logged in. Press [l] to log in."
        } else if app.ctx.directory().in_flight() {
            "Loading doctors..."
        } else if !app.search_query.is_empty() {
            "No doctors match the search"
        } else {
            "No doctors. Press [r] to refresh."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(hint, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.doctor_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_doctor_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.selected_doctor() {
        Some(doctor) => (format!(" {} ", doctor.display_name()), detail_lines(doctor)),
        None => (
            " No Doctor Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select a doctor from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_lines(doctor: &DoctorRecord) -> Vec<Line<'static>> {
    let fields: [(&str, Option<String>); 6] = [
        ("Speciality", doctor.speciality().map(str::to_string)),
        ("Degree", doctor.degree().map(str::to_string)),
        ("Experience", doctor.experience().map(str::to_string)),
        ("Email", doctor.email().map(str::to_string)),
        ("Fees", doctor.fees().map(format_fees)),
        ("ID", doctor.id()),
    ];

    let mut lines: Vec<Line<'static>> = fields
        .into_iter()
        .filter_map(|(label, value)| {
            value.map(|v| {
                Line::from(vec![
                    Span::styled(format!("{:<12}", label), styles::highlight_style()),
                    Span::raw(v),
                ])
            })
        })
        .collect();

    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", "Status"), styles::highlight_style()),
        Span::styled(
            doctor.availability_display(),
            styles::availability_style(doctor.available()),
        ),
    ]));

    // Opaque records may carry nothing we recognize; show the raw payload
    if lines.len() == 1 {
        lines.push(Line::from(""));
        let raw = serde_json::to_string_pretty(doctor.as_value()).unwrap_or_default();
        lines.extend(
            raw.lines()
                .map(|l| Line::from(Span::styled(l.to_string(), styles::muted_style()))),
        );
    }

    lines
}
