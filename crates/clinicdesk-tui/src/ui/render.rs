use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use clinicdesk_core::ToastLevel;

use crate::app::{App, AppState, LoginFocus};

use super::{doctors, styles};

const LOGO: [&str; 3] = [
    "    ╔═╗╦  ╦╔╗╔╦╔═╗╔╦╗╔═╗╔═╗╦╔═",
    "    ║  ║  ║║║║║║   ║║║╣ ╚═╗╠╩╗",
    "    ╚═╝╩═╝╩╝╚╝╩╚═╝═╩╝╚═╝╚═╝╩ ╩",
];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    doctors::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  clinicdesk admin";
    let session = if app.is_authenticated() {
        "● logged in"
    } else {
        "○ logged out"
    };
    let help_hint = "[?] Help";

    let used = title.chars().count() + session.chars().count() + help_hint.len() + 6;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(
            session,
            if app.is_authenticated() {
                styles::success_style()
            } else {
                styles::muted_style()
            },
        ),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[r]efresh | [/]search | [o]logout | [q]uit";

    let (left_text, left_style) = if matches!(app.state, AppState::Searching) {
        (format!(" Search: {}▌ ", app.search_query), styles::search_style())
    } else if let Some(toast) = app.ctx.toasts().latest() {
        let style = match toast.level {
            ToastLevel::Error => styles::error_style(),
            ToastLevel::Info => styles::success_style(),
        };
        (format!(" {} ", toast.message), style)
    } else if app.ctx.directory().in_flight() {
        (" Loading doctors... ".to_string(), styles::muted_style())
    } else {
        (
            format!(" {} doctors ", app.ctx.doctors().len()),
            styles::muted_style(),
        )
    };

    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.push(Line::from(Span::styled(
        format!("            version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    help_text.push(help_line("↑/↓ j/k", "Move selection"));
    help_text.push(help_line("PgUp/PgDn", "Scroll a page"));
    help_text.push(help_line("g/G", "First / last doctor"));
    help_text.push(help_line("Esc", "Clear search"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Actions", styles::highlight_style())));
    help_text.push(help_line("/", "Search name, speciality, email"));
    help_text.push(help_line("r", "Refresh doctor list"));
    help_text.push(help_line("l", "Log in"));
    help_text.push(help_line("o", "Log out"));
    help_text.push(help_line("q", "Quit"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("      Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() || app.login_pending { 13 } else { 11 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let visible_email: String = app
        .login_email
        .chars()
        .rev()
        .take(20)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(format!("{:<20}{}", visible_email, cursor), email_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let password_masked = "*".repeat(app.login_password.chars().count().min(20));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<20}{}", password_masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Login button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    if app.login_pending {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Logging in...", styles::muted_style())));
    } else if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Are you sure you want to quit?",
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" to quit, ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
