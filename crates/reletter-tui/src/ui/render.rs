use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use reletter_core::{Field, View};

use crate::app::{App, AppState, LoginFocus};

use super::styles;

/// Interior width of the login card
const CARD_WIDTH: u16 = 48;

/// Visible characters of a text field
const FIELD_WIDTH: usize = 28;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingNotice) {
        render_notice_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Reletter";
    let location = format!("{} · {} ", app.view.title(), app.view.path());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + location.chars().count()),
        )),
        Span::styled(location, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Login => render_login(frame, app, area),
        View::Main => render_message_view(
            frame,
            area,
            "Welcome to Reletter",
            "You are logged in.",
        ),
        View::Home => render_message_view(
            frame,
            area,
            "Reletter",
            "Letters to the people who matter.",
        ),
        View::Signup => render_message_view(
            frame,
            area,
            "Sign up",
            "Account creation is not available from the terminal yet.",
        ),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts: &[(&str, &str)] = match app.view {
        View::Login => &[("Tab", "next"), ("Enter", "select"), ("Esc", "quit")],
        View::Home => &[("l", "log in"), ("s", "sign up"), ("q", "quit")],
        View::Signup => &[("Esc", "back to login"), ("q", "quit")],
        View::Main => &[("Esc", "home"), ("q", "quit")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, desc)) in shortcuts.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(format!("[{}]", key), styles::help_key_style()));
        spans.push(Span::styled(format!(" {}", desc), styles::help_desc_style()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Login
// ============================================================================

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Login", styles::title_style())).centered(),
        Line::from(""),
    ];

    lines.push(field_line(
        "Email   ",
        form.email().to_string(),
        "Enter your email",
        app.login_focus == LoginFocus::Email,
    ));
    if let Some(error) = form.error(Field::Email) {
        lines.push(error_line(error));
    }

    lines.push(field_line(
        "Password",
        "*".repeat(form.password().chars().count()),
        "Enter your password",
        app.login_focus == LoginFocus::Password,
    ));
    if let Some(error) = form.error(Field::Password) {
        lines.push(error_line(error));
    }

    lines.push(Line::from(""));

    // Login button, dimmed while the form is invalid
    let submit_focused = app.login_focus == LoginFocus::Submit;
    let submit_label = if submit_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(
        Line::from(Span::styled(
            submit_label,
            styles::button_style(submit_focused, app.can_submit()),
        ))
        .centered(),
    );
    lines.push(Line::from(""));

    let return_focused = app.login_focus == LoginFocus::Return;
    lines.push(
        Line::from(Span::styled(
            " Back ",
            styles::secondary_button_style(return_focused),
        ))
        .centered(),
    );

    let signup_focused = app.login_focus == LoginFocus::Signup;
    lines.push(
        Line::from(Span::styled("Sign up", styles::link_style(signup_focused))).centered(),
    );
    lines.push(Line::from(""));

    let height = lines.len() as u16 + 2;
    let card = centered_rect_fixed(CARD_WIDTH + 2, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), card);
}

/// One labelled text field. Long values scroll so the end stays visible.
fn field_line(label: &str, value: String, placeholder: &str, focused: bool) -> Line<'static> {
    let cursor = if focused { "▌" } else { "" };
    let visible = FIELD_WIDTH - 1;

    let content = if value.is_empty() {
        Span::styled(
            format!("{:<width$}", placeholder, width = visible),
            styles::placeholder_style(),
        )
    } else {
        let count = value.chars().count();
        let tail: String = value.chars().skip(count.saturating_sub(visible)).collect();
        Span::styled(
            format!("{:<width$}", tail, width = visible),
            styles::field_style(focused),
        )
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{}: [", label), styles::muted_style()),
        content,
        Span::styled(cursor.to_string(), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

fn error_line(error: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("             "),
        Span::styled(error.to_string(), styles::error_style()),
    ])
}

// ============================================================================
// Other views
// ============================================================================

fn render_message_view(frame: &mut Frame, area: Rect, title: &str, body: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), styles::title_style())).centered(),
        Line::from(""),
        Line::from(Span::styled(body.to_string(), styles::help_desc_style())).centered(),
        Line::from(""),
    ];

    let card = centered_rect_fixed(CARD_WIDTH + 2, lines.len() as u16 + 2, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        card,
    );
}

// ============================================================================
// Overlays
// ============================================================================

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let Some(notice) = app.notice() else {
        return;
    };

    let area = centered_rect_fixed(CARD_WIDTH, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice.to_string(), styles::help_desc_style())).centered(),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to continue", styles::muted_style()),
        ])
        .centered(),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
