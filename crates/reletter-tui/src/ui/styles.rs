use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const ROSE: Color = Color::Rgb(157, 23, 77);
pub const PINK: Color = Color::Rgb(236, 72, 153);
pub const ERROR: Color = Color::Rgb(225, 29, 72);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(64, 24, 48);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(ROSE).add_modifier(Modifier::BOLD)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn placeholder_style() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

pub fn field_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(HIGHLIGHT)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

/// Primary button: filled pink, dimmed while disabled
pub fn button_style(focused: bool, enabled: bool) -> Style {
    let style = if enabled {
        Style::default()
            .bg(PINK)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(MUTED).fg(Color::Black)
    };
    if focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Secondary button: pink text, no fill
pub fn secondary_button_style(focused: bool) -> Style {
    let style = Style::default().fg(PINK).add_modifier(Modifier::BOLD);
    if focused {
        style.bg(HIGHLIGHT)
    } else {
        style
    }
}

pub fn link_style(focused: bool) -> Style {
    let style = Style::default().fg(PINK).add_modifier(Modifier::UNDERLINED);
    if focused {
        style.bg(HIGHLIGHT)
    } else {
        style
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PINK)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(40, 24, 32)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(PINK).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}
