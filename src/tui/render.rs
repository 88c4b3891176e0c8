//! TUI Rendering
//!
//! Pure mapping from [`App`] state to widgets. Nothing here mutates state.

use super::app::App;
use super::screens::ProfileScreen;
use crate::api::Role;
use crate::forms::{FieldSpec, FormValues};
use crate::navigation::{Notice, NoticeKind, Route};
use crate::profile::{PROFILE_FIELDS, ProfileStep};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap},
};

const BRAND_BLUE: Color = Color::Rgb(70, 130, 180);
const BRAND_GOLD: Color = Color::Rgb(218, 165, 32);
const ACCENT_GOLD: Color = Color::Rgb(184, 134, 11);

/// Render the entire UI
pub fn render(f: &mut Frame, app: &App) {
    match app.route {
        Route::Welcome => render_welcome(f, app),
        Route::Login => render_login(f, app),
        Route::Register => render_register(f, app),
        Route::Profile => render_profile(f, app),
        Route::Dashboard => render_dashboard(f, app),
    }
}

/// A box of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width.saturating_sub(2))),
            Constraint::Min(0),
        ])
        .split(v[1])[1]
}

fn card(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BRAND_BLUE))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
        ))
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let (color, marker) = match notice.kind {
        NoticeKind::Success => (Color::Green, "✓"),
        NoticeKind::Error => (Color::Red, "!"),
        NoticeKind::Info => (BRAND_BLUE, "·"),
    };
    Line::from(Span::styled(
        format!(" {} {}", marker, notice.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// `[key] label` hint pairs
fn footer(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(
            format!(" [{}] ", key),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(label.to_string(), Style::default().fg(Color::White)));
    }
    Line::from(spans)
}

fn field_line(spec: &FieldSpec, value: &str, focused: bool) -> Line<'static> {
    let shown = if spec.kind.is_secret() {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(
            if focused { " > " } else { "   " },
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::styled(
            format!("{:<18}", spec.label),
            Style::default().fg(if focused { BRAND_GOLD } else { Color::DarkGray }),
        ),
        Span::styled(
            format!("{}{}", shown, cursor),
            Style::default()
                .fg(Color::White)
                .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
        ),
    ])
}

fn form_lines(values: &FormValues, focus: usize) -> Vec<Line<'static>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, (spec, value))| field_line(spec, value, idx == focus))
        .collect()
}

fn role_line(role: Role) -> Line<'static> {
    let option = |r: Role| {
        let selected = r == role;
        Span::styled(
            format!(" {} {} ", if selected { "(•)" } else { "( )" }, r.label()),
            Style::default()
                .fg(if selected { BRAND_GOLD } else { Color::DarkGray })
                .add_modifier(if selected { Modifier::BOLD } else { Modifier::empty() }),
        )
    };
    Line::from(vec![
        Span::styled("   Role              ", Style::default().fg(Color::DarkGray)),
        option(Role::Student),
        option(Role::Admin),
    ])
}

fn render_welcome(f: &mut Frame, app: &App) {
    let area = centered(f.area(), 60, 14);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Placement Hub",
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Track applications, interviews and your profile",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    if let Some(notice) = &app.notice {
        lines.push(notice_line(notice));
        lines.push(Line::from(""));
    }
    lines.push(footer(&[("Enter", "Get Started"), ("L", "Login"), ("Q", "Quit")]));

    let paragraph = Paragraph::new(lines)
        .block(card(Route::Welcome.title()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_login(f: &mut Frame, app: &App) {
    let screen = &app.login;
    let area = centered(f.area(), 64, 14);

    let mut lines = vec![Line::from("")];
    lines.extend(form_lines(&screen.form.values, screen.focus));
    lines.push(role_line(screen.form.role));
    lines.push(Line::from(""));
    if let Some(notice) = &app.notice {
        lines.push(notice_line(notice));
        lines.push(Line::from(""));
    }
    lines.push(footer(&[
        ("Esc", "Back"),
        ("Tab", "Next Field"),
        ("←/→", "Role"),
        ("F2", "Register"),
        ("Enter", "Login"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(card(Route::Login.title()))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_register(f: &mut Frame, app: &App) {
    let screen = &app.register;
    let area = centered(f.area(), 64, 16);

    let mut lines = vec![Line::from("")];
    lines.extend(form_lines(&screen.form.values, screen.focus));
    lines.push(role_line(screen.form.role));
    lines.push(Line::from(""));
    if let Some(notice) = &app.notice {
        lines.push(notice_line(notice));
        lines.push(Line::from(""));
    }
    lines.push(footer(&[
        ("Esc", "Back"),
        ("Tab", "Next Field"),
        ("←/→", "Role"),
        ("F2", "Login"),
        ("Enter", "Register"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(card(Route::Register.title()))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_profile(f: &mut Frame, app: &App) {
    let screen = &app.profile;
    let wizard = &screen.form.wizard;
    let area = centered(f.area(), 72, 22);

    let outer = card(Route::Profile.title());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // step tabs
            Constraint::Length(1), // progress
            Constraint::Length(1),
            Constraint::Min(6), // fields
            Constraint::Length(3), // notice + footer
        ])
        .split(inner);

    let titles: Vec<Line> = ProfileStep::ALL
        .iter()
        .map(|step| Line::from(format!("F{} {}", step.index() + 1, step.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(wizard.current_index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(BRAND_BLUE))
        .percent(wizard.progress_percent().min(100))
        .label(format!("{} · {}%", wizard.step_label(), wizard.progress_percent()));
    f.render_widget(gauge, chunks[1]);

    f.render_widget(Paragraph::new(profile_field_lines(screen)), chunks[3]);

    let mut bottom = Vec::new();
    if let Some(notice) = &app.notice {
        bottom.push(notice_line(notice));
    } else if screen.form.is_submitting() {
        bottom.push(notice_line(&Notice::info("Submitting profile...")));
    } else {
        bottom.push(Line::from(""));
    }
    bottom.push(Line::from(""));
    let enter_label = if wizard.is_final_step() { "Submit" } else { "Next" };
    bottom.push(footer(&[
        ("Esc", "Previous"),
        ("Tab", "Next Field"),
        ("F1-F4", "Step"),
        ("Enter", enter_label),
    ]));
    f.render_widget(Paragraph::new(bottom), chunks[4]);
}

fn profile_field_lines(screen: &ProfileScreen) -> Vec<Line<'static>> {
    let Some(step) = screen.form.current_step() else {
        return Vec::new();
    };
    let focused = screen.focused_field();

    let mut lines: Vec<Line<'static>> = step
        .field_range()
        .filter_map(|idx| {
            let spec = PROFILE_FIELDS.get(idx)?;
            let value = screen.form.values.value_at(idx).unwrap_or_default();
            Some(field_line(spec, value, focused == Some(idx)))
        })
        .collect();

    if step.has_resume() {
        let on_input = screen.on_resume_input();
        let selected = screen
            .form
            .resume()
            .map(|r| format!("{} ({} bytes)", r.file_name, r.size_bytes))
            .unwrap_or_else(|| "none".to_string());
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                if on_input { " > " } else { "   " },
                Style::default().fg(ACCENT_GOLD),
            ),
            Span::styled(
                format!("{:<18}", "Resume path"),
                Style::default().fg(if on_input { BRAND_GOLD } else { Color::DarkGray }),
            ),
            Span::styled(
                format!("{}{}", screen.resume_input, if on_input { "▏" } else { "" }),
                Style::default().fg(Color::White),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   Selected: {}  (.pdf, .doc, .docx)", selected),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn render_dashboard(f: &mut Frame, app: &App) {
    let screen = &app.dashboard;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(4), // stats
            Constraint::Min(6),    // tables
            Constraint::Length(7), // ATS
            Constraint::Length(2), // notice + footer
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            Route::Dashboard.title(),
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if app.session.is_authenticated() {
                "   signed in"
            } else {
                "   not signed in"
            },
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(BRAND_BLUE)));
    f.render_widget(header, chunks[0]);

    let stat_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, screen.data.stats.len().max(1) as u32);
            screen.data.stats.len()
        ])
        .split(chunks[1]);
    for (stat, area) in screen.data.stats.iter().zip(stat_areas.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            stat.value.to_string(),
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(card(stat.label));
        f.render_widget(widget, *area);
    }

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    let header_style = Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD);
    let applications = Table::new(
        screen
            .data
            .applications
            .iter()
            .map(|row| Row::new(vec![Cell::from(row.company), Cell::from(row.role), Cell::from(row.status)])),
        [
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(35),
        ],
    )
    .header(Row::new(vec!["Company", "Role", "Status"]).style(header_style))
    .block(card("Application Tracking"));
    f.render_widget(applications, tables[0]);

    let interviews = Table::new(
        screen.data.interviews.iter().map(|i| {
            Row::new(vec![
                Cell::from(format!("{} {}", i.company, i.round)),
                Cell::from(format!("{} {}", i.date, i.time)),
            ])
        }),
        [Constraint::Percentage(50), Constraint::Percentage(50)],
    )
    .header(Row::new(vec!["Interview", "When"]).style(header_style))
    .block(card("Upcoming Interviews"));
    f.render_widget(interviews, tables[1]);

    f.render_widget(Paragraph::new(ats_lines(app)).block(card("Resume ATS Check")), chunks[3]);

    let mut bottom = vec![match &app.notice {
        Some(notice) => notice_line(notice),
        None => Line::from(""),
    }];
    bottom.push(if screen.editing_resume {
        footer(&[("Esc", "Cancel"), ("Enter", "Select Resume")])
    } else {
        footer(&[
            ("U", "Upload Resume"),
            ("A", "Check ATS"),
            ("P", "Edit Profile"),
            ("O", "Logout"),
            ("Q", "Quit"),
        ])
    });
    f.render_widget(Paragraph::new(bottom), chunks[4]);
}

fn ats_lines(app: &App) -> Vec<Line<'static>> {
    let screen = &app.dashboard;
    let mut lines = Vec::new();

    let resume = screen
        .ats
        .resume()
        .map(|r| r.file_name.clone())
        .unwrap_or_else(|| "no resume selected".to_string());
    lines.push(Line::from(vec![
        Span::styled(" Resume: ", Style::default().fg(Color::DarkGray)),
        Span::styled(resume, Style::default().fg(Color::White)),
    ]));

    if screen.editing_resume {
        lines.push(Line::from(vec![
            Span::styled(" Path:   ", Style::default().fg(BRAND_GOLD)),
            Span::styled(
                format!("{}▏", screen.resume_input),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    if let Some(report) = screen.ats.report() {
        lines.push(Line::from(Span::styled(
            format!(" ATS Score: {}%", report.score),
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled(" Matched: ", Style::default().fg(Color::Green)),
            Span::raw(report.matched.join(", ")),
        ]));
        lines.push(Line::from(vec![
            Span::styled(" Missing: ", Style::default().fg(Color::Red)),
            Span::raw(report.missing.join(", ")),
        ]));
    }
    lines
}
