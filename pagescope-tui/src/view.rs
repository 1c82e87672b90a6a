use crate::{App, Focus, LogLevel};
use pagescope_core::display::{
    error_label, heading_label, load_more_label, progress_line, status_label, truncate_url,
    url_counts_line, yes_no,
};
use pagescope_core::{FetchStatus, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(crate) fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // URL input
            Constraint::Length(1), // Banner
            Constraint::Min(8),    // Results
            Constraint::Length(1), // Load more hint
            Constraint::Length(7), // Logs
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_input(f, app, chunks[0]);
    render_banner(f, app, chunks[1]);

    match app.state.session() {
        Some(session) => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[2]);
            render_summary(f, session, body[0]);
            render_urls(f, app, session, body[1]);
        }
        None => render_welcome(f, chunks[2]),
    }

    render_load_more(f, app, chunks[3]);
    render_logs(f, app, chunks[4]);
    render_hints(f, app, chunks[5]);
}

fn border_color(active: bool) -> Color {
    if active { Color::Cyan } else { Color::DarkGray }
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" URL ")
        .border_style(Style::default().fg(border_color(focused)));

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(block);
    f.render_widget(input, area);

    if focused {
        f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
    }
}

fn render_banner(f: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER[app.tick % SPINNER.len()];
    let mut spans = match app.state.status() {
        FetchStatus::LoadingInitial => vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" Scraping...  "),
        ],
        FetchStatus::LoadingMore => vec![
            Span::styled(spinner, Style::default().fg(Color::Cyan)),
            Span::raw(" Loading more URLs...  "),
        ],
        FetchStatus::Idle => Vec::new(),
    };

    // The last error stays visible while a retry is in flight
    match app.state.error() {
        Some(error) => spans.push(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None if !app.state.is_loading() => {
            if let Some(target) = app.target() {
                spans.push(Span::styled("Target: ", Style::default().fg(Color::DarkGray)));
                spans.push(Span::styled(target.to_string(), Style::default().fg(Color::Cyan)));
            }
        }
        None => {}
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" pagescope ")
        .border_style(Style::default().fg(Color::DarkGray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Type a URL and press Enter to scrape it.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Results arrive one page at a time. Switch to the results with Tab"),
        Line::from("and press m to load the next page."),
    ];

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn label(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn render_summary(f: &mut Frame, session: &SessionState, area: Rect) {
    let headings = session.summary.headings.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5 + headings), Constraint::Min(7)])
        .split(area);

    let summary = &session.summary;
    let mut info = vec![
        label("Title", summary.title.clone()),
        label("HTML Version", summary.html_version.clone()),
    ];
    for (level, count) in &summary.headings {
        info.push(label(&heading_label(level), count.to_string()));
    }
    info.push(label(
        "Contains Login Form",
        yes_no(summary.contains_login_form).to_string(),
    ));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Page Information ")
        .border_style(Style::default().fg(Color::Blue));
    f.render_widget(
        Paragraph::new(info).block(block).wrap(Wrap { trim: true }),
        chunks[0],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" URL Insights ")
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let progress = session.progress();
    let text = vec![
        Line::from(url_counts_line(summary)),
        Line::from(""),
        Line::from(progress_line(session)),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), rows[0]);

    let ratio = if progress.total == 0 {
        1.0
    } else {
        progress.accessed as f64 / progress.total as f64
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "page {} of {}",
            session.latest_pagination.current_page, session.latest_pagination.total_pages
        ));
    f.render_widget(gauge, rows[1]);
}

fn render_urls(f: &mut Frame, app: &App, session: &SessionState, area: Rect) {
    let focused = app.focus == Focus::Results;
    let total = session.accumulated_urls.len();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" URLs ({}) ", total))
        .border_style(Style::default().fg(border_color(focused)));

    // Header row and borders
    let height = area.height.saturating_sub(3) as usize;

    // Keep the selection visible, otherwise honour manual scrolling
    let scroll_offset = match app.selected_url {
        Some(selected) if selected >= app.scroll_urls + height => selected + 1 - height,
        Some(selected) if selected < app.scroll_urls => selected,
        _ => app.scroll_urls,
    }
    .min(total.saturating_sub(height));

    let rows: Vec<Row> = session
        .accumulated_urls
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(height)
        .map(|(idx, record)| {
            let status_style = if record.is_success() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            let row = Row::new(vec![
                Cell::from((idx + 1).to_string()),
                Cell::from(truncate_url(&record.url)),
                Cell::from(status_label(record)).style(status_style),
                Cell::from(error_label(record).to_string()),
            ]);
            if app.selected_url == Some(idx) {
                row.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["#", "URL", "Status", "Error"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(30),
            Constraint::Length(13),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

fn render_load_more(f: &mut Frame, app: &App, area: Rect) {
    if app.state.is_loading() {
        return;
    }
    let Some(session) = app.state.session() else {
        return;
    };
    if !session.has_more() {
        return;
    }

    let hint = Line::from(vec![
        Span::styled(" m ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(
            load_more_label(&session.progress()),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    f.render_widget(Paragraph::new(hint), area);
}

fn render_logs(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Logs ")
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .skip(app.logs.len().saturating_sub(height))
        .map(|(stamp, level, message)| {
            let (prefix, style) = match level {
                LogLevel::Info => ("INFO ", Style::default().fg(Color::Blue)),
                LogLevel::Warn => ("WARN ", Style::default().fg(Color::Yellow)),
                LogLevel::Error => ("ERROR", Style::default().fg(Color::Red)),
            };
            ListItem::new(format!("{} [{}] {}", stamp, prefix, message)).style(style)
        })
        .collect();

    f.render_widget(List::new(items), inner);
}

fn key(name: &str) -> Span<'static> {
    Span::styled(
        format!(" {} ", name),
        Style::default().fg(Color::Black).bg(Color::Gray),
    )
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Input => Line::from(vec![
            key("Enter"),
            Span::raw(" Scrape  "),
            key("Tab"),
            Span::raw(" Results  "),
            key("Esc"),
            Span::raw(" Exit"),
        ]),
        Focus::Results => Line::from(vec![
            key("m"),
            Span::raw(" Load more  "),
            key("↑/↓"),
            Span::raw(" Select  "),
            key("PgUp/PgDn"),
            Span::raw(" Scroll  "),
            key("Home/End"),
            Span::raw(" Top/Bottom  "),
            key("Tab"),
            Span::raw(" Input  "),
            key("q/Esc"),
            Span::raw(" Exit"),
        ]),
    };

    let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}
