use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};

use super::models::SelectState;

pub fn ui(f: &mut Frame, state: &mut SelectState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
        .split(f.area());

    render_header(f, chunks[0], state);
    render_options(f, chunks[1], state);
    render_controls(f, chunks[2]);

    if state.show_help {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &SelectState) {
    let header = Paragraph::new(state.message.as_str())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("tvdb-rename")
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn render_options(f: &mut Frame, area: Rect, state: &mut SelectState) {
    let items: Vec<ListItem> = state
        .labels
        .iter()
        .map(|label| ListItem::new(Line::from(Span::styled(label.clone(), Style::default().fg(Color::White)))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("{} choices", state.labels.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut state.list_state);

    if state.labels.len() > area.height.saturating_sub(2) as usize {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut state.scroll_state,
        );
    }
}

fn render_controls(f: &mut Frame, area: Rect) {
    let controls = Paragraph::new("Up/Down to move, Enter to choose, h for help, Esc to cancel")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(controls, area);
}

fn render_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(60, 50, f.area());

    let help_text = vec![
        Line::from(Span::styled("Choosing a match", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Up/k, Down/j   - Move"),
        Line::from("  PgUp, PgDn     - Move a page"),
        Line::from("  Home/g, End/G  - First / last option"),
        Line::from("  Enter/Space    - Choose highlighted option"),
        Line::from("  Esc/q/Ctrl-C   - Cancel, nothing is renamed"),
        Line::from(""),
        Line::from("Options show the similarity score (0-1)."),
        Line::from("Choose \"skip\" to leave a file as it is."),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
