use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_error<B: Backend>(frame: &mut Frame<B>, error: &str) {
    let popup_area = centered_rect(60, 25, frame.size());

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_msg, popup_area);
}

pub fn render_confirm<B: Backend>(frame: &mut Frame<B>, question: &str, detail: &str) {
    let popup_area = centered_rect(50, 25, frame.size());

    let body = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(question, Style::default().add_modifier(Modifier::BOLD))),
        Spans::from(detail),
        Spans::from(""),
        Spans::from("<Y> Yes | any other key - No"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title("Confirm").borders(Borders::ALL))
    .style(Style::default().fg(Color::Yellow))
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(body, popup_area);
}

/// Rectangle of the given percentage size centred in `r`
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
