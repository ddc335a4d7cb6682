use crate::app::{App, FocusPane, PromptMode};
use middl_core::{Card, CellPos, Phase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(10),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(root[1]);

    let grid_height = app.round.grid.height() as u16 + 2;
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(grid_height), Constraint::Min(4)])
        .split(middle[0]);

    draw_grid(frame, left[0], app);
    draw_players(frame, left[1], app);
    draw_methods(frame, middle[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
    if app.prompt_mode.is_some() {
        draw_prompt(frame, app);
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Setup => "setup",
        Phase::Running => "dealing",
        Phase::Finished => "finished",
        Phase::Aborted => "aborted",
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Middl | Focus: {} | Hint: {}",
        app.focus_label(app.focus),
        app.next_hint()
    );
    let summary = format!(
        "{}  pot {}$  casino {}$  players {}$  tick {}  seed {}",
        phase_label(app.round.phase()),
        app.round.pot(),
        app.round.casino(),
        app.round.roster.total_chips(),
        app.round.state.ticks,
        app.round.seed()
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn card_style(card: &Card) -> Style {
    if card.is_red() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let grid = &app.round.grid;
    let winning: Vec<CellPos> = match (&app.round.state.last_win, app.round.phase()) {
        (Some(win), Phase::Finished) => win.cells.clone(),
        _ => Vec::new(),
    };
    let cursor = grid.cursor();
    let lines: Vec<Line<'_>> = grid
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span<'_>> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let at = CellPos::new(row, col);
                    let (text, mut style) = match cell {
                        Some(card) => (format!("{:^5}", card.short()), card_style(card)),
                        None => ("  .  ".to_string(), Style::default().fg(Color::DarkGray)),
                    };
                    if winning.contains(&at) {
                        style = style.bg(Color::Yellow).fg(Color::Black).add_modifier(Modifier::BOLD);
                    } else if app.round.is_running() && at == cursor {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Grid");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_players(frame: &mut Frame, area: Rect, app: &App) {
    let length = app.round.config.sequence_length;
    let items: Vec<ListItem<'_>> = if app.round.roster.is_empty() {
        vec![ListItem::new("no players (a to add)")]
    } else {
        app.round
            .roster
            .iter()
            .map(|player| {
                let marker = if !player.enabled {
                    "off"
                } else if player.is_contender(length) {
                    "in "
                } else {
                    "   "
                };
                let sequence = if player.has_sequence() {
                    player.sequence_label()
                } else {
                    "-".to_string()
                };
                let line = format!(
                    "[{marker}] {} {}$ : {sequence}",
                    player.name, player.chips
                );
                let style = if player.enabled {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(line).style(style)
            })
            .collect()
    };
    let block = pane_block("Players", app.focus == FocusPane::Players);
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style())
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if !app.round.roster.is_empty() {
        state.select(Some(app.player_cursor.min(app.round.roster.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_methods(frame: &mut Frame, area: Rect, app: &App) {
    let methods = app.visible_methods();
    let items: Vec<ListItem<'_>> = if methods.is_empty() {
        vec![ListItem::new("no method matches the filter")]
    } else {
        methods
            .iter()
            .map(|method| {
                ListItem::new(format!(
                    "{:>4}$ {:>5.1}%  {}",
                    method.price,
                    method.probability() * 100.0,
                    method.label()
                ))
            })
            .collect()
    };
    let mut title = format!("Methods ({})", methods.len());
    if !app.method_filter.is_empty() {
        title.push_str(&format!(" /{}", app.method_filter));
    }
    if let Some(picker) = &app.picker {
        let picked: Vec<String> = picker.picks.iter().map(|m| m.label()).collect();
        title.push_str(&format!(
            " | picking {}/{}: {}",
            picker.picks.len() + 1,
            app.round.config.sequence_length,
            picked.join(", ")
        ));
    }
    let block = pane_block(title.as_str(), app.focus == FocusPane::Methods);
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style())
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    if !methods.is_empty() {
        state.select(Some(app.method_cursor.min(methods.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = pane_block("Events", app.focus == FocusPane::Events);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("q quit | ? help | tab focus | arrows/jk move"),
        Line::from("a add player | x remove | e enable/disable"),
        Line::from("enter on a player: pick a sequence"),
        Line::from("enter on a method: add it to the sequence | esc skip"),
        Line::from("/ filter methods"),
        Line::from("g start round | c stop round"),
        Line::from("Shift+S/Ctrl+S save roster | Shift+L/Ctrl+L load roster"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_prompt(frame: &mut Frame, app: &App) {
    let Some(mode) = app.prompt_mode else {
        return;
    };
    let area = centered_rect(70, 28, frame.area());
    frame.render_widget(Clear, area);
    let (title, hint) = match mode {
        PromptMode::AddPlayer => ("New Player", "Enter=add  Esc=cancel"),
        PromptMode::Filter => ("Filter Methods", "Enter=apply (empty clears)  Esc=cancel"),
        PromptMode::Save => ("Save Roster", "Enter=save  Esc=cancel"),
        PromptMode::Load => ("Load Roster", "Enter=load  Esc=cancel"),
    };
    let mut lines = vec![Line::from(hint)];
    if matches!(mode, PromptMode::Save | PromptMode::Load) {
        lines.push(Line::from("Leave empty to use default path:"));
        lines.push(Line::from(format!("  {}", app.prompt_default_path_hint())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("> {}", app.prompt_input)));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
