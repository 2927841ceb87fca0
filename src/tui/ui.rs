//! UI rendering for the debugger.

use super::app::DebuggerApp;
use crate::vm::MachineState;
use num_traits::Zero;
use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &DebuggerApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    // Left side: code, machine and status
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(6), Constraint::Length(3)])
        .split(chunks[0]);

    draw_disassembly(frame, left_chunks[0], app);
    draw_machine(frame, left_chunks[1], app);
    draw_status(frame, left_chunks[2], app);

    // Right side: memory, output and help
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(6), Constraint::Length(4)])
        .split(chunks[1]);

    draw_memory(frame, right_chunks[0], app);
    draw_output(frame, right_chunks[1], app);
    draw_help(frame, right_chunks[2]);
}

fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let disasm = app.get_disassembly((area.height as usize).saturating_sub(2));

    let items: Vec<ListItem> = disasm
        .iter()
        .map(|(addr, instr, is_current)| {
            let prefix = if *is_current { "▶ " } else { "  " };
            let bp = if app.breakpoints.contains(addr) { "●" } else { " " };
            let text = format!("{}{:04}: {}", prefix, addr, instr);

            let style = if *is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if app.breakpoints.contains(addr) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            ListItem::new(format!("{} {}", bp, text)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Disassembly ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}

fn draw_machine(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let exec = &app.exec;
    let state_style = match exec.state() {
        MachineState::Running => Style::default().fg(Color::Green),
        MachineState::Halted => Style::default().fg(Color::Red),
    };

    let content = vec![
        Line::from(vec![
            Span::raw("IP: "),
            Span::styled(format!("{:04}", exec.instruction_pointer()), Style::default().fg(Color::Yellow)),
            Span::raw("   RB: "),
            Span::styled(exec.relative_base().to_string(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::raw("Steps: "),
            Span::styled(exec.steps().to_string(), Style::default().fg(Color::Cyan)),
            Span::raw("   State: "),
            Span::styled(format!("{:?}", exec.state()), state_style),
        ]),
        Line::from(vec![
            Span::raw("Memory: "),
            Span::raw(format!("{} cells", exec.memory().len())),
            Span::raw("   Input left: "),
            Span::raw(exec.io().input.remaining().to_string()),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .title(" Machine ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(paragraph, area);
}

fn draw_memory(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let memory = app.exec.memory();
    let visible_rows = (area.height as usize).saturating_sub(2);
    let start = app.mem_scroll.min(memory.len());
    let end = (start + visible_rows).min(memory.len());
    let ip = app.exec.instruction_pointer();

    let items: Vec<ListItem> = (start..end)
        .map(|addr| {
            let value = memory.read(addr);
            let text = format!("{:04}: {}", addr, value);

            let style = if addr == ip {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if !value.is_zero() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Memory ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(list, area);
}

fn draw_output(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let values = app.exec.io().output.values();
    let visible = (area.height as usize).saturating_sub(2);
    let skip = values.len().saturating_sub(visible);
    let lines: Vec<Line> = values.iter().skip(skip).map(|v| Line::from(v.to_string())).collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" Output ({}) ", values.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let status = Paragraph::new(app.status.clone())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title(" Status ").borders(Borders::ALL));

    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s: Step  r: Run  p: Pause  b: Breakpoint"),
        Line::from("x: Reset  ↑↓: Scroll memory  q: Quit"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().title(" Help ").borders(Borders::ALL));

    frame.render_widget(help, area);
}
