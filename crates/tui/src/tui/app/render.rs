use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::model::Priority;
use crate::parser::format_heading;
use crate::tui::buffer::TextBuffer;
use crate::tui::constants::APP_VERSION;
use crate::tui::form::{ConfirmChoice, DateForm, TaskField, TaskForm};
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, inset_rect, priority_color, BG_ACCENT,
    BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, Mode};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tasks(f, chunks[1]);
        self.draw_summary(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.mode() {
            Mode::Browsing if self.show_help => self.draw_help_overlay(f, size),
            Mode::Browsing => {}
            Mode::AddForm(form) => self.draw_task_form(f, size, "➕ Add Task", form),
            Mode::EditForm { form, .. } => self.draw_task_form(f, size, "✏️ Edit Task", form),
            Mode::ConfirmDelete { task, choice } => {
                let lines = vec![
                    Line::from(Span::styled(
                        "This action cannot be undone.",
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(Span::styled(
                        format!("Delete '{}'?", task.description),
                        Style::default().fg(Color::White),
                    )),
                ];
                self.draw_confirm_overlay(f, size, "🗑 Confirm Deletion", lines, *choice);
            }
            Mode::ConfirmCarry {
                candidates,
                target,
                choice,
            } => {
                let mut lines = vec![Line::from(Span::styled(
                    format!(
                        "Carry {} task(s) over to {}?",
                        candidates.len(),
                        format_heading(*target)
                    ),
                    Style::default().fg(Color::White),
                ))];
                for task in candidates.iter().take(6) {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{} ", task.priority),
                            Style::default().fg(priority_color(task.priority)),
                        ),
                        Span::raw(task.description.clone()),
                    ]));
                }
                if candidates.len() > 6 {
                    lines.push(Line::from(Span::styled(
                        format!("… and {} more", candidates.len() - 6),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                self.draw_confirm_overlay(f, size, "➡ Carry Over", lines, *choice);
            }
            Mode::ViewDateForm(form) => self.draw_date_form(f, size, form),
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" gtd v{} ✅ ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("📅 {}", format_heading(self.date())),
                Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("@{}", self.context()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.config.db_path().display()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(line).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        if self.tasks().is_empty() {
            let lines = self.empty_day_lines();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL));
            let inner = block.inner(area);
            f.render_widget(block, area);

            if inner.width == 0 || inner.height == 0 {
                return;
            }

            let width = inner.width.min(80).max(1);
            let height = (lines.len() as u16).saturating_add(2).min(inner.height);
            let content_area = centered_rect(width, height, inner);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(BG_PANEL)),
                content_area,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("Task"),
            Cell::from("Priority"),
            Cell::from("Time"),
            Cell::from("Done"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let row_style = if task.is_completed {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from((idx + 1).to_string()),
                    Cell::from(task.display_description()),
                    Cell::from(Span::styled(
                        task.priority.to_string(),
                        Style::default()
                            .fg(priority_color(task.priority))
                            .add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(task.time_estimate.clone()),
                    Cell::from(if task.is_completed { "✅" } else { "" }),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(5),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title(" Tasks "))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        self.table_state.select(self.selected());
        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn empty_day_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "No tasks for this day.",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press 'a' to add a task or 'g' to jump to another day.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if let Some(hint) = self.hint() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::Yellow),
            )));
        }
        lines
    }

    fn draw_summary(&self, f: &mut Frame<'_>, area: Rect) {
        let summary = self.summary();
        let style = if summary.total > 0 && summary.incomplete() == 0 {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", summary), style))),
            area,
        );
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = match (&self.status, self.status_text()) {
            (Some(status), Some(text)) => Line::from(Span::styled(
                format!("{}{}", status.prefix(), text),
                status.style(),
            )),
            _ => Line::from("Ready"),
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.mode() {
            Mode::Browsing if self.show_help => "Enter/Esc to close ❔",
            Mode::Browsing => {
                "j/k move | [/] day | t today | g go to date | a add | e edit | space done | x delete | c carry | i import | r refresh | h help | q quit"
            }
            Mode::AddForm(_) | Mode::EditForm { .. } => {
                "Tab/↑/↓ field • ←/→ or a-d priority • Enter next/save • Esc cancel"
            }
            Mode::ConfirmDelete { .. } | Mode::ConfirmCarry { .. } => {
                "←/→ choose • y/n answer • Enter confirm • Esc cancel"
            }
            Mode::ViewDateForm(_) => "Enter to go • Esc to cancel",
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                help,
                Style::default().fg(Color::DarkGray),
            ))),
            lines[1],
        );
    }

    fn draw_task_form(&self, f: &mut Frame<'_>, area: Rect, title: &str, form: &TaskForm) {
        let width = min(area.width.saturating_sub(10), 70);
        let popup_area = centered_rect(width, 13, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(title))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = inset_rect(block.inner(popup_area), 1);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        self.draw_text_field(
            f,
            rows[0],
            "Description",
            form.description(),
            form.focus() == TaskField::Description,
        );
        self.draw_priority_field(
            f,
            rows[1],
            form.priority(),
            form.focus() == TaskField::Priority,
        );
        self.draw_text_field(
            f,
            rows[2],
            "Time estimate",
            form.time_estimate(),
            form.focus() == TaskField::TimeEstimate,
        );
        if let Some(error) = form.error() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    format!("⚠️  {}", error),
                    Style::default().fg(Color::Red),
                )),
                rows[3],
            );
        }
    }

    fn draw_text_field(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        label: &str,
        buffer: &TextBuffer,
        focused: bool,
    ) {
        let border = if focused { FG_ACCENT } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(label.to_owned(), Style::default().fg(border)))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(BG_PANEL));
        let input_area = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(buffer.as_str()), input_area);

        if focused && input_area.width > 0 {
            let column = min(buffer.cursor() as u16, input_area.width.saturating_sub(1));
            f.set_cursor(input_area.x + column, input_area.y);
        }
    }

    fn draw_priority_field(&self, f: &mut Frame<'_>, area: Rect, priority: Priority, focused: bool) {
        let label_style = if focused {
            Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut spans = vec![
            Span::styled(" Priority  ", label_style),
            Span::styled("◀ ", label_style),
        ];
        for option in Priority::ALL {
            let style = if option == priority {
                Style::default()
                    .fg(priority_color(option))
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", option), style));
        }
        spans.push(Span::styled(" ▶  ", label_style));
        spans.push(Span::styled(
            priority.label(),
            Style::default().fg(priority_color(priority)),
        ));
        let line = Line::from(spans);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_date_form(&self, f: &mut Frame<'_>, area: Rect, form: &DateForm) {
        let width = min(area.width.saturating_sub(10), 60);
        let popup_area = centered_rect(width, 7, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("📅 View Date"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(inner);
        self.draw_text_field(f, rows[0], "Date", form.input(), true);
        let message = match form.error() {
            Some(error) => Span::styled(format!("⚠️  {}", error), Style::default().fg(Color::Red)),
            None => Span::styled(
                "e.g. 25/12/2025, 2025-12-25, tomorrow, -1w, fri",
                Style::default().fg(Color::DarkGray),
            ),
        };
        f.render_widget(Paragraph::new(message).wrap(Wrap { trim: true }), rows[1]);
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2));
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<16}", combo), Style::default().fg(Color::Cyan)),
                    Span::raw(desc),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(help_lines).style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_confirm_overlay(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        choice: ConfirmChoice,
    ) {
        let width = min(area.width.saturating_sub(20), 64).max(40);
        let height = lines.len() as u16 + 6;
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(title))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let yes_style = if choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let no_style = if choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("  Yes  ", yes_style),
            Span::raw("    "),
            Span::styled("  No  ", no_style),
        ]));

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}
