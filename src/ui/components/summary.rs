use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::drill::SessionEnd;
use crate::session::quiz::PASS_THRESHOLD;
use crate::ui::theme::Theme;

/// End-of-session card: reward, quiz result, or the empty-pack notice.
pub struct SessionSummary<'a> {
    pub end: SessionEnd,
    pub pack_title: &'a str,
    pub theme: &'a Theme,
}

impl<'a> SessionSummary<'a> {
    pub fn new(end: SessionEnd, pack_title: &'a str, theme: &'a Theme) -> Self {
        Self {
            end,
            pack_title,
            theme,
        }
    }

    fn title(&self) -> &'static str {
        match self.end {
            SessionEnd::Empty => " Nothing to Practice ",
            SessionEnd::PracticeComplete { .. } => " Session Complete ",
            SessionEnd::QuizFinished { passed: true, .. } => " Quiz Passed ",
            SessionEnd::QuizFinished { passed: false, .. } => " Quiz Result ",
        }
    }

    fn body(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_dim());
        let star = Style::default().fg(colors.star()).add_modifier(Modifier::BOLD);
        let pack_line = Line::from(vec![
            Span::styled("  Pack:   ", label),
            Span::styled(self.pack_title, Style::default().fg(colors.accent())),
        ]);

        match self.end {
            SessionEnd::Empty => vec![
                pack_line,
                Line::from(""),
                Line::from(Span::styled(
                    "  This pack has no words to drill right now.",
                    Style::default().fg(colors.warning()),
                )),
                Line::from(Span::styled("  Pick another pack from the menu.", dim)),
            ],
            SessionEnd::PracticeComplete { stars } => vec![
                pack_line,
                Line::from(""),
                Line::from(vec![
                    Span::styled("  Reward: ", label),
                    Span::styled("+1 \u{2605}", star),
                ]),
                Line::from(vec![
                    Span::styled("  Stars:  ", label),
                    Span::styled(format!("{stars}"), star),
                ]),
            ],
            SessionEnd::QuizFinished {
                score,
                passed,
                stars,
            } => {
                let (verdict, color) = if passed {
                    ("PASS", colors.success())
                } else {
                    ("FAIL", colors.error())
                };
                let mut lines = vec![
                    pack_line,
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("  Score:  ", label),
                        Span::styled(
                            format!("{score}"),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("  (pass {PASS_THRESHOLD})"), dim),
                    ]),
                    Line::from(vec![
                        Span::styled("  Result: ", label),
                        Span::styled(
                            verdict,
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                ];
                if passed {
                    lines.push(Line::from(vec![
                        Span::styled("  Stars:  ", label),
                        Span::styled(format!("{stars} (+1 \u{2605})"), star),
                    ]));
                }
                lines
            }
        }
    }

    fn help(&self) -> Line<'static> {
        let accent = Style::default().fg(self.theme.colors.accent());
        match self.end {
            SessionEnd::QuizFinished { .. } => Line::from(vec![
                Span::styled("  [r] Retry quiz  ", accent),
                Span::styled("[Enter/q] Home", accent),
            ]),
            SessionEnd::PracticeComplete { .. } => Line::from(vec![
                Span::styled("  [r] Practice again  ", accent),
                Span::styled("[Enter/q] Home", accent),
            ]),
            SessionEnd::Empty => Line::from(Span::styled("  [Enter/q] Home", accent)),
        }
    }
}

impl Widget for SessionSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(self.title())
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let heading = match self.end {
            SessionEnd::Empty => "Empty session",
            _ => "Results",
        };
        Paragraph::new(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(self.body()).render(layout[1], buf);
        Paragraph::new(self.help()).render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(end: SessionEnd) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 50, 12);
        let mut buf = Buffer::empty(area);
        SessionSummary::new(end, "Week 1", &theme).render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn failed_quiz_shows_literal_score() {
        let text = rendered(SessionEnd::QuizFinished {
            score: 70,
            passed: false,
            stars: 2,
        });
        assert!(text.contains("Quiz Result"));
        assert!(text.contains("Score:  70"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("Retry quiz"));
        assert!(!text.contains("Stars:"));
    }

    #[test]
    fn practice_reward_shows_star_total() {
        let text = rendered(SessionEnd::PracticeComplete { stars: 4 });
        assert!(text.contains("Session Complete"));
        assert!(text.contains("Stars:  4"));
        assert!(text.contains("Week 1"));
    }

    #[test]
    fn empty_session_has_no_reward() {
        let text = rendered(SessionEnd::Empty);
        assert!(text.contains("Nothing to Practice"));
        assert!(!text.contains("Reward"));
    }
}
