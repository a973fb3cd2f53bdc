use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::Feedback;
use crate::session::SessionMode;
use crate::session::drill::WordView;
use crate::session::hint::MAX_HINTS;
use crate::session::quiz::PASS_THRESHOLD;
use crate::ui::answer_input::AnswerInput;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

const NO_PHONETIC: &str = "(no phonetic)";

/// The current word: meaning, phonetic, mask, counters and the answer field.
pub struct WordCard<'a> {
    view: &'a WordView<'a>,
    mode: SessionMode,
    quiz_score: u32,
    input: &'a AnswerInput,
    feedback: Option<Feedback>,
    locked: bool,
    theme: &'a Theme,
}

impl<'a> WordCard<'a> {
    pub fn new(
        view: &'a WordView<'a>,
        mode: SessionMode,
        input: &'a AnswerInput,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            mode,
            quiz_score: 0,
            input,
            feedback: None,
            locked: false,
            theme,
        }
    }

    pub fn quiz_score(mut self, score: u32) -> Self {
        self.quiz_score = score;
        self
    }

    pub fn feedback(mut self, feedback: Option<Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    fn counter_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        match self.mode {
            SessionMode::Practice => Line::from(vec![
                Span::styled("Hints ", Style::default().fg(colors.text_dim())),
                Span::styled(
                    format!("{}/{}", self.view.hints_used, MAX_HINTS),
                    Style::default().fg(colors.hint()),
                ),
            ]),
            SessionMode::Quiz => {
                let score_color = if self.quiz_score >= PASS_THRESHOLD {
                    colors.success()
                } else {
                    colors.error()
                };
                Line::from(vec![
                    Span::styled("Score ", Style::default().fg(colors.text_dim())),
                    Span::styled(
                        format!("{}", self.quiz_score),
                        Style::default().fg(score_color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  (pass {PASS_THRESHOLD})"),
                        Style::default().fg(colors.text_dim()),
                    ),
                ])
            }
        }
    }

    fn feedback_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let (text, color) = match self.feedback {
            Some(Feedback::Correct) => ("Correct!", colors.success()),
            Some(Feedback::Wrong) => ("Not quite, try again", colors.error()),
            Some(Feedback::Blank) => ("Type an answer first", colors.warning()),
            Some(Feedback::HintRevealed) => ("Hint used (-5)", colors.hint()),
            Some(Feedback::HintsExhausted) => ("No hints left for this word", colors.warning()),
            None => ("", colors.fg()),
        };
        Line::from(Span::styled(text, Style::default().fg(color)))
    }

    fn input_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let (before, cursor, after) = self.input.render_parts();
        let text_style = Style::default().fg(if self.locked {
            colors.text_dim()
        } else {
            colors.fg()
        });
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());

        let mut spans = vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before, text_style),
        ];
        match cursor {
            Some(ch) if !self.locked => {
                spans.push(Span::styled(ch.to_string(), cursor_style));
                spans.push(Span::styled(after, text_style));
            }
            Some(ch) => {
                spans.push(Span::styled(ch.to_string(), text_style));
                spans.push(Span::styled(after, text_style));
            }
            None if !self.locked => spans.push(Span::styled(" ", cursor_style)),
            None => {}
        }
        Line::from(spans)
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (pos, total) = self.view.position;
        let title = match self.mode {
            SessionMode::Practice => format!(" Practice {pos}/{total} "),
            SessionMode::Quiz => format!(" Quiz {pos}/{total} "),
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.locked {
                colors.success()
            } else {
                colors.border_focused()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let meaning = &self.view.entry.meaning;
        let meaning_rows = wrapped_line_count(meaning, inner.width as usize).clamp(1, 4) as u16;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(meaning_rows),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            &**meaning,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let phonetic = match self.view.entry.phonetic() {
            Some(p) => Span::styled(p, Style::default().fg(colors.accent())),
            None => Span::styled(NO_PHONETIC, Style::default().fg(colors.text_dim())),
        };
        Paragraph::new(Line::from(phonetic))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            &*self.view.mask,
            Style::default().fg(colors.hint()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[4], buf);

        Paragraph::new(self.counter_line())
            .alignment(Alignment::Center)
            .render(layout[5], buf);

        Paragraph::new(self.input_line()).render(layout[6], buf);

        Paragraph::new(self.feedback_line())
            .alignment(Alignment::Center)
            .render(layout[7], buf);
    }
}
