mod app;
mod catalog;
mod config;
mod engine;
mod event;
mod session;
mod store;
mod ui;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use session::SessionMode;
use ui::answer_input::InputResult;
use ui::components::progress_bar::ProgressBar;
use ui::components::summary::SessionSummary;
use ui::components::word_card::WordCard;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

const LOG_ENV: &str = "UNA_WORDS_LOG";
const LOG_FILE: &str = "una-words.log";
const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "una-words", version, about = "Terminal vocabulary drill with adaptive word selection")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory with meta.json, library.json and packs.json")]
    data_dir: Option<String>,

    #[arg(short, long, help = "Pack id to select on startup")]
    pack: Option<String>,
}

fn open_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

fn init_logging(dir: &Path) -> Result<()> {
    let file = open_log_file(dir)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| "una_words=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    // The terminal belongs to the UI, so logs go to a file or nowhere.
    if let Err(e) = init_logging(&config.progress_path()) {
        eprintln!("una-words: logging disabled: {e:#}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let mut app = App::new(config);
    if let Some(pack) = cli.pack {
        if !app.select_pack_by_id(&pack) {
            tracing::warn!(pack = %pack, "requested pack not in catalog");
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "ui loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Quit => app.should_quit = true,
            AppEvent::Tick(now) => app.on_tick(now),
            AppEvent::Redraw => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::PackSelect => handle_pack_key(app, key),
        AppScreen::ConfirmReset => handle_confirm_key(app, key),
        AppScreen::Practice | AppScreen::Quiz => handle_session_key(app, key),
        AppScreen::Reward | AppScreen::QuizResult => handle_result_key(app, key),
        AppScreen::EmptySession => handle_empty_key(app, key),
        AppScreen::BootError => handle_error_key(app, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_practice_session(),
        KeyCode::Char('2') => app.start_quiz_session(),
        KeyCode::Char('p') => app.go_to_pack_select(),
        KeyCode::Char('r') => app.confirm_reset(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.start_practice_session(),
            1 => app.start_quiz_session(),
            2 => app.go_to_pack_select(),
            3 => app.confirm_reset(),
            _ => {}
        },
        _ => {}
    }
}

fn handle_pack_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') => app.pack_menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.pack_menu.next(),
        KeyCode::Enter => app.select_pack(app.pack_menu.selected),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            app.select_pack(index);
        }
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.reset_progress(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}

fn handle_session_key(app: &mut App, key: KeyEvent) {
    if app.is_input_locked() {
        if key.code == KeyCode::Esc {
            app.go_home();
        }
        return;
    }
    match app.input.handle(key) {
        InputResult::Submit => app.submit_answer(Instant::now()),
        InputResult::Hint => app.request_hint(),
        InputResult::Cancel => app.go_home(),
        InputResult::Continue => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_session(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_home(),
        _ => {}
    }
}

fn handle_empty_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('p') => app.go_to_pack_select(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_home(),
        _ => {}
    }
}

fn handle_error_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
        app.should_quit = true;
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::PackSelect => render_pack_select(frame, app),
        AppScreen::ConfirmReset => {
            render_home(frame, app);
            render_confirm_reset(frame, app);
        }
        AppScreen::Practice | AppScreen::Quiz => render_session(frame, app),
        AppScreen::Reward | AppScreen::QuizResult | AppScreen::EmptySession => {
            render_summary(frame, app)
        }
        AppScreen::BootError => render_boot_error(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let info = format!(
        " \u{2605} {} | {} ",
        app.progress.stars(),
        app.selected_pack_title()
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " una-words ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.star()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.text_dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn footer_height(hints: &[&str], width: u16) -> u16 {
    pack_hint_lines(hints, width as usize).len().max(1) as u16
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let hints = ["[1] Practice", "[2] Quiz", "[p] Pack", "[r] Reset", "[q] Quit"];
    let layout = AppLayout::new(area, footer_height(&hints, area.width));

    render_header(frame, app, layout.header);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(layout.main);

    let menu_area = centered_rect(50, 90, body[0]);
    frame.render_widget(&app.menu, menu_area);

    if let Some(catalog) = app.catalog.as_ref() {
        let dim = Style::default().fg(colors.text_dim());
        let value = Style::default().fg(colors.fg());
        let info = vec![
            Line::from(vec![
                Span::styled("Pack: ", dim),
                Span::styled(app.selected_pack_title(), Style::default().fg(colors.accent())),
                Span::styled("   Stars: ", dim),
                Span::styled(format!("{}", app.progress.stars()), Style::default().fg(colors.star())),
            ]),
            Line::from(vec![
                Span::styled("Data version: ", dim),
                Span::styled(format!("{}", catalog.meta.data_version), value),
                Span::styled("   Updated: ", dim),
                Span::styled(catalog.meta.updated_label(), value),
            ]),
            Line::from(Span::styled(
                format!("Build {}", env!("CARGO_PKG_VERSION")),
                dim,
            )),
        ];
        frame.render_widget(Paragraph::new(info).alignment(Alignment::Center), body[1]);
    }

    render_footer(frame, app, layout.footer, &hints);
}

fn render_pack_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let hints = ["[\u{2191}\u{2193}] Move", "[Enter/1-9] Select", "[Esc] Back"];
    let layout = AppLayout::new(area, footer_height(&hints, area.width));

    render_header(frame, app, layout.header);
    let menu_area = centered_rect(50, 90, layout.main);
    frame.render_widget(&app.pack_menu, menu_area);
    render_footer(frame, app, layout.footer, &hints);
}

fn render_confirm_reset(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let popup = centered_rect(40, 30, frame.area());
    frame.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Reset Progress ")
        .border_style(Style::default().fg(colors.error()))
        .style(Style::default().bg(colors.bg()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Erase all word scores and stars?",
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(colors.text_dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Reset  ", Style::default().fg(colors.error())),
            Span::styled("[n] Cancel", Style::default().fg(colors.accent())),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        popup,
    );
}

fn render_session(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let mode = app.drill.as_ref().map(|d| d.mode()).unwrap_or(SessionMode::Practice);
    let quiz_score = app.drill.as_ref().map(|d| d.quiz_score()).unwrap_or(0);
    let hints: &[&str] = match mode {
        SessionMode::Practice => &["[Enter] Submit", "[Tab] Hint", "[Esc] Home"],
        SessionMode::Quiz => &["[Enter] Submit", "[Esc] Home"],
    };
    let layout = AppLayout::new(area, footer_height(hints, area.width));

    render_header(frame, app, layout.header);
    render_footer(frame, app, layout.footer, hints);

    let card_area = centered_rect(60, 80, layout.main);
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(card_area);

    let theme = app.theme;
    let locked = app.is_input_locked();
    let feedback = app.feedback;
    let input = app.input.clone();
    let Some(view) = app.current_view() else {
        return;
    };
    let (position, total) = view.position;
    let done = if locked { position } else { position.saturating_sub(1) };

    let card = WordCard::new(&view, mode, &input, theme)
        .quiz_score(quiz_score)
        .feedback(feedback)
        .locked(locked);
    frame.render_widget(card, split[0]);
    frame.render_widget(ProgressBar::new("Words", done, total, theme), split[1]);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area, 1);
    render_header(frame, app, layout.header);

    if let Some(end) = app.last_end {
        let title = app.selected_pack_title();
        let popup = centered_rect(50, 60, layout.main);
        frame.render_widget(SessionSummary::new(end, &title, app.theme), popup);
    }
}

fn render_boot_error(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let popup = centered_rect(60, 40, frame.area());
    let message = app.boot_error.as_deref().unwrap_or("unknown error");

    let block = Block::bordered()
        .title(" Could not load word data ")
        .border_style(Style::default().fg(colors.error()))
        .style(Style::default().bg(colors.bg()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(colors.error()))),
        Line::from(""),
        Line::from(Span::styled(
            "Check data_dir in config.toml or --data-dir.",
            Style::default().fg(colors.text_dim()),
        )),
        Line::from(""),
        Line::from(Span::styled("[q] Quit", Style::default().fg(colors.accent()))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        popup,
    );
}
