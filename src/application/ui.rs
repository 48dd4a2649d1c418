use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Alignment;
use ratatui::prelude::Constraint;
use ratatui::prelude::Direction;
use ratatui::prelude::Layout;
use ratatui::prelude::Line;
use ratatui::prelude::Rect;
use ratatui::prelude::Span;
use ratatui::prelude::Style;
use ratatui::prelude::Stylize;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::wrap_text;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ClinicalNote;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::NoteSource;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::Scroll;
use crate::domain::services::SessionState;

fn author_header(entry: &Message) -> Line<'static> {
    let style = match entry.author {
        Author::System => Style::new().dark_gray(),
        Author::Assistant => Style::new().cyan().bold(),
        Author::User => Style::new().green().bold(),
    };

    return Line::from(vec![
        Span::styled(entry.author.to_string(), style),
        Span::styled(
            format!("  {}", entry.created_at.format("%H:%M")),
            Style::new().dark_gray(),
        ),
    ]);
}

fn transcript_lines(state: &SessionState, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = vec![];

    for entry in state.transcript.entries() {
        lines.push(author_header(entry));
        for text_line in entry.as_string_lines(width) {
            lines.push(Line::from(text_line));
        }
        if entry.is_pending() {
            lines.push(Line::from(Span::styled("…", Style::new().dark_gray())));
        }
        lines.push(Line::from(""));
    }

    return lines;
}

fn scroll_max(line_count: usize, viewport: u16) -> u16 {
    return (line_count as u16).saturating_sub(viewport);
}

fn render_chat<B: Backend>(
    frame: &mut Frame<'_, B>,
    rect: Rect,
    state: &SessionState,
    scroll: &mut Scroll,
) {
    let width = (rect.width.saturating_sub(4) as usize).max(10);
    let lines = transcript_lines(state, width);
    scroll.clamp(scroll_max(lines.len(), rect.height.saturating_sub(2)));

    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("問診チャット")
                .padding(Padding::new(1, 1, 0, 0)),
        )
        .scroll((scroll.position, 0));

    frame.render_widget(transcript, rect);
}

fn render_waiting<B: Backend>(frame: &mut Frame<'_, B>, rect: Rect, ending: bool) {
    let label = if ending {
        "カルテを作成しています…"
    } else {
        "AI医師が回答中…"
    };

    frame.render_widget(
        Paragraph::new(label)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .alignment(Alignment::Center),
        rect,
    );
}

fn render_review<B: Backend>(
    frame: &mut Frame<'_, B>,
    state: &SessionState,
    note: &ClinicalNote,
    scroll: &mut Scroll,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Max(3)])
        .split(frame.size());

    let width = (layout[0].width.saturating_sub(4) as usize).max(10);
    let lines = wrap_text(&note.text, width)
        .into_iter()
        .map(Line::from)
        .collect::<Vec<Line>>();
    scroll.clamp(scroll_max(lines.len(), layout[0].height.saturating_sub(2)));

    let title = match note.source {
        NoteSource::Backend => "カルテ（確認用）",
        NoteSource::Fallback => "カルテ（定型テンプレート）",
    };

    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .scroll((scroll.position, 0)),
        layout[0],
    );

    let footer = match &state.status_line {
        Some(status) => status.to_string(),
        None => "c: コピー  s: ファイルに保存  Esc: 終了".to_string(),
    };

    frame.render_widget(
        Paragraph::new(footer)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
        layout[1],
    );
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut SessionState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let mut scroll = Scroll::default();

    loop {
        terminal.draw(|frame| {
            if let Some(note) = &state.review {
                render_review(frame, state, note, &mut scroll);
                return;
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(frame.size());

            render_chat(frame, layout[0], state, &mut scroll);

            if state.waiting_for_reply || state.ending {
                render_waiting(frame, layout[1], state.ending);
            } else {
                frame.render_widget(textarea.widget(), layout[1]);
            }
        })?;

        match events.next().await? {
            Event::StreamOpened(stream_id) => {
                state.open_stream(stream_id);
                scroll.follow = true;
            }
            Event::Stream(stream_id, stream_event) => {
                state.handle_stream_event(stream_id, stream_event);
            }
            Event::NoteReady(note) => {
                state.handle_note_ready(note);
                scroll.top();
            }
            Event::NoteCopied() => {
                state.status_line = Some("カルテをクリップボードにコピーしました。".to_string());
            }
            Event::NoteSaved(path) => {
                state.status_line = Some(format!("カルテを保存しました: {}", path.display()));
            }
            Event::KeyboardCTRLC() => {
                if state.waiting_for_reply {
                    state.abort_stream(&tx)?;
                } else {
                    break;
                }
            }
            Event::KeyboardCTRLE() => {
                if state.review.is_none() {
                    state.begin_end(&tx)?;
                }
            }
            Event::KeyboardEnter() => {
                if state.review.is_some() || state.waiting_for_reply || state.ending {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if state.submit(&input_str, &tx)? {
                    textarea = TextArea::default();
                    scroll.follow = true;
                }
            }
            Event::KeyboardPaste(text) => {
                if state.review.is_none() && !state.waiting_for_reply {
                    textarea.insert_str(&text);
                }
            }
            Event::KeyboardCharInput(input) => {
                if state.review.is_some() {
                    match input {
                        Input {
                            key: Key::Char('c'),
                            ..
                        } => {
                            if let Some(note) = &state.review {
                                tx.send(Action::CopyNote(note.text.clone()))?;
                            }
                        }
                        Input {
                            key: Key::Char('s'),
                            ..
                        } => {
                            if let Some(note) = &state.review {
                                tx.send(Action::SaveNote(note.text.clone()))?;
                            }
                        }
                        Input { key: Key::Esc, .. }
                        | Input {
                            key: Key::Char('q'),
                            ..
                        } => {
                            state.close_review();
                            break;
                        }
                        _ => (),
                    }
                    continue;
                }

                if !state.waiting_for_reply && !state.ending {
                    textarea.input(input);
                }
            }
            Event::UIScrollUp() => {
                scroll.up(1);
            }
            Event::UIScrollDown() => {
                scroll.down(1);
            }
            Event::UIScrollPageUp() => {
                scroll.up(10);
            }
            Event::UIScrollPageDown() => {
                scroll.down(10);
            }
            Event::UIResize() | Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    greeting: Option<String>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut state = SessionState::new();
    state.bootstrap(greeting);

    start_loop(&mut terminal, &mut state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
