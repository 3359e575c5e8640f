use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use live_md_config::Config;
use live_md_engine::LiveDocument;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod app;
mod view;

use app::{App, Motion};

const DEMO_DOCUMENT: &str = include_str!("demo.md");

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--export-nodes] [markdown-file]");
    eprintln!("Without a file, opens the configured document or a demo.");
    eprintln!("Config file: {}", Config::config_path().display());
}

fn main() -> Result<()> {
    // The TUI owns stdout; logs go to stderr only when asked for
    if env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_default_env().init();
    }
    log::info!("live-md starting up");

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("live-md", String::as_str);
    let mut export_nodes = false;
    let mut path_arg: Option<PathBuf> = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--export-nodes" => export_nodes = true,
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            other if path_arg.is_none() && !other.starts_with('-') => {
                path_arg = Some(PathBuf::from(other));
            }
            other => {
                eprintln!("Error: unexpected argument '{other}'");
                print_usage(program);
                process::exit(1);
            }
        }
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let options = config.render.decoration_options();
    log::info!("Config path: {}", Config::config_path().display());

    let (doc, title) = match path_arg.or(config.document_path) {
        Some(path) => {
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            let text = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
            (
                LiveDocument::with_options(&text, options),
                path.display().to_string(),
            )
        }
        None => (
            LiveDocument::with_options(DEMO_DOCUMENT, options),
            "demo".to_string(),
        ),
    };

    if export_nodes {
        println!("{}", serde_json::to_string_pretty(doc.exported_nodes())?);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(doc, title);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Ok(()),
            KeyCode::Char(c) if !ctrl => app.insert(c.encode_utf8(&mut [0; 4])),
            KeyCode::Enter => app.insert("\n"),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Left => app.move_cursor(Motion::Left),
            KeyCode::Right => app.move_cursor(Motion::Right),
            KeyCode::Up => app.move_cursor(Motion::Up),
            KeyCode::Down => app.move_cursor(Motion::Down),
            KeyCode::Home => app.move_cursor(Motion::Home),
            KeyCode::End => app.move_cursor(Motion::End),
            KeyCode::Tab => app.activate_preview(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(rows[0]);

    // Editor panel: borders take two rows
    let height = chunks[0].height.saturating_sub(2) as usize;
    app.scroll_into_view(height);
    let editor = Paragraph::new(view::document_lines(&app.doc, app.scroll, height)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} (v{})", app.title, app.doc.version())),
    );
    f.render_widget(editor, chunks[0]);

    // Node panel
    let node_rows: Vec<Row> = app
        .doc
        .exported_nodes()
        .iter()
        .map(|node| Row::new(node.display_row()))
        .collect();
    let nodes = Table::new(
        node_rows,
        [
            Constraint::Min(14),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(
        Row::new(["Node", "Parent", "From", "To"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Parsed Nodes"));
    f.render_widget(nodes, chunks[1]);

    // Status / help line
    let status = match &app.status {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::raw("Esc: Quit | "),
            Span::raw("Arrows/Home/End: Move | "),
            Span::raw("Tab: Edit preview source"),
        ]),
    };
    f.render_widget(Paragraph::new(status), rows[1]);
}
