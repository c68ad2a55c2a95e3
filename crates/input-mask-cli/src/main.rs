use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input_mask_config::Config;
use input_mask_engine::{InputEvent, Key, MaskConfig, MaskedField, Modifiers, Patch, Selection};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    process,
};

const DEFAULT_MASK: &str = "(999) 999-9999";

struct App {
    masks: Vec<(String, String)>,
    selected: usize,
    mask_config: MaskConfig,
    field: MaskedField,
    /// What the terminal "input" currently shows.
    display: String,
    /// Display-space caret.
    caret: usize,
    focused: bool,
    /// Screen position of the first display character, set while drawing.
    field_origin: Option<Position>,
    last_event: String,
}

impl App {
    /// An empty `masks` falls back to the default phone mask.
    fn new(mut masks: Vec<(String, String)>, mask_config: MaskConfig) -> Self {
        if masks.is_empty() {
            masks.push(default_mask());
        }
        let field = MaskedField::new(&masks[0].1, &mask_config);
        let mut app = Self {
            masks,
            selected: 0,
            mask_config,
            display: String::new(),
            caret: 0,
            focused: true,
            field_origin: None,
            last_event: String::new(),
            field,
        };
        app.sync_from_field();
        app
    }

    fn current_mask(&self) -> &(String, String) {
        &self.masks[self.selected]
    }

    /// Switch to the next named mask, carrying the current value across.
    fn next_mask(&mut self) {
        let value = self.field.value();
        self.selected = (self.selected + 1) % self.masks.len();
        self.field = MaskedField::new(&self.current_mask().1, &self.mask_config);
        let kept = self.field.set_value(&value);
        log::debug!("Switched to mask {:?}, kept {kept:?}", self.current_mask().0);
        self.sync_from_field();
        self.last_event = format!("mask switched, kept {kept:?}");
    }

    fn sync_from_field(&mut self) {
        self.display = self.field.display();
        self.caret = self.field.display_cursor();
    }

    fn selection(&self) -> Selection {
        Selection::collapsed(self.caret)
    }

    fn dispatch(&mut self, event: InputEvent) {
        let description = format!("{event:?}");
        let patch = self.field.handle(event);
        self.last_event = match &patch {
            Some(_) => description,
            None => format!("{description} (native)"),
        };
        self.apply(patch);
    }

    fn apply(&mut self, patch: Option<Patch>) {
        let Some(patch) = patch else {
            return;
        };
        self.display = patch.display;
        if let Some(caret) = patch.cursor {
            self.caret = caret;
        }
    }

    fn focus(&mut self) {
        if !self.focused {
            self.focused = true;
            self.sync_from_field();
        }
    }

    fn blur(&mut self) {
        self.focused = false;
        self.dispatch(InputEvent::Blur);
    }

    /// Returns `true` when the app should quit.
    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        let modifiers = Modifiers {
            alt: key.modifiers.contains(KeyModifiers::ALT),
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        };

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.ctrl => return true,
            KeyCode::Tab => self.next_mask(),
            KeyCode::Enter => self.blur(),
            code => {
                self.focus();
                let named = match code {
                    KeyCode::Backspace => Some(Key::Backspace),
                    KeyCode::Delete => Some(Key::Delete),
                    KeyCode::Left => Some(Key::ArrowLeft),
                    KeyCode::Right => Some(Key::ArrowRight),
                    KeyCode::Up | KeyCode::Home => Some(Key::ArrowUp),
                    KeyCode::Down | KeyCode::End => Some(Key::ArrowDown),
                    _ => None,
                };
                if let Some(named) = named {
                    self.dispatch(InputEvent::KeyDown {
                        key: named,
                        selection: self.selection(),
                    });
                } else if let KeyCode::Char(ch) = code {
                    // Browsers deliver a key-down before every key-press.
                    self.dispatch(InputEvent::KeyDown {
                        key: Key::Other(ch as u32),
                        selection: self.selection(),
                    });
                    self.dispatch(InputEvent::KeyPress { ch, modifiers });
                }
            }
        }
        false
    }

    /// Insert the clipboard into the value at the logical cursor and hand the
    /// result to the field.
    fn on_paste(&mut self, text: &str) {
        self.focus();
        let mut content: Vec<char> = self.field.value().chars().collect();
        let at = self.field.cursor().min(content.len());
        content.splice(at..at, text.chars());
        self.dispatch(InputEvent::Paste {
            content: content.into_iter().collect(),
        });
    }

    fn on_click(&mut self, column: u16, row: u16) {
        let Some(origin) = self.field_origin else {
            return;
        };
        if row != origin.y || column < origin.x {
            return;
        }
        self.focus();
        let offset = usize::from(column - origin.x).min(self.display.chars().count());
        self.dispatch(InputEvent::click(offset));
    }
}

/// Resolve the masks to offer: the CLI argument (a name from the config file
/// or a literal template) first, then every named mask from the config.
fn resolve_masks(arg: Option<&str>, config: &Config) -> Vec<(String, String)> {
    let mut masks: Vec<(String, String)> = config
        .masks
        .iter()
        .map(|(name, template)| (name.clone(), template.clone()))
        .collect();

    if let Some(arg) = arg {
        match masks.iter().position(|(name, _)| name == arg) {
            Some(index) => {
                let chosen = masks.remove(index);
                masks.insert(0, chosen);
            }
            None => masks.insert(0, ("argument".to_string(), arg.to_string())),
        }
    }

    if masks.is_empty() {
        masks.push(default_mask());
    }
    masks
}

fn default_mask() -> (String, String) {
    ("phone".to_string(), DEFAULT_MASK.to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [mask-name-or-template]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config path: {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let mask_config = match config.mask_config() {
        Ok(mask_config) => mask_config,
        Err(e) => {
            eprintln!("Error: Invalid mask configuration: {e}");
            process::exit(1);
        }
    };

    let masks = resolve_masks(args.get(1).map(String::as_str), &config);
    log::info!("Starting with {} mask(s)", masks.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(masks, mask_config);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    println!("{}", app.field.value());
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                if app.on_key(key) {
                    return Ok(());
                }
            }
            Event::Paste(text) => app.on_paste(&text),
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    app.on_click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let (name, template) = app.current_mask();
    let title = format!("Mask: {name} ({template})");
    let field_style = if app.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let field = Paragraph::new(Line::from(Span::raw(app.display.clone())))
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(field_style);
    f.render_widget(field, chunks[0]);

    let origin = Position::new(chunks[0].x + 1, chunks[0].y + 1);
    app.field_origin = Some(origin);
    if app.focused {
        let caret = u16::try_from(app.caret).unwrap_or(u16::MAX);
        f.set_cursor_position(Position::new(origin.x.saturating_add(caret), origin.y));
    }

    let complete = if app.field.is_complete() {
        "complete"
    } else {
        "incomplete"
    };
    let value = Paragraph::new(Line::from(vec![
        Span::raw(format!("value: {:?}", app.field.value())),
        Span::raw(format!("  ({complete})")),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Model"));
    f.render_widget(value, chunks[1]);

    let last = Paragraph::new(app.last_event.clone())
        .block(Block::default().borders(Borders::ALL).title("Last event"))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(last, chunks[2]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw("Tab: Next mask | "),
        Span::raw("Enter: Blur | "),
        Span::raw("←/→: Move | ↑/↓: Start/End"),
    ]));
    f.render_widget(help, chunks[3]);
}
