use anyhow::Result;
use chess_registration::{
    submit, ExperienceLevel, Field, RegistrationInput, RegistrationSink, TournamentCategory,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Age,
    Rating,
    Experience,
    Category,
    EmergencyContact,
    Notes,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Age,
        FormField::Rating,
        FormField::Experience,
        FormField::Category,
        FormField::EmergencyContact,
        FormField::Notes,
        FormField::Submit,
    ];

    fn index(&self) -> usize {
        FormField::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        FormField::ALL[(self.index() + 1) % FormField::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let len = FormField::ALL.len();
        FormField::ALL[(self.index() + len - 1) % len]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Full Name",
            FormField::Email => "Email Address",
            FormField::Phone => "Phone Number",
            FormField::Age => "Age",
            FormField::Rating => "Chess Rating (Optional)",
            FormField::Experience => "Experience Level",
            FormField::Category => "Tournament Category",
            FormField::EmergencyContact => "Emergency Contact (Optional)",
            FormField::Notes => "Additional Notes",
            FormField::Submit => "Submit",
        }
    }

    /// Hint drawn in an empty field. Never part of the submitted input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Name => "Enter your full name",
            FormField::Email => "example@email.com",
            FormField::Phone => "+1 (555) 123-4567",
            FormField::Age => "Enter your age",
            FormField::Rating => "e.g., 1200, 1500, or leave blank if unrated",
            FormField::Category => "Select a category with ←/→",
            FormField::EmergencyContact => "Name and phone number",
            FormField::Notes => "Any special requirements or notes...",
            FormField::Experience | FormField::Submit => "",
        }
    }

    pub fn required(&self) -> bool {
        matches!(
            self,
            FormField::Name
                | FormField::Email
                | FormField::Phone
                | FormField::Age
                | FormField::Experience
                | FormField::Category
        )
    }
}

impl From<Field> for FormField {
    fn from(field: Field) -> Self {
        match field {
            Field::Name => FormField::Name,
            Field::Email => FormField::Email,
            Field::Phone => FormField::Phone,
            Field::Age => FormField::Age,
            Field::Category => FormField::Category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    None,
    /// Validation failed; closing it returns to the offending field
    Error { message: String },
    /// Registration accepted; `saved` carries the persistence outcome
    Confirmed {
        summary: String,
        saved: std::result::Result<String, String>,
    },
}

pub struct App {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub rating: String,
    pub experience: ExperienceLevel,
    pub category: Option<TournamentCategory>,
    pub emergency_contact: String,
    pub notes: String,
    pub focus: FormField,
    pub dialog: Dialog,
    pub registered_count: usize,
    sink: Box<dyn RegistrationSink>,
}

impl App {
    pub fn new(sink: Box<dyn RegistrationSink>) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            age: String::new(),
            rating: String::new(),
            experience: ExperienceLevel::default(),
            category: None,
            emergency_contact: String::new(),
            notes: String::new(),
            focus: FormField::Name,
            dialog: Dialog::None,
            registered_count: 0,
            sink,
        }
    }

    pub fn target(&self) -> String {
        self.sink.describe()
    }

    fn text(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Email => Some(&self.email),
            FormField::Phone => Some(&self.phone),
            FormField::Age => Some(&self.age),
            FormField::Rating => Some(&self.rating),
            FormField::EmergencyContact => Some(&self.emergency_contact),
            FormField::Notes => Some(&self.notes),
            FormField::Experience | FormField::Category | FormField::Submit => None,
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Email => Some(&mut self.email),
            FormField::Phone => Some(&mut self.phone),
            FormField::Age => Some(&mut self.age),
            FormField::Rating => Some(&mut self.rating),
            FormField::EmergencyContact => Some(&mut self.emergency_contact),
            FormField::Notes => Some(&mut self.notes),
            FormField::Experience | FormField::Category | FormField::Submit => None,
        }
    }

    /// Immutable copy of what the user typed, handed to the core
    pub fn snapshot(&self) -> RegistrationInput {
        RegistrationInput {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            age_text: self.age.clone(),
            rating_text: self.rating.clone(),
            experience_level: self.experience,
            category: self.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
            emergency_contact: self.emergency_contact.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn submit(&mut self) {
        let input = self.snapshot();
        match submit(&input, self.sink.as_mut()) {
            Err(err) => {
                self.focus = err.field().into();
                self.dialog = Dialog::Error {
                    message: err.to_string(),
                };
            }
            Ok(submission) => {
                self.registered_count += 1;
                info!("registration #{} accepted", self.registered_count);
                let saved = match submission.persisted {
                    Ok(()) => Ok(format!(
                        "Registration data has been saved to {}",
                        self.sink.describe()
                    )),
                    Err(err) => Err(format!("Could not save to file: {}", err)),
                };
                self.dialog = Dialog::Confirmed {
                    summary: submission.record.confirmation_message(),
                    saved,
                };
            }
        }
    }

    pub fn clear_form(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.age.clear();
        self.rating.clear();
        self.experience = ExperienceLevel::default();
        self.category = None;
        self.emergency_contact.clear();
        self.notes.clear();
        self.focus = FormField::Name;
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            FormField::Experience => {
                self.experience = if forward {
                    self.experience.next()
                } else {
                    self.experience.previous()
                };
            }
            FormField::Category => {
                let all = TournamentCategory::ALL;
                let len = all.len();
                let current = self
                    .category
                    .and_then(|c| all.iter().position(|x| *x == c));
                let index = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                };
                self.category = Some(all[index]);
            }
            _ => {}
        }
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.dialog {
            Dialog::Error { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.dialog = Dialog::None;
                }
                return false;
            }
            Dialog::Confirmed { .. } => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        self.clear_form();
                        self.dialog = Dialog::None;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => {
                        self.dialog = Dialog::None;
                    }
                    _ => {}
                }
                return false;
            }
            Dialog::None => {}
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Char('r') if ctrl => self.clear_form(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Enter => match self.focus {
                FormField::Submit => self.submit(),
                FormField::Notes => self.notes.push('\n'),
                _ => self.focus = self.focus.next(),
            },
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut(self.focus) {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(text) = self.text_mut(self.focus) {
                    text.push(c);
                }
            }
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Key help
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_form(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    match &app.dialog {
        Dialog::None => {}
        Dialog::Error { message } => render_error(f, message),
        Dialog::Confirmed { summary, saved } => render_confirmation(f, summary, saved),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let text = vec![
        Line::from(Span::styled(
            "♟️  Chess Tournament Registration",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                "Join us for an exciting chess competition!",
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!("Registered this session: {}", app.registered_count),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let header = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn label_span(field: FormField, focused: bool) -> Span<'static> {
    let marker = if focused { "→ " } else { "  " };
    let required = if field.required() { " *" } else { "" };
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    Span::styled(format!("{}{:<30}", marker, format!("{}{}", field.label(), required)), style)
}

fn text_line(app: &App, field: FormField) -> Line<'static> {
    let focused = app.focus == field;
    let value = app.text(field).map(String::as_str).unwrap_or("");

    let mut spans = vec![label_span(field, focused)];
    if value.is_empty() {
        spans.push(Span::styled(
            field.placeholder(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::raw(value.replace('\n', " ↵ ")));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

fn experience_line(app: &App) -> Line<'static> {
    let focused = app.focus == FormField::Experience;
    let mut spans = vec![label_span(FormField::Experience, focused)];
    for level in ExperienceLevel::ALL {
        let icon = match level {
            ExperienceLevel::Beginner => "🌱",
            ExperienceLevel::Intermediate => "⭐",
            ExperienceLevel::Advanced => "🏆",
            ExperienceLevel::Expert => "👑",
        };
        let (mark, style) = if level == app.experience {
            ("(•)", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            ("( )", Style::default().fg(Color::Gray))
        };
        spans.push(Span::styled(format!("{} {} {}  ", mark, icon, level.as_str()), style));
    }
    Line::from(spans)
}

fn category_line(app: &App) -> Line<'static> {
    let focused = app.focus == FormField::Category;
    let mut spans = vec![label_span(FormField::Category, focused)];
    match app.category {
        Some(category) => spans.push(Span::styled(
            format!("◀ {} ▶", category.as_str()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled(
            FormField::Category.placeholder(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    }
    Line::from(spans)
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let submit_style = if app.focus == FormField::Submit {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    let content = vec![
        Line::from(""),
        section("👤 Personal Information"),
        Line::from(""),
        text_line(app, FormField::Name),
        text_line(app, FormField::Email),
        text_line(app, FormField::Phone),
        text_line(app, FormField::Age),
        Line::from(""),
        section("♟️ Chess Details"),
        Line::from(""),
        text_line(app, FormField::Rating),
        experience_line(app),
        category_line(app),
        Line::from(""),
        section("📋 Additional Information"),
        Line::from(""),
        text_line(app, FormField::EmergencyContact),
        text_line(app, FormField::Notes),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(" ✓ Submit Registration ", submit_style),
            Span::raw("   "),
            Span::styled(" ↻ Clear Form (Ctrl+R) ", Style::default().fg(Color::Red)),
        ]),
    ];

    let form = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Registration Form "),
    );

    f.render_widget(form, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let status_spans = vec![
        Span::styled(format!(" Log: {} ", app.target()), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled("Tab/↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Field | "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Choose | "),
        Span::styled("Ctrl+S", Style::default().fg(Color::Yellow)),
        Span::raw(" Submit | "),
        Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear | "),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_error(f: &mut Frame, message: &str) {
    let area = centered_rect(50, 7, f.size());
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to correct the field",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Validation Error "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn render_confirmation(f: &mut Frame, summary: &str, saved: &std::result::Result<String, String>) {
    let height = summary.lines().count() as u16 + 8;
    let area = centered_rect(70, height, f.size());

    let mut content: Vec<Line> = summary
        .lines()
        .map(|line| Line::from(format!(" {}", line)))
        .collect();
    content.push(Line::from(""));
    content.push(match saved {
        Ok(message) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Green),
        )),
        Err(message) => Line::from(Span::styled(
            format!(" ⚠ {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    });
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::raw(" Clear the form for another registration? "),
        Span::styled("y", Style::default().fg(Color::Yellow)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(Color::Yellow)),
    ]));

    let dialog = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" 🎉 Registration Confirmed! "),
    );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let width = r.width * percent_x / 100;
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
