use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use table_organizer::{
    print_price, validate_person_name, ConsumableForm, ConsumableId, TableManager, TableStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Consumables,
    Persons,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Consumables => Page::Persons,
            Page::Persons => Page::Consumables,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Consumables => "Items",
            Page::Persons => "Persons",
        }
    }
}

/// Something destructive waiting for a y/n answer
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    RemovePerson(String),
    RemoveConsumable(ConsumableId),
    Clear,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    AddPerson { name: String },
    /// `field`: 0 name, 1 quantity, 2 price
    AddConsumable { form: ConsumableForm, field: usize },
    /// Choosing who shared consumable `id`
    Assign { id: ConsumableId },
    Confirm(Pending),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

pub struct App<'a, S: TableStore> {
    pub table: &'a mut TableManager<S>,
    pub current_page: Page,
    pub consumables_state: TableState,
    pub persons_state: TableState,
    pub assign_state: TableState,
    pub mode: Mode,
    pub status: Option<Status>,
    pub should_quit: bool,
}

impl<'a, S: TableStore> App<'a, S> {
    pub fn new(table: &'a mut TableManager<S>) -> Self {
        let mut consumables_state = TableState::default();
        if table.number_of_consumables() > 0 {
            consumables_state.select(Some(0));
        }

        let mut persons_state = TableState::default();
        if table.number_of_persons() > 0 {
            persons_state.select(Some(0));
        }

        Self {
            table,
            current_page: Page::Consumables,
            consumables_state,
            persons_state,
            assign_state: TableState::default(),
            mode: Mode::Normal,
            status: None,
            should_quit: false,
        }
    }

    fn info(&mut self, text: String) {
        self.status = Some(Status { text, is_error: false });
    }

    fn error(&mut self, text: String) {
        self.status = Some(Status { text, is_error: true });
    }

    pub fn selected_consumable(&self) -> Option<ConsumableId> {
        self.consumables_state
            .selected()
            .and_then(|i| self.table.consumables().get(i))
            .map(|c| c.id)
    }

    pub fn selected_person(&self) -> Option<String> {
        self.persons_state
            .selected()
            .and_then(|i| self.table.persons().get(i))
            .map(|p| p.name.clone())
    }

    // ========================================================================
    // KEY HANDLING
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => {
                self.handle_normal(key);
                // handle_normal may have switched mode already
                std::mem::replace(&mut self.mode, Mode::Normal)
            }
            Mode::AddPerson { name } => self.handle_add_person(key, name),
            Mode::AddConsumable { form, field } => self.handle_add_consumable(key, form, field),
            Mode::Assign { id } => self.handle_assign(key, id),
            Mode::Confirm(pending) => self.handle_confirm(key, pending),
        };
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.current_page = self.current_page.next(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('a') => {
                self.status = None;
                self.mode = match self.current_page {
                    Page::Persons => Mode::AddPerson { name: String::new() },
                    Page::Consumables => Mode::AddConsumable {
                        form: ConsumableForm::new("", "1", ""),
                        field: 0,
                    },
                };
            }
            KeyCode::Char('d') => {
                let pending = match self.current_page {
                    Page::Persons => self.selected_person().map(Pending::RemovePerson),
                    Page::Consumables => self.selected_consumable().map(Pending::RemoveConsumable),
                };
                if let Some(pending) = pending {
                    self.mode = Mode::Confirm(pending);
                }
            }
            KeyCode::Enter if self.current_page == Page::Consumables => {
                if let Some(id) = self.selected_consumable() {
                    if self.table.number_of_persons() == 0 {
                        self.error("Add persons first".to_string());
                    } else {
                        self.assign_state.select(Some(0));
                        self.mode = Mode::Assign { id };
                    }
                }
            }
            KeyCode::Char('+') => {
                let tip = i64::from(self.table.tip()) + 1;
                self.table.set_tip(tip);
            }
            KeyCode::Char('-') => {
                let tip = i64::from(self.table.tip()) - 1;
                self.table.set_tip(tip);
            }
            KeyCode::Char('C') => self.mode = Mode::Confirm(Pending::Clear),
            _ => {}
        }
    }

    fn handle_add_person(&mut self, key: KeyEvent, mut name: String) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) => name.push(c),
            KeyCode::Enter => {
                let valid = match validate_person_name(&name) {
                    Ok(valid) => valid,
                    Err(errors) => {
                        self.error(join_errors(&errors));
                        return Mode::AddPerson { name };
                    }
                };
                match self.table.add_person(&valid).map(|_| ()) {
                    Ok(()) => {
                        self.persons_state
                            .select(Some(self.table.number_of_persons() - 1));
                        self.info(format!("Added {}", valid));
                        return Mode::Normal;
                    }
                    Err(e) => self.error(e.to_string()),
                }
            }
            _ => {}
        }
        Mode::AddPerson { name }
    }

    fn handle_add_consumable(&mut self, key: KeyEvent, mut form: ConsumableForm, field: usize) -> Mode {
        let mut field = field;
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Tab | KeyCode::Down => field = (field + 1) % 3,
            KeyCode::BackTab | KeyCode::Up => field = (field + 2) % 3,
            KeyCode::Backspace => {
                form_field(&mut form, field).pop();
            }
            KeyCode::Char(c) => form_field(&mut form, field).push(c),
            KeyCode::Enter => match form.validate() {
                Ok(item) => match self
                    .table
                    .add_consumable(&item.name, item.price, item.quantity)
                    .map(|_| ())
                {
                    Ok(()) => {
                        self.consumables_state
                            .select(Some(self.table.number_of_consumables() - 1));
                        self.info(format!("Added {}", item.name));
                        return Mode::Normal;
                    }
                    Err(e) => self.error(e.to_string()),
                },
                Err(errors) => self.error(join_errors(&errors)),
            },
            _ => {}
        }
        Mode::AddConsumable { form, field }
    }

    fn handle_assign(&mut self, key: KeyEvent, id: ConsumableId) -> Mode {
        let len = self.table.number_of_persons();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Mode::Normal,
            KeyCode::Down | KeyCode::Char('j') => step(&mut self.assign_state, len, true),
            KeyCode::Up | KeyCode::Char('k') => step(&mut self.assign_state, len, false),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let person = self
                    .assign_state
                    .selected()
                    .and_then(|i| self.table.persons().get(i))
                    .map(|p| p.name.clone());
                if let Some(person) = person {
                    if let Err(e) = self.table.toggle_consumable_for_person(id, &person) {
                        self.error(e.to_string());
                    }
                }
            }
            _ => {}
        }
        Mode::Assign { id }
    }

    fn handle_confirm(&mut self, key: KeyEvent, pending: Pending) -> Mode {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = match &pending {
                    Pending::RemovePerson(name) => self.table.remove_person(name).map(|_| ()),
                    Pending::RemoveConsumable(id) => self.table.remove_consumable(*id).map(|_| ()),
                    Pending::Clear => self.table.clear(),
                };
                match result {
                    Ok(()) => self.info("Done".to_string()),
                    Err(e) => self.error(e.to_string()),
                }
                clamp(&mut self.persons_state, self.table.number_of_persons());
                clamp(&mut self.consumables_state, self.table.number_of_consumables());
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Mode::Normal,
            _ => Mode::Confirm(pending),
        }
    }

    pub fn next(&mut self) {
        match self.current_page {
            Page::Consumables => step(&mut self.consumables_state, self.table.number_of_consumables(), true),
            Page::Persons => step(&mut self.persons_state, self.table.number_of_persons(), true),
        }
    }

    pub fn previous(&mut self) {
        match self.current_page {
            Page::Consumables => step(&mut self.consumables_state, self.table.number_of_consumables(), false),
            Page::Persons => step(&mut self.persons_state, self.table.number_of_persons(), false),
        }
    }
}

fn form_field(form: &mut ConsumableForm, field: usize) -> &mut String {
    match field {
        0 => &mut form.name,
        1 => &mut form.quantity,
        _ => &mut form.price,
    }
}

fn join_errors(errors: &[table_organizer::ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Move the selection one row, wrapping at both ends
fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

/// Keep the selection inside a list that may have shrunk
fn clamp(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        _ => {}
    }
}

// ============================================================================
// TERMINAL
// ============================================================================

pub fn run_ui<S: TableStore>(table: &mut TableManager<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(table);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: TableStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_, S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui<S: TableStore>(f: &mut Frame, app: &mut App<'_, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Input / status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if let Mode::Assign { id } = app.mode {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_consumables(f, content_chunks[0], app);
        render_assign_panel(f, content_chunks[1], app, id);
    } else {
        match app.current_page {
            Page::Consumables => render_consumables(f, chunks[1], app),
            Page::Persons => render_persons(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: TableStore>(f: &mut Frame, area: Rect, app: &App<'_, S>) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Consumables, Page::Persons].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", print_price(app.table.total_bill())),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Tip: {}%", app.table.tip()),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("With tip: {}", print_price(app.table.total_bill_with_tip())),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));

    let unclaimed = app.table.unclaimed_total();
    if unclaimed > 0 {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Unclaimed: {}", print_price(unclaimed)),
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn render_consumables<S: TableStore>(f: &mut Frame, area: Rect, app: &mut App<'_, S>) {
    let rows: Vec<Row> = app
        .table
        .consumables()
        .iter()
        .map(|c| {
            let color = if c.number_of_consumers() == 0 {
                Color::Red
            } else {
                Color::White
            };
            Row::new(vec![
                Cell::from(truncate(&c.name, 30)),
                Cell::from(c.quantity.to_string()),
                Cell::from(c.number_of_consumers().to_string()).style(Style::default().fg(color)),
                Cell::from(print_price(c.price)),
                Cell::from(print_price(c.total_price())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Item", "Qty", "Sharing", "Price", "Total"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Items "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.consumables_state);
}

fn render_persons<S: TableStore>(f: &mut Frame, area: Rect, app: &mut App<'_, S>) {
    let rows: Vec<Row> = app
        .table
        .persons()
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(truncate(&p.name, 30)),
                Cell::from(p.number_of_consumables().to_string()),
                Cell::from(print_price(app.table.personal_bill(p)))
                    .style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(32), Constraint::Length(8), Constraint::Length(12)],
    )
    .header(header_row(&["Person", "Items", "To pay"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Persons "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.persons_state);
}

fn render_assign_panel<S: TableStore>(f: &mut Frame, area: Rect, app: &mut App<'_, S>, id: ConsumableId) {
    let title = app
        .table
        .find_consumable(id)
        .map(|c| format!(" Who shared {}? ", truncate(&c.name, 20)))
        .unwrap_or_else(|| " Who shared it? ".to_string());

    let rows: Vec<Row> = app
        .table
        .persons()
        .iter()
        .map(|p| {
            let (mark, color) = if p.consumes(id) {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(mark).style(Style::default().fg(color)),
                Cell::from(truncate(&p.name, 30)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(10)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.assign_state);
}

fn key_hint(spans: &mut Vec<Span<'static>>, key: &'static str, label: &'static str) {
    spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(label));
}

fn render_status_bar<S: TableStore>(f: &mut Frame, area: Rect, app: &App<'_, S>) {
    let mut spans: Vec<Span<'static>> = vec![];

    match &app.mode {
        Mode::AddPerson { name } => {
            spans.push(Span::styled(" New person: ", Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(format!("{}_", name), Style::default().fg(Color::White)));
            key_hint(&mut spans, "  Enter", " Save | ");
            key_hint(&mut spans, "Esc", " Cancel");
        }
        Mode::AddConsumable { form, field } => {
            let labels = [("Item", &form.name), ("Qty", &form.quantity), ("Price", &form.price)];
            for (i, (label, value)) in labels.iter().enumerate() {
                let style = if i == *field {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                spans.push(Span::styled(format!(" {}: ", label), Style::default().fg(Color::Cyan)));
                spans.push(Span::styled(format!("[{}]", value), style));
            }
            key_hint(&mut spans, "  Tab", " Field | ");
            key_hint(&mut spans, "Enter", " Save | ");
            key_hint(&mut spans, "Esc", " Cancel");
        }
        Mode::Assign { .. } => {
            key_hint(&mut spans, " Space", " Toggle | ");
            key_hint(&mut spans, "↑/↓", " Nav | ");
            key_hint(&mut spans, "Esc", " Back");
        }
        Mode::Confirm(pending) => {
            let question = match pending {
                Pending::RemovePerson(name) => format!(" Remove {}? ", name),
                Pending::RemoveConsumable(_) => " Remove this item? ".to_string(),
                Pending::Clear => " Clear the whole table? ".to_string(),
            };
            spans.push(Span::styled(question, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)));
            key_hint(&mut spans, "y", " Yes | ");
            key_hint(&mut spans, "n", " No");
        }
        Mode::Normal => {
            key_hint(&mut spans, " a", " Add | ");
            key_hint(&mut spans, "d", " Remove | ");
            if app.current_page == Page::Consumables {
                key_hint(&mut spans, "Enter", " Who shared | ");
            }
            key_hint(&mut spans, "+/-", " Tip | ");
            key_hint(&mut spans, "Tab", " Page | ");
            key_hint(&mut spans, "C", " Clear | ");
            spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            spans.push(Span::raw(" Quit"));
        }
    }

    if let Some(status) = &app.status {
        let color = if status.is_error { Color::Red } else { Color::Green };
        spans.push(Span::raw("  | "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use table_organizer::MemoryStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<S: TableStore>(app: &mut App<'_, S>, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn table() -> TableManager<MemoryStore> {
        TableManager::open(MemoryStore::new(), 0).unwrap()
    }

    #[test]
    fn test_add_person_flow() {
        let mut table = table();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.current_page, Page::Persons);

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ana");
        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.selected_person().as_deref(), Some("ana"));
        assert_eq!(app.table.number_of_persons(), 1);
    }

    #[test]
    fn test_duplicate_person_shows_error_and_keeps_input() {
        let mut table = table();
        table.add_person("ana").unwrap();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ana");
        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::AddPerson { ref name } if name == "ana"));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
        assert_eq!(app.table.number_of_persons(), 1);
    }

    #[test]
    fn test_add_consumable_flow() {
        let mut table = table();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "Beer");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Backspace));
        type_text(&mut app, "2");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "4.50");
        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::Normal));
        let beer = app.table.consumable(0);
        assert_eq!(beer.name, "Beer");
        assert_eq!(beer.quantity, 2);
        assert_eq!(beer.price, 450);
        assert_eq!(app.selected_consumable(), Some(beer.id));
    }

    #[test]
    fn test_invalid_consumable_form_stays_open() {
        let mut table = table();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::AddConsumable { .. }));
        let status = app.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("name"));
        assert!(status.text.contains("price"));
        assert_eq!(app.table.number_of_consumables(), 0);
    }

    #[test]
    fn test_assign_toggles_link() {
        let mut table = table();
        table.add_person("ana").unwrap();
        table.add_person("bruno").unwrap();
        let id = table.add_consumable("Pizza", 1000, 1).unwrap().id;
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(app.mode, Mode::Assign { id: i } if i == id));

        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.table.consumers_of(id).len(), 2);

        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.table.consumers_of(id).len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert!(matches!(app.mode, Mode::Normal));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_assign_needs_persons() {
        let mut table = table();
        table.add_consumable("Pizza", 1000, 1).unwrap();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn test_remove_requires_confirmation() {
        let mut table = table();
        table.add_consumable("Pizza", 1000, 1).unwrap();
        table.add_consumable("Beer", 450, 1).unwrap();
        let mut app = App::new(&mut table);
        app.handle_key(key(KeyCode::Down));

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.table.number_of_consumables(), 2);

        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.table.number_of_consumables(), 1);
        assert_eq!(app.table.consumable(0).name, "Pizza");
        assert_eq!(app.consumables_state.selected(), Some(0));
    }

    #[test]
    fn test_tip_keys_never_go_negative() {
        let mut table = table();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Char('+')));
        assert_eq!(app.table.tip(), 2);

        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(app.table.tip(), 0);
    }

    #[test]
    fn test_clear_table() {
        let mut table = table();
        table.add_person("ana").unwrap();
        table.add_consumable("Pizza", 1000, 1).unwrap();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Char('C')));
        app.handle_key(key(KeyCode::Char('y')));

        assert_eq!(app.table.number_of_persons(), 0);
        assert_eq!(app.table.number_of_consumables(), 0);
        assert_eq!(app.consumables_state.selected(), None);
    }

    #[test]
    fn test_quit() {
        let mut table = table();
        let mut app = App::new(&mut table);

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Pizza", 10), "Pizza");
        assert_eq!(truncate("Margherita pizza", 10), "Margher...");
    }
}
