use crate::columns::{BadgeTone, DetaineeTable, EMPTY_PLACEHOLDER, SEARCH_PLACEHOLDER};
use crate::detainee::Detainee;
use crate::table::CellContent;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Table,
    Search,
    Columns,
}

pub struct App {
    pub table: DetaineeTable,
    /// Decorative: edited by the user, never used to filter
    pub search: String,
    pub mode: Mode,
    pub selection: TableState,
    pub column_cursor: usize,
    pub sort_cursor: usize,
    pub show_detail: bool,
    pub message: Option<String>,
}

impl App {
    pub fn new(table: DetaineeTable) -> Self {
        let mut app = Self {
            table,
            search: String::new(),
            mode: Mode::Table,
            selection: TableState::default(),
            column_cursor: 0,
            sort_cursor: 0,
            show_detail: false,
            message: None,
        };
        app.reset_selection();
        app
    }

    fn page_len(&self) -> usize {
        self.table.row_model().len()
    }

    fn reset_selection(&mut self) {
        if self.page_len() > 0 {
            self.selection.select(Some(0));
        } else {
            self.selection.select(None);
        }
    }

    pub fn selected_detainee(&self) -> Option<&Detainee> {
        let index = self.selection.selected()?;
        self.table.row_model().get(index).map(|row| row.original)
    }

    pub fn next_page(&mut self) {
        self.table.next_page();
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.table.previous_page();
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.selection.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.selection.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.selection.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.selection.select(Some(i));
    }

    /// Column ids listed in the visibility dropdown
    pub fn hideable_columns(&self) -> Vec<&'static str> {
        self.table
            .all_columns()
            .iter()
            .filter(|c| c.enable_hiding)
            .map(|c| c.id)
            .collect()
    }

    /// Sortable column ids in schema order, hidden ones included, so the
    /// cursor keeps pointing at the same column when others are hidden
    fn sortable_columns(&self) -> Vec<&'static str> {
        self.table
            .all_columns()
            .iter()
            .filter(|c| c.enable_sorting)
            .map(|c| c.id)
            .collect()
    }

    /// Index of the first visible sortable column at or after the cursor
    fn resolved_sort_cursor(&self) -> Option<usize> {
        let columns = self.sortable_columns();
        let len = columns.len();
        (0..len)
            .map(|offset| (self.sort_cursor + offset) % len)
            .find(|&i| self.table.is_column_visible(columns[i]))
    }

    pub fn sort_column(&self) -> Option<&'static str> {
        let columns = self.sortable_columns();
        self.resolved_sort_cursor().map(|i| columns[i])
    }

    fn step_sort_cursor(&mut self, forward: bool) {
        let columns = self.sortable_columns();
        let len = columns.len();
        let Some(start) = self.resolved_sort_cursor() else {
            return;
        };
        let next = (1..=len)
            .map(|step| if forward { (start + step) % len } else { (start + len - step) % len })
            .find(|&i| self.table.is_column_visible(columns[i]));
        if let Some(i) = next {
            self.sort_cursor = i;
        }
    }

    fn toggle_selected_column(&mut self) {
        let Some(id) = self.hideable_columns().get(self.column_cursor).copied() else {
            return;
        };
        match self.table.toggle_column(id) {
            Ok(_) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn cycle_sorting(&mut self) {
        let Some(id) = self.sort_column() else {
            return;
        };
        match self.table.toggle_sorting(id) {
            Ok(_) => {
                self.message = None;
                self.reset_selection();
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Search => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.mode = Mode::Table,
                    KeyCode::Backspace => {
                        self.search.pop();
                    }
                    KeyCode::Char(c) => self.search.push(c),
                    _ => {}
                }
                false
            }
            Mode::Columns => {
                let len = self.hideable_columns().len();
                match key.code {
                    KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => self.mode = Mode::Table,
                    KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                        self.column_cursor = (self.column_cursor + 1) % len;
                    }
                    KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                        self.column_cursor = (self.column_cursor + len - 1) % len;
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_column(),
                    _ => {}
                }
                false
            }
            Mode::Table => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
                KeyCode::Right | KeyCode::Char('n') => {
                    self.next_page();
                    false
                }
                KeyCode::Left | KeyCode::Char('p') => {
                    self.previous_page();
                    false
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.next();
                    false
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.previous();
                    false
                }
                KeyCode::Char('/') => {
                    self.mode = Mode::Search;
                    false
                }
                KeyCode::Char('c') => {
                    self.mode = Mode::Columns;
                    false
                }
                KeyCode::Tab => {
                    self.step_sort_cursor(true);
                    false
                }
                KeyCode::BackTab => {
                    self.step_sort_cursor(false);
                    false
                }
                KeyCode::Char('s') => {
                    self.cycle_sorting();
                    false
                }
                KeyCode::Enter => {
                    self.show_detail = !self.show_detail;
                    false
                }
                _ => false,
            },
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title, counts, search box
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Pagination and key help
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_table(f, content[0], app);
        render_detail_panel(f, content[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);

    if app.mode == Mode::Columns {
        render_column_menu(f, chunks[1], app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let page = app.table.state().page_index() + 1;

    let search = if app.search.is_empty() {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search.as_str(), Style::default().fg(Color::White))
    };
    let search_border = if app.mode == Mode::Search {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let spans = vec![
        Span::styled(
            "Detentos",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Registros: {}", app.table.data().len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Página {}/{}", page, app.table.page_count()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  |  "),
        Span::styled("🔍 ", Style::default().fg(search_border)),
        search,
    ];

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

pub fn tone_color(tone: Option<BadgeTone>) -> Color {
    match tone {
        Some(BadgeTone::Green) => Color::Green,
        Some(BadgeTone::Blue) => Color::Blue,
        Some(BadgeTone::Yellow) => Color::Yellow,
        None => Color::Reset,
    }
}

fn content_cell(content: &CellContent) -> Cell<'static> {
    match content {
        CellContent::Text { text, emphasis } => {
            let style = if *emphasis {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Cell::from(text.clone()).style(style)
        }
        CellContent::Badge { label, .. } => Cell::from(label.clone())
            .style(Style::default().fg(tone_color(BadgeTone::for_status(label)))),
        CellContent::Pills(items) => Cell::from(items.join(" · ")),
    }
}

fn column_width(id: &str) -> Constraint {
    match id {
        "registro" => Constraint::Length(10),
        "nome" => Constraint::Length(18),
        "dataNascimento" => Constraint::Length(20),
        "cela" => Constraint::Length(6),
        "status" => Constraint::Length(12),
        _ => Constraint::Min(20),
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let group = app.table.header_group();
    let sort_column = app.sort_column();

    let header_cells = group.headers.iter().map(|h| {
        let marker = match h.sorted {
            Some(false) => " ▲",
            Some(true) => " ▼",
            None => "",
        };
        let mut style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        if sort_column == Some(h.column_id) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(format!("{}{}", h.label, marker)).style(style)
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let model = app.table.row_model();
    let rows: Vec<Row> = if model.is_empty() {
        vec![Row::new(vec![Cell::from(EMPTY_PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))])]
    } else {
        model
            .iter()
            .map(|row| Row::new(row.cells.iter().map(|c| content_cell(&c.content))).height(1))
            .collect()
    };

    let widths: Vec<Constraint> = if model.is_empty() {
        vec![Constraint::Percentage(100)]
    } else {
        group.headers.iter().map(|h| column_width(h.column_id)).collect()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Detentos "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.selection);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Yellow);
    let enabled = |on: bool| {
        if on {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut spans = vec![
        Span::styled("← Anterior", enabled(app.table.can_previous_page())),
        Span::raw("  "),
        Span::styled("Próxima →", enabled(app.table.can_next_page())),
        Span::raw(" | "),
        Span::styled("c", key),
        Span::raw(" Colunas | "),
        Span::styled("/", key),
        Span::raw(" Buscar | "),
        Span::styled("Tab", key),
        Span::raw("+"),
        Span::styled("s", key),
        Span::raw(" Ordenar | "),
        Span::styled("Enter", key),
        Span::raw(" Detalhes | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Sair"),
    ];

    if let Some(message) = &app.message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message.as_str(), Style::default().fg(Color::Red)));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_column_menu(f: &mut Frame, area: Rect, app: &App) {
    let columns = app.hideable_columns();
    let popup = centered_rect(30, columns.len() as u16 + 2, area);

    let items: Vec<ListItem> = columns
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mark = if app.table.is_column_visible(id) { "[x]" } else { "[ ]" };
            let style = if i == app.column_cursor {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {}", mark, id)).style(style)
        })
        .collect();

    let menu = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Colunas "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(menu, popup);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Detalhes ");

    let Some(d) = app.selected_detainee() else {
        f.render_widget(Paragraph::new("Nenhum detento selecionado").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let mut content = vec![
        Line::from(""),
        field("Registro", d.registration.clone()),
        field("Nome", d.name.clone()),
        field("Nascimento", d.birth_date.clone()),
        field("Cela", d.cell.clone()),
        Line::from(vec![
            Span::styled("  Status: ", label),
            Span::styled(
                d.status.label(),
                Style::default().fg(tone_color(BadgeTone::for_status(d.status.label()))),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  CRIMES",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
    ];
    content.extend(d.crimes.iter().map(|c| Line::from(format!("  • {}", c))));

    f.render_widget(Paragraph::new(content).block(block), area);
}
