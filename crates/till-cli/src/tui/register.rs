//! The interactive register screen.
//!
//! Three entry fields across the top (product, price, quantity), the open
//! sale as a table below, the running total, and a one-line status bar.
//! Checkout and void go through modal [`Dialog`]s; every mutation is saved
//! to the store as it happens, and once more on exit.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use till_core::config::ProjectConfig;
use till_core::receipt::{format_money, item_line};
use till_core::register::Register;
use till_core::store::RegisterStore;
use till_core::validate::{ValidateError, parse_line_item};

use crate::tui::dialog::{Dialog, DialogAction, PendingOp};

/// How long a transient status message stays visible.
const STATUS_MSG_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryField {
    Name,
    Price,
    Quantity,
}

impl EntryField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Price,
            Self::Price => Self::Quantity,
            Self::Quantity => Self::Name,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Quantity,
            Self::Price => Self::Name,
            Self::Quantity => Self::Price,
        }
    }
}

/// State of one register session.
pub struct RegisterView {
    store: RegisterStore,
    register: Register,
    symbol: String,
    confirm_checkout: bool,
    focus: EntryField,
    name: String,
    name_cursor: usize,
    price: String,
    price_cursor: usize,
    quantity: String,
    quantity_cursor: usize,
    dialog: Option<Dialog>,
    status_msg: Option<(String, Instant)>,
    should_quit: bool,
}

impl RegisterView {
    /// Load the register behind `store` and start an entry session.
    ///
    /// # Errors
    ///
    /// Fails when the register file cannot be read.
    pub fn new(store: RegisterStore, project: &ProjectConfig) -> Result<Self> {
        let register = store.load()?;
        Ok(Self {
            store,
            register,
            symbol: project.register.currency.clone(),
            confirm_checkout: project.checkout.confirm,
            focus: EntryField::Name,
            name: String::new(),
            name_cursor: 0,
            price: String::new(),
            price_cursor: 0,
            quantity: String::new(),
            quantity_cursor: 0,
            dialog: None,
            status_msg: None,
            should_quit: false,
        })
    }

    /// Feed one key press to the view.
    ///
    /// An open dialog swallows every key. Otherwise the key either drives
    /// the register (submit, checkout, void, quit) or edits the focused
    /// entry field.
    ///
    /// # Errors
    ///
    /// Fails when a mutation cannot be written to the store.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(dialog) = &self.dialog {
            match dialog.handle_key(key) {
                DialogAction::None => {}
                DialogAction::Close => self.dialog = None,
                DialogAction::Confirm(op) => {
                    self.dialog = None;
                    self.run_pending(op)?;
                }
            }
            return Ok(());
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('c' | 'C') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.entry_is_empty() {
                    self.should_quit = true;
                } else {
                    self.clear_entry();
                }
            }
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Tab if shift => self.focus = self.focus.prev(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::F(1) => self.submit_entry()?,
            KeyCode::F(2) => self.request_checkout()?,
            KeyCode::F(5) => self.request_void(),
            KeyCode::Enter => match self.focus {
                EntryField::Name => self.focus = EntryField::Price,
                EntryField::Price => self.focus = EntryField::Quantity,
                EntryField::Quantity => self.submit_entry()?,
            },
            _ => {
                let (text, cursor) = self.focused_entry();
                edit_line(text, cursor, key);
            }
        }

        Ok(())
    }

    /// Validate the three entry fields and ring the row up.
    ///
    /// Validation failures surface as a warning dialog and leave the
    /// fields untouched so the operator can fix them in place.
    fn submit_entry(&mut self) -> Result<()> {
        let item = match parse_line_item(&self.name, &self.price, &self.quantity) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("rejected entry: {e}");
                let message = match e {
                    ValidateError::EmptyField { .. } => "Fill in all fields.".to_string(),
                    ValidateError::InvalidNumber { .. } | ValidateError::InvalidQuantity { .. } => {
                        "Invalid price or quantity.".to_string()
                    }
                    ValidateError::NameTooLong { .. } => e.to_string(),
                };
                self.dialog = Some(Dialog::warning(message));
                return Ok(());
            }
        };

        let line = item_line(&item, &self.symbol);
        self.register.add_item(item, Utc::now());
        self.store.save(&self.register)?;
        self.clear_entry();
        self.status_msg = Some((format!("Added {line}"), Instant::now()));
        Ok(())
    }

    fn request_checkout(&mut self) -> Result<()> {
        match self.register.open_sale() {
            Some(sale) if !sale.items.is_empty() => {
                if self.confirm_checkout {
                    let message = format!(
                        "Finish sale {}? Total: {}",
                        sale.number,
                        format_money(sale.total(), &self.symbol)
                    );
                    self.dialog = Some(Dialog::confirm(message, PendingOp::Checkout));
                } else {
                    self.do_checkout()?;
                }
            }
            _ => self.dialog = Some(Dialog::warning("No product registered.")),
        }
        Ok(())
    }

    fn do_checkout(&mut self) -> Result<()> {
        let total = match self.register.finalize(Utc::now()) {
            Ok(sale) => sale.total(),
            Err(_) => {
                self.dialog = Some(Dialog::warning("No product registered."));
                return Ok(());
            }
        };
        self.store.save(&self.register)?;
        self.dialog = Some(Dialog::info(format!(
            "Total purchase: {}",
            format_money(total, &self.symbol)
        )));
        Ok(())
    }

    fn request_void(&mut self) {
        match self.register.open_sale() {
            Some(sale) => {
                let message = format!(
                    "Discard {} item(s) from sale {}?",
                    sale.item_count(),
                    sale.number
                );
                self.dialog = Some(Dialog::confirm(message, PendingOp::Void));
            }
            None => self.dialog = Some(Dialog::warning("No open sale to discard.")),
        }
    }

    fn do_void(&mut self) -> Result<()> {
        let sale = match self.register.void_open() {
            Ok(sale) => sale,
            Err(_) => {
                self.dialog = Some(Dialog::warning("No open sale to discard."));
                return Ok(());
            }
        };
        self.store.save(&self.register)?;
        self.status_msg = Some((
            format!("Discarded sale {} ({} item(s))", sale.number, sale.item_count()),
            Instant::now(),
        ));
        Ok(())
    }

    fn run_pending(&mut self, op: PendingOp) -> Result<()> {
        match op {
            PendingOp::Checkout => self.do_checkout(),
            PendingOp::Void => self.do_void(),
        }
    }

    fn focused_entry(&mut self) -> (&mut String, &mut usize) {
        match self.focus {
            EntryField::Name => (&mut self.name, &mut self.name_cursor),
            EntryField::Price => (&mut self.price, &mut self.price_cursor),
            EntryField::Quantity => (&mut self.quantity, &mut self.quantity_cursor),
        }
    }

    fn entry_is_empty(&self) -> bool {
        self.name.is_empty() && self.price.is_empty() && self.quantity.is_empty()
    }

    fn clear_entry(&mut self) {
        self.name.clear();
        self.name_cursor = 0;
        self.price.clear();
        self.price_cursor = 0;
        self.quantity.clear();
        self.quantity_cursor = 0;
        self.focus = EntryField::Name;
    }

    /// Draw the whole screen.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: entry row, sale table, total line, status bar.
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_entry_row(frame, chunks[0]);
        self.render_sale_table(frame, chunks[1]);

        let total = Paragraph::new(Line::from(Span::styled(
            format!(
                "Total: {}",
                format_money(self.register.current_total(), &self.symbol)
            ),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(total, chunks[2]);

        let status = Paragraph::new(self.build_status_bar()).alignment(Alignment::Left);
        frame.render_widget(status, chunks[3]);

        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area);
        }
    }

    fn render_entry_row(&self, frame: &mut Frame, area: Rect) {
        let fields = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        render_entry_field(
            frame,
            fields[0],
            " Product ",
            &self.name,
            self.name_cursor,
            self.focus == EntryField::Name,
        );
        render_entry_field(
            frame,
            fields[1],
            " Price ",
            &self.price,
            self.price_cursor,
            self.focus == EntryField::Price,
        );
        render_entry_field(
            frame,
            fields[2],
            " Quantity ",
            &self.quantity,
            self.quantity_cursor,
            self.focus == EntryField::Quantity,
        );
    }

    fn render_sale_table(&self, frame: &mut Frame, area: Rect) {
        let open = self.register.open_sale();

        let title = open.map_or_else(
            || " till — register idle ".to_string(),
            |sale| format!(" till — sale {} ", sale.number),
        );

        let rows: Vec<Row<'_>> = open.map_or_else(Vec::new, |sale| {
            sale.items
                .iter()
                .map(|item| {
                    Row::new(vec![
                        Cell::from(item.name.clone()),
                        Cell::from(format_money(item.unit_price, &self.symbol)),
                        Cell::from(item.quantity.to_string()),
                        Cell::from(format_money(item.subtotal(), &self.symbol)),
                    ])
                })
                .collect()
        });

        let widths = [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["PRODUCT", "PRICE", "QTY", "SUBTOTAL"]).style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
        frame.render_widget(table, area);
    }

    fn build_status_bar(&self) -> Line<'static> {
        // Show a transient status message if recent.
        if let Some((msg, at)) = &self.status_msg {
            if at.elapsed() < STATUS_MSG_TTL {
                return Line::from(Span::styled(
                    msg.clone(),
                    Style::default().fg(Color::Cyan),
                ));
            }
        }

        let key_style = Style::default().fg(Color::Cyan);
        let label_style = Style::default().fg(Color::White);
        let val_style = Style::default().fg(Color::Cyan);
        let dim_style = Style::default().fg(Color::DarkGray);

        let mut spans = vec![
            Span::styled("ENTER", key_style),
            Span::styled(" add  ", dim_style),
            Span::styled("F2", key_style),
            Span::styled(" checkout  ", dim_style),
            Span::styled("F5", key_style),
            Span::styled(" void  ", dim_style),
            Span::styled("TAB", key_style),
            Span::styled(" field  ", dim_style),
            Span::styled("ESC", key_style),
            Span::styled(" clear/quit   ", dim_style),
        ];

        let number = self
            .register
            .open_sale()
            .map_or_else(|| "—".to_string(), |sale| sale.number.clone());
        let count = self.register.open_sale().map_or(0, |sale| sale.item_count());
        spans.push(Span::styled("sale ", label_style));
        spans.push(Span::styled(number, val_style));
        spans.push(Span::styled(format!("  {count} item(s)  "), label_style));
        spans.push(Span::styled(
            format_money(self.register.current_total(), &self.symbol),
            val_style,
        ));

        Line::from(spans)
    }
}

/// Run the register TUI to completion.
///
/// Takes over the terminal until the operator quits, then restores it and
/// writes the final register state back to the store.
///
/// # Errors
///
/// Fails when the register cannot be loaded, the terminal cannot be
/// driven, or the final save fails.
pub fn run(store: RegisterStore, project: &ProjectConfig) -> Result<()> {
    let mut view = RegisterView::new(store, project)?;
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut view);
    ratatui::restore();
    let saved = view.store.save(&view.register);
    result?;
    saved?;
    Ok(())
}

fn event_loop(terminal: &mut DefaultTerminal, view: &mut RegisterView) -> Result<()> {
    while !view.should_quit {
        terminal.draw(|frame| view.render(frame))?;
        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => view.handle_key(key)?,
                _ => {}
            }
        }
    }
    Ok(())
}

fn render_entry_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    text: &str,
    cursor: usize,
    focused: bool,
) {
    let border_color = if focused { Color::Green } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string())
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    let content = if focused {
        with_cursor(text, cursor)
    } else {
        text.to_string()
    };
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn edit_line(text: &mut String, cursor: &mut usize, key: KeyEvent) {
    match key.code {
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(char_len(text)),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = char_len(text),
        KeyCode::Backspace => {
            if *cursor > 0 {
                let remove_idx = *cursor - 1;
                remove_char_at(text, remove_idx);
                *cursor = remove_idx;
            }
        }
        KeyCode::Delete => {
            remove_char_at(text, *cursor);
        }
        KeyCode::Char(c) => {
            insert_char_at(text, *cursor, c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    if char_idx >= char_len(value) {
        return;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}
