//! Modal dialogs for the register TUI.
//!
//! A [`Dialog`] is a blocking centered overlay. While one is open it
//! receives every key event; the caller acts on the returned
//! [`DialogAction`].

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Operation waiting behind a confirm dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Checkout,
    Void,
}

/// What the caller should do after feeding a key to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Keep the dialog open.
    None,
    /// Close the dialog with no further effect.
    Close,
    /// Close the dialog and run the confirmed operation.
    Confirm(PendingOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    Info,
    Warning,
    Confirm,
}

/// A blocking message or confirmation overlay.
#[derive(Debug, Clone)]
pub struct Dialog {
    kind: DialogKind,
    message: String,
    op: Option<PendingOp>,
}

impl Dialog {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            message: message.into(),
            op: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Warning,
            message: message.into(),
            op: None,
        }
    }

    pub fn confirm(message: impl Into<String>, op: PendingOp) -> Self {
        Self {
            kind: DialogKind::Confirm,
            message: message.into(),
            op: Some(op),
        }
    }

    /// Feed a key event to the dialog.
    ///
    /// Info and warning dialogs close on Enter, Esc, or Space. Confirm
    /// dialogs confirm on Enter/`y` and cancel on Esc/`n`.
    pub fn handle_key(&self, key: KeyEvent) -> DialogAction {
        match self.kind {
            DialogKind::Confirm => match key.code {
                KeyCode::Enter | KeyCode::Char('y' | 'Y') => self
                    .op
                    .map_or(DialogAction::Close, DialogAction::Confirm),
                KeyCode::Esc | KeyCode::Char('n' | 'N') => DialogAction::Close,
                _ => DialogAction::None,
            },
            DialogKind::Info | DialogKind::Warning => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogAction::Close,
                _ => DialogAction::None,
            },
        }
    }

    /// Render the dialog as a centered overlay on top of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog_w = area.width.saturating_sub(4).min(50);
        let dialog_h = area.height.saturating_sub(2).min(5);

        let x = area.x + area.width.saturating_sub(dialog_w) / 2;
        let y = area.y + area.height.saturating_sub(dialog_h) / 2;
        let dialog_area = Rect::new(x, y, dialog_w, dialog_h);

        frame.render_widget(Clear, dialog_area);

        let (title, border) = match self.kind {
            DialogKind::Info => (" Notice ", Color::Green),
            DialogKind::Warning => (" Warning ", Color::Yellow),
            DialogKind::Confirm => (" Confirm ", Color::Cyan),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let message = Paragraph::new(self.message.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));
        let message_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        frame.render_widget(message, message_area);

        if inner.height > 1 {
            let hint_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            let hints = match self.kind {
                DialogKind::Confirm => Line::from(vec![
                    Span::styled("ENTER", Style::default().fg(Color::Cyan)),
                    Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
                    Span::styled("ESC", Style::default().fg(Color::Cyan)),
                    Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
                ]),
                DialogKind::Info | DialogKind::Warning => Line::from(vec![
                    Span::styled("ENTER", Style::default().fg(Color::Cyan)),
                    Span::styled(" dismiss", Style::default().fg(Color::DarkGray)),
                ]),
            };
            frame.render_widget(Paragraph::new(hints), hint_area);
        }
    }

    /// The message shown in the dialog (for assertions).
    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this dialog asks for confirmation.
    #[cfg(test)]
    pub fn is_confirm(&self) -> bool {
        self.kind == DialogKind::Confirm
    }
}
