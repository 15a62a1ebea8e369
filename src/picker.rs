//! Terminal front end for [`SelectionController`]
//!
//! Maps key events to [`SelectionAction`]s and runs the raw-mode loop that
//! draws the tree with a checkbox per row.

use std::io::{self, Write};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::selection::{SelectionAction, SelectionController, SelectionOutcome};

/// Convert a keyboard event to a SelectionAction
pub fn key_to_action(key: KeyEvent) -> Option<SelectionAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(SelectionAction::Cancel);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(SelectionAction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(SelectionAction::Down),
        KeyCode::Char(' ') => Some(SelectionAction::Toggle),
        KeyCode::Enter => Some(SelectionAction::Confirm),
        KeyCode::Char('q') | KeyCode::Esc => Some(SelectionAction::Cancel),
        _ => None,
    }
}

/// Rows for the visible part of the tree, `height` lines tall, keeping the
/// cursor on screen. The cursor row is marked with `true`.
pub fn visible_rows(controller: &SelectionController<'_>, height: usize) -> Vec<(String, bool)> {
    let tree = controller.tree();
    let height = height.max(1);
    let start = controller.cursor().saturating_sub(height - 1);

    tree.nodes()
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, node)| {
            let mark = if controller.is_checked(i) { "[x]" } else { "[ ]" };
            let name = if node.is_root() {
                crate::tree::display_name(controller.root())
            } else {
                node.name().to_string()
            };
            let suffix = if node.is_dir() { "/" } else { "" };
            let line = format!("{}{} {}{}", "  ".repeat(node.depth), mark, name, suffix);
            (line, i == controller.cursor())
        })
        .collect()
}

/// Run the picker until the user confirms or cancels.
pub fn run_picker(controller: &mut SelectionController<'_>) -> io::Result<SelectionOutcome> {
    use crossterm::{cursor, execute, terminal};

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide) {
        let _ = terminal::disable_raw_mode();
        return Err(e);
    }

    let result = event_loop(controller, &mut stdout);

    // Restore terminal
    let restored = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    terminal::disable_raw_mode()?;
    restored?;

    result
}

fn event_loop(
    controller: &mut SelectionController<'_>,
    stdout: &mut io::Stdout,
) -> io::Result<SelectionOutcome> {
    use crossterm::event::{self, Event, KeyEventKind};

    render(controller, stdout)?;
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(action) = key_to_action(key) {
            if let Some(outcome) = controller.handle_action(action) {
                return Ok(outcome.clone());
            }
            render(controller, stdout)?;
        }
    }
}

fn render(controller: &SelectionController<'_>, stdout: &mut io::Stdout) -> io::Result<()> {
    use crossterm::style::Stylize;
    use crossterm::{cursor, queue, terminal};

    let (_, rows) = terminal::size()?;
    let height = usize::from(rows).saturating_sub(2);

    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    for (line, is_cursor) in visible_rows(controller, height) {
        if is_cursor {
            write!(stdout, "{}\r\n", line.reverse())?;
        } else {
            write!(stdout, "{}\r\n", line)?;
        }
    }
    write!(
        stdout,
        "{}",
        "↑/↓ move  space toggle  enter confirm  esc cancel".dim()
    )?;
    stdout.flush()
}
