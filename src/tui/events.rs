use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};

use super::models::SelectState;
use super::rendering::ui;
use crate::error::PromptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    Next,
    Previous,
    First,
    Last,
    PageDown,
    PageUp,
    ToggleHelp,
    Accept,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Answer(bool),
    UseDefault,
    Cancel,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

pub fn select_action(key: KeyEvent) -> Option<SelectAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(SelectAction::Cancel);
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(SelectAction::Next),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(SelectAction::Previous),
        KeyCode::Home | KeyCode::Char('g') => Some(SelectAction::First),
        KeyCode::End | KeyCode::Char('G') => Some(SelectAction::Last),
        KeyCode::PageDown => Some(SelectAction::PageDown),
        KeyCode::PageUp => Some(SelectAction::PageUp),
        KeyCode::Char('h') | KeyCode::F(1) => Some(SelectAction::ToggleHelp),
        KeyCode::Enter | KeyCode::Char(' ') => Some(SelectAction::Accept),
        KeyCode::Esc | KeyCode::Char('q') => Some(SelectAction::Cancel),
        _ => None,
    }
}

pub fn confirm_action(key: KeyEvent) -> Option<ConfirmAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(&key) {
        return Some(ConfirmAction::Cancel);
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(ConfirmAction::Answer(true)),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(ConfirmAction::Answer(false)),
        KeyCode::Enter => Some(ConfirmAction::UseDefault),
        KeyCode::Esc => Some(ConfirmAction::Cancel),
        _ => None,
    }
}

/// Applies one action. Returns the final answer once the question is settled.
pub fn apply_select_action(state: &mut SelectState, action: SelectAction) -> Option<Result<usize, PromptError>> {
    if state.show_help {
        // Any key closes the help popup
        state.toggle_help();
        return match action {
            SelectAction::Cancel => Some(Err(PromptError::Cancelled)),
            _ => None,
        };
    }

    match action {
        SelectAction::Next => state.next(),
        SelectAction::Previous => state.previous(),
        SelectAction::First => state.first(),
        SelectAction::Last => state.last(),
        SelectAction::PageDown => state.page_down(),
        SelectAction::PageUp => state.page_up(),
        SelectAction::ToggleHelp => state.toggle_help(),
        SelectAction::Accept => return Some(Ok(state.selected())),
        SelectAction::Cancel => return Some(Err(PromptError::Cancelled)),
    }
    None
}

pub fn run_select<B: Backend>(terminal: &mut Terminal<B>, state: &mut SelectState) -> Result<usize, PromptError> {
    loop {
        terminal.draw(|f| ui(f, state))?;

        if let Event::Key(key) = event::read()? {
            if let Some(action) = select_action(key) {
                if let Some(answer) = apply_select_action(state, action) {
                    return answer;
                }
            }
        }
    }
}

pub fn read_confirm(default: bool) -> Result<bool, PromptError> {
    loop {
        if let Event::Key(key) = event::read()? {
            match confirm_action(key) {
                Some(ConfirmAction::Answer(answer)) => return Ok(answer),
                Some(ConfirmAction::UseDefault) => return Ok(default),
                Some(ConfirmAction::Cancel) => return Err(PromptError::Cancelled),
                None => {}
            }
        }
    }
}
