//! Input state for the TUI: list cursor, focus, and the creation form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use explab_core::{ExperimentId, NewExperiment, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Prompt,
    AiClient,
    Model,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prompt => "Prompt",
            Self::AiClient => "AI client",
            Self::Model => "Model",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Prompt => Self::AiClient,
            Self::AiClient => Self::Model,
            Self::Model => Self::Prompt,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Prompt => Self::Model,
            Self::AiClient => Self::Prompt,
            Self::Model => Self::AiClient,
        }
    }
}

/// What the event loop should ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    RefreshList,
    Select(ExperimentId),
    Create(NewExperiment),
}

#[derive(Debug, Default)]
pub struct App {
    pub focus: Focus,
    pub cursor: usize,
    pub field: FormField,
    pub form: NewExperiment,
    followed: Option<ExperimentId>,
}

impl App {
    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Prompt => &self.form.prompt,
            FormField::AiClient => &self.form.ai_client,
            FormField::Model => &self.form.model,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Prompt => &mut self.form.prompt,
            FormField::AiClient => &mut self.form.ai_client,
            FormField::Model => &mut self.form.model,
        }
    }

    /// Move the cursor onto a newly selected experiment once it shows up in the list,
    /// and keep it inside the list bounds.
    pub fn follow_selection(&mut self, state: &ViewState, selected: Option<ExperimentId>) {
        if selected.is_some() && selected != self.followed {
            if let Some(idx) = state.list.iter().position(|e| Some(e.id) == selected) {
                self.cursor = idx;
                self.followed = selected;
            }
        }
        self.cursor = self.cursor.min(state.list.len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &ViewState) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match self.focus {
            Focus::List => self.handle_list_key(key, state),
            Focus::Form => self.handle_form_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, state: &ViewState) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < state.list.len() {
                    self.cursor += 1;
                }
                Action::None
            }
            KeyCode::Enter => state
                .list
                .get(self.cursor)
                .map(|entry| Action::Select(entry.id))
                .unwrap_or(Action::None),
            KeyCode::Char('r') | KeyCode::Char('R') => Action::RefreshList,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Tab => {
                self.focus = Focus::Form;
                self.field = FormField::Prompt;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::List;
                Action::None
            }
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Enter if self.field == FormField::Model => self.submit(),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                Action::None
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
                Action::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.field_mut().push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Form values are sent as typed and kept for the next submission.
    fn submit(&mut self) -> Action {
        self.focus = Focus::List;
        Action::Create(self.form.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explab_core::ListEntry;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn listed(ids: &[ExperimentId]) -> ViewState {
        ViewState {
            list: ids
                .iter()
                .map(|&id| ListEntry { id, label: format!("#{}: pending", id) })
                .collect(),
            ..Default::default()
        }
    }

    fn type_text(app: &mut App, text: &str, state: &ViewState) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn enter_selects_entry_under_cursor() {
        let state = listed(&[4, 9]);
        let mut app = App::default();
        assert_eq!(app.handle_key(key(KeyCode::Enter), &state), Action::Select(4));
        app.handle_key(key(KeyCode::Down), &state);
        app.handle_key(key(KeyCode::Down), &state);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.handle_key(key(KeyCode::Enter), &state), Action::Select(9));
    }

    #[test]
    fn enter_on_empty_list_does_nothing() {
        let mut app = App::default();
        assert_eq!(app.handle_key(key(KeyCode::Enter), &ViewState::default()), Action::None);
    }

    #[test]
    fn form_submits_all_three_fields() {
        let state = listed(&[]);
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('n')), &state);
        assert_eq!(app.focus, Focus::Form);
        type_text(&mut app, "x", &state);
        app.handle_key(key(KeyCode::Tab), &state);
        type_text(&mut app, "y", &state);
        app.handle_key(key(KeyCode::Enter), &state);
        type_text(&mut app, "zz", &state);
        app.handle_key(key(KeyCode::Backspace), &state);

        let action = app.handle_key(key(KeyCode::Enter), &state);

        assert_eq!(action, Action::Create(NewExperiment::new("x", "y", "z")));
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.field_value(FormField::Prompt), "x");
    }

    #[test]
    fn ctrl_s_submits_empty_form() {
        let state = listed(&[]);
        let mut app = App::default();
        app.handle_key(key(KeyCode::Tab), &state);
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), &state);
        assert_eq!(action, Action::Create(NewExperiment::default()));
    }

    #[test]
    fn q_types_into_form_but_quits_from_list() {
        let state = listed(&[1]);
        let mut app = App::default();
        app.handle_key(key(KeyCode::Char('n')), &state);
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), &state), Action::None);
        assert_eq!(app.form.prompt, "q");
        app.handle_key(key(KeyCode::Esc), &state);
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), &state), Action::Quit);
    }

    #[test]
    fn cursor_follows_new_selection_once_listed() {
        let mut app = App::default();
        app.follow_selection(&listed(&[1, 2]), Some(7));
        assert_eq!(app.cursor, 0);
        app.follow_selection(&listed(&[1, 2, 7]), Some(7));
        assert_eq!(app.cursor, 2);
        app.handle_key(key(KeyCode::Up), &listed(&[1, 2, 7]));
        app.follow_selection(&listed(&[1, 2, 7]), Some(7));
        assert_eq!(app.cursor, 1);
    }
}
