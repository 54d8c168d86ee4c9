use ratatui::widgets::{ListState, ScrollbarState};

pub const PAGE_SIZE: usize = 10;

/// State of one single-choice question.
#[derive(Debug)]
pub struct SelectState {
    pub message: String,
    pub labels: Vec<String>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub show_help: bool,
}

impl SelectState {
    pub fn new(message: &str, labels: &[String], default: usize) -> Self {
        let selected = default.min(labels.len().saturating_sub(1));
        let mut list_state = ListState::default();
        list_state.select(Some(selected));

        Self {
            message: message.to_string(),
            labels: labels.to_vec(),
            list_state,
            scroll_state: ScrollbarState::new(labels.len()).position(selected),
            show_help: false,
        }
    }

    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected()).map(String::as_str)
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }

    pub fn next(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let i = if self.selected() >= self.labels.len() - 1 {
            0
        } else {
            self.selected() + 1
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let i = if self.selected() == 0 {
            self.labels.len() - 1
        } else {
            self.selected() - 1
        };
        self.select(i);
    }

    pub fn first(&mut self) {
        self.select(0);
    }

    pub fn last(&mut self) {
        self.select(self.labels.len().saturating_sub(1));
    }

    pub fn page_down(&mut self) {
        let i = (self.selected() + PAGE_SIZE).min(self.labels.len().saturating_sub(1));
        self.select(i);
    }

    pub fn page_up(&mut self) {
        self.select(self.selected().saturating_sub(PAGE_SIZE));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}
