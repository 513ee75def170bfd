//! Munro list component and state management.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::domain::model::Munro;

/// Maintains the navigable state of the munro list.
///
/// The cursor indexes into the visible projection; resolving it always
/// yields a record that is a live member of the collection, so a committed
/// selection can never reference anything outside it.
#[derive(Debug, Default, Clone)]
pub struct MunroListState {
    munros: Vec<Munro>,
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
    filter_active: bool,
}

impl MunroListState {
    /// Construct state from the fetched collection, preserving its order.
    pub fn from_munros(munros: &[Munro]) -> Self {
        let mut state = Self {
            munros: munros.to_vec(),
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            filter_active: false,
        };
        state.refresh_visible();
        state
    }

    /// Total number of records backing the list.
    pub fn len(&self) -> usize {
        self.munros.len()
    }

    /// Returns whether the backing collection is empty.
    pub fn is_empty(&self) -> bool {
        self.munros.is_empty()
    }

    /// Number of rows currently visible under the active filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The record under the cursor, if any row is visible.
    pub fn selected_munro(&self) -> Option<&Munro> {
        self.visible
            .get(self.cursor)
            .and_then(|idx| self.munros.get(*idx))
    }

    /// Cursor position within the visible rows.
    pub fn selected_index(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Advance the cursor to the next visible row if possible.
    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to the previous visible row if possible.
    pub fn select_previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Activate incremental filter editing.
    pub fn begin_filter(&mut self) {
        self.filter_active = true;
    }

    /// Deactivate the filter editing mode.
    pub fn end_filter(&mut self) {
        self.filter_active = false;
    }

    /// Whether filter mode is currently active.
    pub fn is_filter_active(&self) -> bool {
        self.filter_active
    }

    /// Append a character to the filter string and refresh visibility.
    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.refresh_visible();
    }

    /// Remove the most recent filter character.
    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.refresh_visible();
    }

    /// Clear the active filter.
    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.refresh_visible();
        }
    }

    /// Retrieve the active filter string.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn refresh_visible(&mut self) {
        self.visible.clear();
        let lower_filter = self.filter.to_ascii_lowercase();
        for (idx, munro) in self.munros.iter().enumerate() {
            if lower_filter.is_empty() || munro.name.to_ascii_lowercase().contains(&lower_filter) {
                self.visible.push(idx);
            }
        }

        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    fn iter_visible(&self) -> impl Iterator<Item = (usize, &Munro)> {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(display_idx, idx)| {
                self.munros.get(*idx).map(|munro| (display_idx, munro))
            })
    }
}

/// Ratatui component responsible for rendering the munro list.
#[derive(Debug, Default)]
pub struct MunroList;

impl MunroList {
    /// Render the list to the provided frame. `selected` marks the record
    /// the container currently holds as its selection.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &MunroListState,
        selected: Option<&Munro>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Munros · {}/{}", state.visible_len(), state.len()));
        frame.render_widget(block.clone(), area);

        let inner = block.inner(area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let filter_text = if state.filter().is_empty() {
            "⌕ filter (press /)".to_string()
        } else {
            format!("⌕ {}", state.filter())
        };

        let mut filter_style = Style::default().fg(Color::Gray);
        if state.is_filter_active() {
            filter_style = filter_style.add_modifier(Modifier::BOLD).fg(Color::Cyan);
        }
        frame.render_widget(Paragraph::new(filter_text).style(filter_style), layout[0]);

        if state.visible_len() == 0 {
            let message = if state.is_empty() {
                "No munros loaded"
            } else {
                "No munros match filter"
            };
            let placeholder = Paragraph::new(message).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, layout[1]);
            return;
        }

        let mut items = Vec::with_capacity(state.visible_len());
        for (display_idx, munro) in state.iter_visible() {
            let mut style = Style::default();
            if selected.is_some_and(|chosen| chosen == munro) {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            let mut item = ListItem::new(Line::styled(munro.name.clone(), style));
            if display_idx % 2 == 1 {
                item = item.style(Style::default().bg(Color::Rgb(24, 24, 24)));
            }
            items.push(item);
        }

        let mut list_state = ratatui::widgets::ListState::default();
        list_state.select(state.selected_index());

        let list = List::new(items)
            .block(Block::default())
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(list, layout[1], &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn sample() -> Vec<Munro> {
        vec![
            Munro {
                name: "Ben Nevis".into(),
                height: 1345,
                region: "Grampian".into(),
                meaning: "Venomous Mountain".into(),
            },
            Munro {
                name: "Ben Macdui".into(),
                height: 1309,
                region: "Cairngorms".into(),
                meaning: "Hill of the Black Pig".into(),
            },
            Munro {
                name: "Schiehallion".into(),
                height: 1083,
                region: "Perthshire".into(),
                meaning: "Fairy Hill of the Caledonians".into(),
            },
        ]
    }

    #[test]
    fn cursor_resolves_to_the_record_at_that_position() {
        let munros = sample();
        let mut state = MunroListState::from_munros(&munros);

        assert_eq!(state.selected_munro(), Some(&munros[0]));
        state.select_next();
        assert_eq!(state.selected_munro(), Some(&munros[1]));
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_munro(), Some(&munros[2]));
        state.select_previous();
        assert_eq!(state.selected_munro(), Some(&munros[1]));
    }

    #[test]
    fn empty_collection_has_no_selection() {
        let mut state = MunroListState::from_munros(&[]);
        assert!(state.selected_munro().is_none());
        assert!(state.selected_index().is_none());
        state.select_next();
        state.select_previous();
        assert!(state.selected_munro().is_none());
    }

    #[test]
    fn filter_narrows_visible_rows_and_clamps_the_cursor() {
        let munros = sample();
        let mut state = MunroListState::from_munros(&munros);
        state.select_next();
        state.select_next();

        for ch in "sch".chars() {
            state.push_filter_char(ch);
        }
        assert_eq!(state.visible_len(), 1);
        assert_eq!(state.selected_munro().map(|m| m.name.as_str()), Some("Schiehallion"));

        state.clear_filter();
        assert_eq!(state.visible_len(), 3);
    }

    #[test]
    fn renders_list_with_a_committed_selection() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();

        let munros = sample();
        let state = MunroListState::from_munros(&munros);
        let component = MunroList;

        terminal
            .draw(|frame| {
                let area = frame.size();
                component.render(frame, area, &state, Some(&munros[1]));
            })
            .unwrap();
    }

    #[test]
    fn renders_placeholder_for_empty_collection() {
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        let state = MunroListState::from_munros(&[]);
        let component = MunroList;

        terminal
            .draw(|frame| {
                let area = frame.size();
                component.render(frame, area, &state, None);
            })
            .unwrap();
    }
}
