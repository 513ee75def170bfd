//! Detail component rendering the currently selected munro.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::domain::model::Munro;

/// Read-only view of one selected record. Renders all four fields verbatim;
/// an absent selection renders a placeholder instead of failing.
#[derive(Debug, Default)]
pub struct Detail;

impl Detail {
    /// The displayed text, one entry per line, untransformed field values.
    pub fn text_lines(munro: &Munro) -> Vec<String> {
        vec![
            munro.name.clone(),
            format!("Height: {}", munro.height),
            format!("Region: {}", munro.region),
            format!("Meaning: {}", munro.meaning),
        ]
    }

    /// Render the detail pane for the current selection.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, munro: Option<&Munro>) {
        let block = Block::default().title("Detail").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        match munro {
            Some(munro) => {
                let mut lines = Vec::with_capacity(4);
                for (idx, text) in Self::text_lines(munro).into_iter().enumerate() {
                    let style = if idx == 0 {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::styled(text, style));
                }
                let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
                frame.render_widget(paragraph, inner);
            }
            None => {
                let placeholder = Paragraph::new("Select a munro to view details")
                    .style(
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )
                    .wrap(Wrap { trim: true });
                frame.render_widget(placeholder, inner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn buffer_text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn ben_macdui() -> Munro {
        Munro {
            name: "Ben Macdui".into(),
            height: 1309,
            region: "Cairngorms".into(),
            meaning: "Hill of the Black Pig".into(),
        }
    }

    #[test]
    fn renders_all_four_fields_verbatim() {
        let backend = TestBackend::new(50, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let detail = Detail;
        let munro = ben_macdui();

        terminal
            .draw(|frame| {
                let area = frame.size();
                detail.render(frame, area, Some(&munro));
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Ben Macdui"));
        assert!(text.contains("Height: 1309"));
        assert!(text.contains("Region: Cairngorms"));
        assert!(text.contains("Meaning: Hill of the Black Pig"));
    }

    #[test]
    fn renders_placeholder_without_a_selection() {
        let backend = TestBackend::new(50, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let detail = Detail;

        terminal
            .draw(|frame| {
                let area = frame.size();
                detail.render(frame, area, None);
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Select a munro to view details"));
    }
}
