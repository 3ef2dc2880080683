use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Text;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use super::{SOFT, content_column};
use crate::panel::PanelEnv;

const LINK: Color = Color::Rgb(204, 204, 204);
const RULE: Color = Color::Rgb(26, 26, 26);

const COLUMNS: [(&str, [&str; 2]); 4] = [
    ("Social", ["X", "Discord"]),
    ("Pages", ["Home", "Swap"]),
    ("Resources", ["Docs", "Media Kit"]),
    ("LEGAL", ["Terms of Service", "Privacy Policy"]),
];
/// Rows of one link column: heading, gap, two links.
const COLUMN_ROWS: u16 = 4;
/// Narrowest content column that fits all link columns on one row.
const ROW_COLS: u16 = 96;

#[derive(Debug)]
pub struct Footer {
    env: PanelEnv,
    rule: Rect,
    columns: [Rect; 4],
}

impl Footer {
    pub fn new(env: &PanelEnv) -> Self {
        Self {
            env: *env,
            rule: Rect::default(),
            columns: [Rect::default(); 4],
        }
    }

    /// Lay out from page row `y`; returns the rows used.
    pub fn layout(&mut self, y: u16, width: u16) -> u16 {
        let pad = self.env.rows_for(48.0);
        self.rule = Rect::new(0, y, width, 1);
        let column = content_column(Rect::new(0, y, width, 0), &self.env);
        let top = y + 1 + pad;
        if column.width >= ROW_COLS {
            let third = column.width / 6;
            for (i, area) in self.columns.iter_mut().take(3).enumerate() {
                *area = Rect::new(column.x + third * i as u16, top, third, COLUMN_ROWS);
            }
            self.columns[3] = Rect::new(column.right() - third * 2, top, third * 2, COLUMN_ROWS);
            1 + pad * 2 + COLUMN_ROWS
        } else {
            for (i, area) in self.columns.iter_mut().enumerate() {
                *area = Rect::new(column.x, top + i as u16 * (COLUMN_ROWS + 2), column.width, COLUMN_ROWS);
            }
            1 + pad * 2 + 4 * COLUMN_ROWS + 3 * 2
        }
    }

    pub fn render(&self, buf: &mut Buffer) {
        Block::new()
            .borders(Borders::TOP)
            .border_style(Style::new().fg(RULE))
            .render(self.rule.intersection(buf.area), buf);

        for (i, (heading, links)) in COLUMNS.iter().enumerate() {
            let area = self.columns[i];
            // Legal hugs the right edge when the columns share a row.
            let alignment = if i == 3 && area.y == self.columns[0].y {
                Alignment::Right
            } else {
                Alignment::Left
            };
            let rows = [
                (Rect::new(area.x, area.y, area.width, 1), *heading, SOFT),
                (Rect::new(area.x, area.y + 2, area.width, 1), links[0], LINK),
                (Rect::new(area.x, area.y + 3, area.width, 1), links[1], LINK),
            ];
            for (row, text, color) in rows {
                Paragraph::new(Text::styled(text, Style::new().fg(color)))
                    .alignment(alignment)
                    .render(row.intersection(buf.area), buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer() -> Footer {
        Footer::new(&PanelEnv {
            cell_width_px: 6.0,
            cell_height_px: 12.0,
            device_pixel_ratio: 1.0,
            reduced_motion: false,
        })
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_wide_footer_is_one_row() {
        let mut footer = footer();
        let rows = footer.layout(0, 160);
        let mut buf = Buffer::empty(Rect::new(0, 0, 160, rows));
        footer.render(&mut buf);

        let headings = row_text(&buf, footer.columns[0].y);
        for heading in ["Social", "Pages", "Resources", "LEGAL"] {
            assert!(headings.contains(heading), "{headings}");
        }
        // Right aligned against the content column.
        assert!(headings.trim_end().ends_with("LEGAL"));
        assert_eq!(headings.trim_end().len(), footer.columns[3].right() as usize);
    }

    #[test]
    fn test_narrow_footer_stacks() {
        let mut footer = footer();
        let wide = footer.layout(0, 160);
        let narrow = footer.layout(0, 60);
        assert!(narrow > wide);
        assert!(footer.columns[3].y > footer.columns[2].y);

        let mut buf = Buffer::empty(Rect::new(0, 0, 60, narrow));
        footer.render(&mut buf);
        assert!(row_text(&buf, footer.columns[3].y + 3).contains("Privacy Policy"));
    }
}
