use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Widget};

use super::{FOREGROUND, content_column};
use crate::panel::PanelEnv;

const LOGO: &str = "GASYARD";
const DOCS: &str = "Docs";
const CTA: &str = " Launch App ";
const INK: Color = Color::Rgb(10, 10, 10);
const LINK: Color = Color::Rgb(204, 204, 204);

/// Viewport width, in layout pixels, from which the nav links show.
const LINKS_MIN_PX: f64 = 768.0;

/// Fixed header drawn over the top of the scrolled page.
#[derive(Debug, Clone, Copy)]
pub struct Navbar {
    env: PanelEnv,
}

impl Navbar {
    /// Rows the header covers.
    pub const HEIGHT: u16 = 3;

    pub fn new(env: &PanelEnv) -> Self {
        Self { env: *env }
    }

    /// Whether the nav links fit a viewport `viewport_px` wide.
    pub fn shows_links(viewport_px: f64) -> bool {
        viewport_px >= LINKS_MIN_PX
    }

    /// Draw into the top of `area`, the visible frame.
    pub fn render(&self, buf: &mut Buffer, area: Rect) {
        let bar = Rect::new(area.x, area.y, area.width, Self::HEIGHT.min(area.height));
        let column = content_column(bar, &self.env);
        if column.height < 2 {
            return;
        }
        let line = Rect::new(column.x, column.y + 1, column.width, 1);

        Paragraph::new(Text::styled(LOGO, Style::new().fg(FOREGROUND).add_modifier(Modifier::BOLD)))
            .render(line, buf);

        let viewport_px = area.width as f64 * self.env.cell_width_px;
        if Self::shows_links(viewport_px) {
            Paragraph::new(Text::styled(DOCS, Style::new().fg(LINK)))
                .alignment(Alignment::Center)
                .render(line, buf);
        }

        let cta = Style::new().fg(INK).bg(FOREGROUND).add_modifier(Modifier::BOLD);
        Paragraph::new(Text::styled(CTA, cta))
            .alignment(Alignment::Right)
            .render(line, buf);
    }
}
