use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gasyard_canvas::Tint;
use gasyard_config::Config;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::{DefaultTerminal, Frame};
use tracing::info;

use crate::page::{Navbar, PaintCtx, Page};

/// Dot colors offered by the `c` key after the configured one.
const PALETTE: [Tint; 4] = [
    Tint::WHITE,
    Tint(0x86, 0x97, 0xFF),
    Tint(0xFF, 0xEF, 0x0E),
    Tint(0x00, 0xB3, 0x2D),
];

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Frame callbacks serviced per second.
    fps: u32,
    /// Origin of the page clock.
    start: Instant,
    /// First page row shown below the top of the terminal.
    scroll: u16,
    /// Rows of the last drawn frame.
    viewport_rows: u16,
    tints: Vec<Tint>,
    tint: usize,
    page: Page,
    navbar: Navbar,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        let configured = Tint::from(config.tint_rgb());
        let mut tints = vec![configured];
        tints.extend(PALETTE.into_iter().filter(|tint| *tint != configured));
        let page = Page::new(config);
        Self {
            running: false,
            fps: config.fps.max(1),
            start: Instant::now(),
            scroll: 0,
            viewport_rows: 0,
            tints,
            tint: 0,
            navbar: Navbar::new(page.env()),
            page,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!(fps = self.fps, paused = self.page.paused(), "landing page started");
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.page.unmount();
        info!("landing page closed");
        Ok(())
    }

    fn ctx(&self) -> PaintCtx {
        PaintCtx {
            time_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            tint: self.tints[self.tint],
            motion: self.page.motion(),
        }
    }

    /// Renders the page rows under the viewport, then the navbar on top.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.viewport_rows = area.height;
        self.page.layout(area.width);
        let height = self.page.height();
        self.scroll = self.scroll.min(height.saturating_sub(area.height));

        let ctx = self.ctx();
        self.page.tick(ctx.time_ms, Rect::new(0, self.scroll, area.width, area.height));
        let mut page = Buffer::empty(Rect::new(0, 0, area.width, height));
        self.page.render(&mut page, &ctx);

        let buf = frame.buffer_mut();
        let rows = area.height.min(height - self.scroll);
        for y in 0..rows {
            for x in 0..area.width {
                buf[(area.x + x, area.y + y)] = page[(x, self.scroll + y)].clone();
            }
        }
        self.navbar.render(buf, area);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// The poll timeout paces the frame callbacks.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = Duration::from_secs_f64(1.0 / self.fps as f64);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => info!(width, height, "terminal resized"),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = self.viewport_rows.saturating_sub(Navbar::HEIGHT).max(1);
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('j') | KeyCode::Down) => self.scroll_by(1),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.scroll_by(-1),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page as i32),
            (_, KeyCode::PageUp) => self.scroll_by(-(page as i32)),
            (_, KeyCode::Home | KeyCode::Char('g')) => self.scroll = 0,
            (_, KeyCode::End | KeyCode::Char('G')) => self.scroll = u16::MAX,
            (_, KeyCode::Char('p')) => self.toggle_paused(),
            (_, KeyCode::Char('m')) => self.toggle_reduced_motion(),
            (_, KeyCode::Char('c')) => self.cycle_tint(),
            _ => {}
        }
    }

    /// Move the viewport; the next render clamps it to the page.
    fn scroll_by(&mut self, rows: i32) {
        self.scroll = (self.scroll as i32 + rows).clamp(0, u16::MAX as i32) as u16;
    }

    fn toggle_paused(&mut self) {
        let paused = !self.page.paused();
        info!(paused, "animations toggled");
        self.page.set_paused(paused);
    }

    fn toggle_reduced_motion(&mut self) {
        let reduced_motion = !self.page.env().reduced_motion;
        info!(reduced_motion, "motion preference changed");
        self.page.set_reduced_motion(reduced_motion);
    }

    /// Cycle through the dot colors.
    fn cycle_tint(&mut self) {
        self.tint = (self.tint + 1) % self.tints.len();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
