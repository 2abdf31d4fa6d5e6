//! Terminal waveform viewer with a moving playback cursor.
//!
//! The waveform and the cursor are drawn by the library renderers into a
//! [`PixelBuffer`] twice as tall as the terminal area; each terminal cell then
//! shows two pixels as an upper half block.

use audiogram::render::{
    draw_position_marker, draw_waveform, playback_fraction, MarkerOptions, Padding, PixelBuffer,
    WaveformOptions,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color as TermColor, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

/// User input while viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// No key, or a key without a binding
    Continue,
    /// Space: freeze or resume the cursor
    TogglePause,
    /// Escape, 'q' or Ctrl+C
    Quit,
}

/// Wall-clock playback position that can be paused.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    started: Instant,
    paused_total: Duration,
    pause_start: Option<Instant>,
}

impl PlaybackClock {
    pub fn start_at(now: Instant) -> Self {
        Self {
            started: now,
            paused_total: Duration::ZERO,
            pause_start: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    pub fn toggle_at(&mut self, now: Instant) {
        match self.pause_start.take() {
            Some(pause_start) => self.paused_total += now.saturating_duration_since(pause_start),
            None => self.pause_start = Some(now),
        }
    }

    /// Time played at `now`, excluding pauses.
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let mut paused = self.paused_total;
        if let Some(pause_start) = self.pause_start {
            paused += now.saturating_duration_since(pause_start);
        }
        now.saturating_duration_since(self.started).saturating_sub(paused)
    }
}

/// Shows a [`PixelBuffer`] using one `▀` per two vertically stacked pixels.
pub struct HalfBlockImage<'a>(pub &'a PixelBuffer);

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (col as u32, row as u32 * 2);
                let (Some(top), Some(bottom)) = (self.0.pixel(x, y), self.0.pixel(x, y + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀')
                        .set_fg(TermColor::Rgb(top.r, top.g, top.b))
                        .set_bg(TermColor::Rgb(bottom.r, bottom.g, bottom.b));
                }
            }
        }
    }
}

/// Full-screen waveform view.
pub struct WaveformViewer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    waveform: WaveformOptions,
    marker: MarkerOptions,
    clock: PlaybackClock,
}

impl WaveformViewer {
    /// Enters the alternate screen. Padding is reduced to one pixel so the
    /// trace uses the whole terminal.
    ///
    /// # Errors
    /// - If raw mode or the alternate screen cannot be entered
    pub fn new(waveform: &WaveformOptions, marker: &MarkerOptions) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let padding = Padding::new(1, 1, 1, 1);
        Ok(Self {
            terminal,
            waveform: WaveformOptions {
                padding,
                ..waveform.clone()
            },
            marker: MarkerOptions {
                padding,
                line_width: 1,
                ..marker.clone()
            },
            clock: PlaybackClock::start_at(Instant::now()),
        })
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Restarts the cursor from zero, e.g. once playback has actually begun.
    pub fn restart_clock(&mut self) {
        self.clock = PlaybackClock::start_at(Instant::now());
    }

    /// Seconds played so far.
    pub fn position_secs(&self) -> f64 {
        self.clock.elapsed_at(Instant::now()).as_secs_f64()
    }

    /// Draws one frame: the waveform, the cursor at `position` seconds, and a footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(
        &mut self,
        samples: &[f32],
        position: f64,
        duration: f64,
        title: &str,
    ) -> anyhow::Result<()> {
        let paused = self.is_paused();
        let waveform = &self.waveform;
        let marker = &self.marker;

        self.terminal.draw(|frame| {
            let area = frame.area();
            let footer_height = 1;
            let plot_area = Rect {
                height: area.height.saturating_sub(footer_height),
                ..area
            };
            let footer_area = Rect {
                y: area.y + plot_area.height,
                height: area.height.min(footer_height),
                ..area
            };

            let mut pixels = PixelBuffer::new(plot_area.width as u32, plot_area.height as u32 * 2);
            draw_waveform(&mut pixels, samples, waveform);
            draw_position_marker(
                Some(&mut pixels),
                playback_fraction(position, duration),
                marker,
            );
            frame.render_widget(HalfBlockImage(&pixels), plot_area);

            let indicator = if paused {
                Span::styled("⏸ ", Style::default().fg(TermColor::Yellow))
            } else {
                Span::styled("▶ ", Style::default().fg(TermColor::Red))
            };
            let footer = Paragraph::new(Line::from(vec![
                indicator,
                Span::raw(format!("{} / {}", clock_label(position), clock_label(duration))),
                Span::raw("  "),
                Span::raw(title.to_string()),
                Span::styled(
                    "  space pause · q quit",
                    Style::default().fg(TermColor::DarkGray),
                ),
            ]))
            .style(
                Style::default()
                    .fg(TermColor::Rgb(185, 207, 212))
                    .bg(TermColor::Rgb(0, 0, 0)),
            );
            frame.render_widget(footer, footer_area);
        })?;
        Ok(())
    }

    /// Polls for a key for up to 50 ms.
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<ViewerCommand> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: closing viewer");
                        ViewerCommand::Quit
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        tracing::debug!("Ctrl+C pressed: closing viewer");
                        ViewerCommand::Quit
                    }
                    KeyCode::Char(' ') => {
                        self.clock.toggle_at(Instant::now());
                        tracing::debug!(paused = self.clock.is_paused(), "Space pressed: toggling cursor");
                        ViewerCommand::TogglePause
                    }
                    _ => ViewerCommand::Continue,
                });
            }
        }
        Ok(ViewerCommand::Continue)
    }

    /// Leaves the alternate screen and restores the terminal.
    ///
    /// # Errors
    /// - If terminal modes cannot be restored
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for WaveformViewer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// `m:ss`
fn clock_label(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiogram::render::{Color, RenderTarget};

    #[test]
    fn test_clock_excludes_pauses() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::start_at(t0);
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(2)), Duration::from_secs(2));

        clock.toggle_at(t0 + Duration::from_secs(2));
        assert!(clock.is_paused());
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(5)), Duration::from_secs(2));

        clock.toggle_at(t0 + Duration::from_secs(5));
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(6)), Duration::from_secs(3));
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(0.0), "0:00");
        assert_eq!(clock_label(65.9), "1:05");
        assert_eq!(clock_label(f64::NAN), "0:00");
    }

    #[test]
    fn test_half_block_pairs_rows() {
        let mut pixels = PixelBuffer::new(2, 4);
        pixels.put_pixel(1, 2, Color::rgb(255, 0, 0));
        pixels.put_pixel(1, 3, Color::rgb(0, 0, 255));

        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        HalfBlockImage(&pixels).render(area, &mut buf);

        let cell = &buf[(1, 1)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, TermColor::Rgb(255, 0, 0));
        assert_eq!(cell.bg, TermColor::Rgb(0, 0, 255));
    }

    #[test]
    fn test_half_block_clips_to_buffer() {
        let pixels = PixelBuffer::new(1, 1);
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        HalfBlockImage(&pixels).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
