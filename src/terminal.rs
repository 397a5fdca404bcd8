use crate::error::{Error, Result};
use crate::graphics::{Canvas, Color, Surface, Transform};
use crate::input;
use crate::math::{Direction, Geometry};
use crate::settings::Settings;
use crate::state::AppState;
use crate::theme::{ColorScheme, Role};
use crate::widget::{Frame, WaveWidget};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Instant;

/// Smallest canvas side, in device pixels, worth drawing
const MIN_CANVAS: u16 = 24;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Raw-mode alternate screen, restored when dropped
pub struct TerminalGuard {
    out: BufWriter<Stdout>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = TerminalGuard {
            out: BufWriter::new(io::stdout()),
        };
        execute!(guard.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(guard)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, Clear(ClearType::All))
    }

    /// Writes the canvas as half blocks, then its labels and a status line
    pub fn present(
        &mut self,
        canvas: &Canvas,
        colors: &ColorScheme,
        status: &str,
    ) -> io::Result<()> {
        let background = colors.color(Role::Background);
        let rows = canvas.height().div_ceil(2);
        let mut current: Option<(Color, Color)> = None;

        for row in 0..rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            for col in 0..canvas.width() {
                let cell = cell_colors(canvas, col, row, background);
                if current != Some(cell) {
                    queue!(
                        self.out,
                        SetForegroundColor(to_terminal(cell.0)),
                        SetBackgroundColor(to_terminal(cell.1))
                    )?;
                    current = Some(cell);
                }
                queue!(self.out, Print(HALF_BLOCK))?;
            }
        }

        queue!(self.out, SetBackgroundColor(to_terminal(background)))?;
        for label in canvas.labels() {
            if label.x < 0.0 || label.y < 0.0 {
                continue;
            }
            let (col, row) = (label.x as usize, label.y as usize / 2);
            if col >= canvas.width() || row >= rows {
                continue;
            }
            let text: String = label.text.chars().take(canvas.width() - col).collect();
            queue!(
                self.out,
                MoveTo(col as u16, row as u16),
                SetForegroundColor(to_terminal(label.color)),
                Print(text)
            )?;
        }

        queue!(
            self.out,
            SetForegroundColor(to_terminal(colors.color(Role::Foreground))),
            MoveTo(0, rows as u16),
            Clear(ClearType::CurrentLine),
            Print(status),
            ResetColor
        )?;
        self.out.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, ResetColor, Show, LeaveAlternateScreen) {
            log::error!("failed to leave alternate screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to disable raw mode: {e}");
        }
    }
}

fn to_terminal(color: Color) -> style::Color {
    let (r, g, b, _) = color.as_rgba8();
    style::Color::Rgb { r, g, b }
}

/// Top and bottom pixel of a terminal cell; rows past the canvas show the background
fn cell_colors(canvas: &Canvas, col: usize, row: usize, background: Color) -> (Color, Color) {
    let top = canvas.pixel(col, row * 2).unwrap_or(background);
    let bottom = canvas.pixel(col, row * 2 + 1).unwrap_or(background);
    (top, bottom)
}

/// Largest scale whose canvas fits the terminal, keeping one row for status
pub fn fit_scale(cols: u16, rows: u16, radius: f64) -> Result<f64> {
    let width = cols;
    let height = rows.saturating_sub(1).saturating_mul(2);
    let side = width.min(height);
    if side < MIN_CANVAS {
        return Err(Error::TerminalTooSmall {
            cols,
            rows,
            min_cols: MIN_CANVAS,
            min_rows: MIN_CANVAS / 2 + 1,
        });
    }
    // canvas side is 2·scale·r plus a margin of scale·r
    Ok(side as f64 / (3.0 * radius))
}

/// A canvas sized for the geometry at the given scale, with the circle's
/// bounding box centred inside the margin
pub fn canvas_for(geometry: &Geometry, scale: f64) -> Canvas {
    let margin = scale * geometry.radius;
    let side = (2.0 * scale * geometry.radius + margin).ceil() as usize;
    let mut canvas = Canvas::new(side, side);
    canvas.set_transform(Transform::new(scale, margin / 2.0, margin / 2.0));
    canvas
}

/// Frames-per-second measurement, updated about once a second
struct FpsCounter {
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl FpsCounter {
    fn new() -> Self {
        FpsCounter {
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    fn frame(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }
}

fn status_line(state: &AppState, frame: &Frame, colors: &ColorScheme, fps: f64) -> String {
    let direction = match state.direction {
        Direction::Forward => "fwd",
        Direction::Backward => "back",
    };
    let toggles: Vec<String> = state.toggles.enabled().map(|t| t.to_string()).collect();
    format!(
        "{} {}  angle {:.2} {}  point {:.0},{:.0}  sin {:.0}  cos {:.0}  [{}]  {} theme  {:.0} fps",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        frame.angle,
        direction,
        frame.point.x,
        frame.point.y,
        frame.sine.x,
        frame.cosine.y,
        toggles.join(" "),
        colors.scheme,
        fps
    )
}

/// Runs the animation until the user quits
pub fn run(settings: &Settings) -> Result<()> {
    let geometry = Geometry::new(settings.radius);
    let scale = match settings.scale {
        Some(scale) => scale,
        None => {
            let size = termsize::get().ok_or(Error::UnknownTerminalSize)?;
            fit_scale(size.cols, size.rows, geometry.radius)?
        }
    };
    let mut canvas = canvas_for(&geometry, scale);
    log::info!(
        "radius {} at scale {scale:.3}, canvas {}x{} px",
        geometry.radius,
        canvas.width(),
        canvas.height()
    );

    let state = AppState::new(settings.angle, settings.step, settings.toggles.clone());
    let mut widget: WaveWidget<Canvas> =
        WaveWidget::new(state, geometry, ColorScheme::for_scheme(settings.scheme));
    let mut terminal = TerminalGuard::enter()?;
    let mut fps = FpsCounter::new();
    let mut next_frame = Instant::now();

    'frames: loop {
        // handle input until the next frame is due
        loop {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if let Some(command) = input::map_key(key) {
                        if !widget.handle(command) {
                            break 'frames;
                        }
                    }
                }
                Event::Resize(cols, rows) if settings.scale.is_none() => {
                    match fit_scale(cols, rows, geometry.radius) {
                        Ok(scale) => {
                            canvas = canvas_for(&geometry, scale);
                            widget.invalidate();
                            terminal.clear()?;
                            log::debug!("resized to {cols}x{rows}, scale {scale:.3}");
                        }
                        Err(e) => log::warn!("keeping previous size: {e}"),
                    }
                }
                _ => {}
            }
        }

        let frame = widget.tick(&mut canvas);
        fps.frame();
        let status = status_line(widget.state(), &frame, widget.colors(), fps.fps);
        terminal.present(&canvas, widget.colors(), &status)?;

        next_frame += settings.frame;
        let now = Instant::now();
        if next_frame < now {
            // fell behind; don't try to catch up
            next_frame = now;
        }
    }

    log::info!("quit at angle {:.3}", widget.state().angle);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Point;
    use crate::state::Toggles;
    use crate::theme::Scheme;
    use approx::assert_relative_eq;

    #[test]
    fn fit_scale_uses_smaller_dimension() {
        // 80 columns, 24 rows leave a 46 px tall area
        let scale = fit_scale(80, 24, 50.0).unwrap();
        assert_relative_eq!(scale, 46.0 / 150.0);
        let scale = fit_scale(60, 100, 50.0).unwrap();
        assert_relative_eq!(scale, 60.0 / 150.0);
    }

    #[test]
    fn fit_scale_rejects_tiny_terminal() {
        match fit_scale(20, 10, 50.0) {
            Err(Error::TerminalTooSmall { cols, rows, .. }) => assert_eq!((cols, rows), (20, 10)),
            other => panic!("expected TerminalTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn canvas_has_margin_around_circle() {
        let geometry = Geometry::new(50.0);
        let mut canvas = canvas_for(&geometry, 0.4);
        assert_eq!((canvas.width(), canvas.height()), (60, 60));
        canvas.fill_text(Point::new(0.0, 0.0), "origin", Color::rgb8(1, 2, 3));
        let label = &canvas.labels()[0];
        assert_relative_eq!(label.x, 10.0);
        assert_relative_eq!(label.y, 10.0);
    }

    #[test]
    fn odd_height_pads_last_cell_with_background() {
        let mut canvas = Canvas::new(2, 3);
        let red = Color::rgb8(255, 0, 0);
        let bg = Color::rgb8(0, 0, 0);
        canvas.clear(red);
        assert_eq!(cell_colors(&canvas, 0, 0, bg), (red, red));
        assert_eq!(cell_colors(&canvas, 1, 1, bg), (red, bg));
    }

    #[test]
    fn status_line_lists_enabled_toggles() {
        let state = AppState::new(1.0, 0.01, Toggles::default());
        let geometry = Geometry::new(50.0);
        let frame = Frame {
            angle: state.angle,
            point: geometry.point(state.angle),
            sine: geometry.sine_projection(state.angle),
            cosine: geometry.cosine_projection(state.angle),
        };
        let colors = ColorScheme::for_scheme(Scheme::Light);
        let status = status_line(&state, &frame, &colors, 59.6);
        assert!(status.starts_with("sincos "));
        assert!(status.contains("angle 1.00 fwd"));
        assert!(status.contains("point 23,8"));
        assert!(status.contains("[sin cos lines circle auto]"));
        assert!(status.contains("light theme"));
        assert!(status.ends_with("60 fps"));
    }
}
