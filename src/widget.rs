use crate::graphics::{Point, Surface};
use crate::input::Command;
use crate::math::{Direction, Geometry};
use crate::state::{AppState, Toggle};
use crate::theme::{ColorScheme, Role, Scheme};

/// Which coordinates a marker's label shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coords {
    Both,
    X,
    Y,
}

/// What one frame drew, in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub angle: f64,
    pub point: Point,
    pub sine: Point,
    pub cosine: Point,
}

/// Animation stepper and renderer.
///
/// Owns the animation state and a cached snapshot of the static scene
/// (circle and full curves). Each tick restores that snapshot and draws the
/// moving parts on top, so per-frame cost does not depend on curve
/// resolution.
pub struct WaveWidget<S: Surface> {
    state: AppState,
    geometry: Geometry,
    colors: ColorScheme,
    background: Option<S::Snapshot>,
    /// Set whenever the static scene must be redrawn before the next frame
    stale: bool,
}

impl<S: Surface> WaveWidget<S> {
    pub fn new(state: AppState, geometry: Geometry, colors: ColorScheme) -> Self {
        WaveWidget {
            state,
            geometry,
            colors,
            background: None,
            stale: true,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    /// Flips a display flag; the static scene is rebuilt on the next tick
    pub fn apply_toggle(&mut self, toggle: Toggle) {
        let on = self.state.toggles.flip(toggle);
        log::debug!("{toggle} {}", if on { "on" } else { "off" });
        self.stale = true;
    }

    /// Steps the point once by hand, stopping automatic play
    pub fn nudge(&mut self, direction: Direction) {
        self.state.nudge(direction);
    }

    pub fn set_scheme(&mut self, scheme: Scheme) {
        log::debug!("switching to {scheme} colors");
        self.colors = ColorScheme::for_scheme(scheme);
        self.stale = true;
    }

    /// Drops the cached scene, e.g. after the surface was resized
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Applies a user command. Returns `false` when the command asks to quit.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Toggle(toggle) => self.apply_toggle(toggle),
            Command::Nudge(direction) => self.nudge(direction),
            Command::FlipScheme => self.set_scheme(self.colors.scheme.flip()),
            Command::Quit => return false,
        }
        true
    }

    /// Draws the next frame, rebuilding the static scene first if needed
    pub fn tick(&mut self, surface: &mut S) -> Frame {
        if self.stale || self.background.is_none() {
            self.rebuild_background(surface);
        }
        self.render_frame(surface)
    }

    /// Redraws the circle and both full curves and caches the result
    pub fn rebuild_background(&mut self, surface: &mut S) {
        log::trace!("rebuilding background");
        let toggles = &self.state.toggles;
        surface.clear(self.colors.color(Role::Background));

        if toggles.is_shown(Toggle::Circle) {
            surface.stroke_arc(
                self.geometry.center(),
                self.geometry.radius,
                self.colors.color(Role::Circle),
            );
        }
        if toggles.is_shown(Toggle::Sin) {
            surface.stroke_path(&self.geometry.sine_curve(), self.colors.color(Role::Sin));
        }
        if toggles.is_shown(Toggle::Cos) {
            surface.stroke_path(&self.geometry.cosine_curve(), self.colors.color(Role::Cos));
        }

        self.background = Some(surface.capture());
        self.stale = false;
    }

    fn render_frame(&mut self, surface: &mut S) -> Frame {
        if self.state.toggles.is_shown(Toggle::Auto) {
            self.state.advance();
        }

        let angle = self.state.angle;
        let point = self.geometry.point(angle);
        let sine = self.geometry.sine_projection(angle);
        let cosine = self.geometry.cosine_projection(angle);

        // erase the previous frame's overlay
        if let Some(background) = &self.background {
            surface.restore(background);
        }

        let toggles = &self.state.toggles;
        let show_sin = toggles.is_shown(Toggle::Sin);
        let show_cos = toggles.is_shown(Toggle::Cos);
        let edges = toggles.is_shown(Toggle::Edges);

        if toggles.is_shown(Toggle::Circle) && toggles.is_shown(Toggle::Lines) {
            if show_sin {
                surface.stroke_line(point, sine, self.colors.color(Role::SinAlpha), true);
            }
            if show_cos {
                surface.stroke_line(point, cosine, self.colors.color(Role::CosAlpha), true);
            }
        }

        if show_sin {
            if edges {
                let origin = Point::new(sine.x, 0.0);
                surface.stroke_line(sine, origin, self.colors.color(Role::Sin), false);
                self.draw_blob(surface, origin, Role::Sin, Coords::Both);
            }
            self.draw_blob(surface, sine, Role::Sin, Coords::Y);
        }

        if show_cos {
            if edges {
                let origin = Point::new(0.0, cosine.y);
                surface.stroke_line(origin, cosine, self.colors.color(Role::Cos), false);
                self.draw_blob(surface, origin, Role::Cos, Coords::Both);
            }
            self.draw_blob(surface, cosine, Role::Cos, Coords::X);
        }

        if toggles.is_shown(Toggle::Circle) {
            self.draw_blob(surface, point, Role::Circle, Coords::Both);
        }

        Frame {
            angle,
            point,
            sine,
            cosine,
        }
    }

    fn draw_blob(&self, surface: &mut S, at: Point, role: Role, coords: Coords) {
        let blob = self.geometry.blob_size;
        let stroke = self.colors.color(role);
        surface.fill_blob(at, blob, self.colors.color(Role::Background), stroke);

        if self.state.toggles.is_shown(Toggle::Numbers) {
            let text = match coords {
                Coords::Both => format!("x{:.0} y{:.0}", at.x, at.y),
                Coords::X => format!("x{:.0}", at.x),
                Coords::Y => format!("y{:.0}", at.y),
            };
            surface.fill_text(Point::new(at.x + blob, at.y - blob), &text, stroke);
        }
    }
}
