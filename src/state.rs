use crate::math::{step_angle, Direction};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A display flag the user can switch on and off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Toggle {
    Sin,
    Cos,
    /// Dashed connectors from the moving point to the projections
    Lines,
    /// Solid connectors from the projections to their axis origins
    Edges,
    Circle,
    /// Coordinate labels next to every marker
    Numbers,
    Auto,
    /// Bounce at the ends of the turn instead of wrapping
    Reverse,
}

impl Toggle {
    fn default_state(self) -> bool {
        matches!(
            self,
            Toggle::Sin | Toggle::Cos | Toggle::Lines | Toggle::Circle | Toggle::Auto
        )
    }
}

/// Current state of every display flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggles {
    flags: HashMap<Toggle, bool>,
}

impl Default for Toggles {
    fn default() -> Self {
        Toggles {
            flags: Toggle::iter().map(|t| (t, t.default_state())).collect(),
        }
    }
}

impl Toggles {
    pub fn is_shown(&self, toggle: Toggle) -> bool {
        self.flags.get(&toggle).copied().unwrap_or(false)
    }

    pub fn set(&mut self, toggle: Toggle, on: bool) {
        self.flags.insert(toggle, on);
    }

    /// Flips a flag and returns its new value
    pub fn flip(&mut self, toggle: Toggle) -> bool {
        let on = !self.is_shown(toggle);
        self.set(toggle, on);
        on
    }

    /// Enabled flags in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = Toggle> + '_ {
        Toggle::iter().filter(|t| self.is_shown(*t))
    }
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Position of the point on the circle, always in `[0, TAU)`
    pub angle: f64,
    /// Direction the angle advances in on each automatic step
    pub direction: Direction,
    /// Radians per step
    pub step: f64,
    pub toggles: Toggles,
}

impl AppState {
    pub fn new(angle: f64, step: f64, toggles: Toggles) -> Self {
        AppState {
            angle: crate::math::wrap_angle(angle),
            direction: Direction::Forward,
            step,
            toggles,
        }
    }

    /// Advances the angle one step in the persisted direction
    pub fn advance(&mut self) {
        let (angle, direction) = step_angle(
            self.angle,
            self.direction,
            self.step,
            self.toggles.is_shown(Toggle::Reverse),
        );
        if direction != self.direction {
            log::debug!("bounced at {angle:.3}, now moving {direction:?}");
        }
        self.angle = angle;
        self.direction = direction;
    }

    /// Moves one step by hand and stops automatic play
    pub fn nudge(&mut self, direction: Direction) {
        let (angle, _) = step_angle(
            self.angle,
            direction,
            self.step,
            self.toggles.is_shown(Toggle::Reverse),
        );
        self.angle = angle;
        self.toggles.set(Toggle::Auto, false);
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(0.0, 0.01, Toggles::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TAU;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("sin", Toggle::Sin)]
    #[case("cos", Toggle::Cos)]
    #[case("Lines", Toggle::Lines)]
    #[case("EDGES", Toggle::Edges)]
    #[case("circle", Toggle::Circle)]
    #[case("numbers", Toggle::Numbers)]
    #[case("auto", Toggle::Auto)]
    #[case("reverse", Toggle::Reverse)]
    fn parses_toggle_names(#[case] name: &str, #[case] expected: Toggle) {
        assert_eq!(Toggle::from_str(name), Ok(expected));
    }

    #[test]
    fn unknown_toggle_is_an_error() {
        assert!(Toggle::from_str("tan").is_err());
    }

    #[test]
    fn default_toggles() {
        let toggles = Toggles::default();
        let enabled: Vec<_> = toggles.enabled().collect();
        assert_eq!(
            enabled,
            vec![Toggle::Sin, Toggle::Cos, Toggle::Lines, Toggle::Circle, Toggle::Auto]
        );
    }

    #[test]
    fn flip_returns_new_value() {
        let mut toggles = Toggles::default();
        assert!(toggles.flip(Toggle::Numbers));
        assert!(toggles.is_shown(Toggle::Numbers));
        assert!(!toggles.flip(Toggle::Numbers));
    }

    #[test]
    fn advance_persists_bounced_direction() {
        let mut toggles = Toggles::default();
        toggles.set(Toggle::Reverse, true);
        let mut state = AppState::new(TAU - 0.001, 0.01, toggles);
        state.advance();
        assert_eq!(state.direction, Direction::Backward);
        assert_relative_eq!(state.angle, TAU - 0.009, epsilon = 1e-12);
        state.advance();
        assert_eq!(state.direction, Direction::Backward);
        assert_relative_eq!(state.angle, TAU - 0.019, epsilon = 1e-12);
    }

    #[test]
    fn nudge_stops_auto_play() {
        let mut state = AppState::default();
        state.nudge(Direction::Backward);
        assert!(!state.toggles.is_shown(Toggle::Auto));
        assert_relative_eq!(state.angle, TAU - 0.01, epsilon = 1e-12);
        assert_eq!(state.direction, Direction::Forward);
    }

    #[test]
    fn start_angle_is_wrapped() {
        let state = AppState::new(TAU + 1.0, 0.01, Toggles::default());
        assert_relative_eq!(state.angle, 1.0, epsilon = 1e-12);
    }
}
