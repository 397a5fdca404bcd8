use crate::graphics::Point;
use std::f64::consts::PI;

/// One full turn in radians
pub const TAU: f64 = 2.0 * PI;

/// Angle increment used when sampling the full sine and cosine curves
pub const SAMPLE_STEP: f64 = 0.01;

/// Direction in which the angle advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Sign applied to the step size
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Maps any finite angle into `[0, TAU)`
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to TAU itself
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Advances `current` by one step and keeps it inside `[0, TAU)`.
///
/// Without `reverse` the angle wraps around the circle. With `reverse` it
/// bounces off either bound and the returned direction is flipped, which
/// gives a ping-pong motion instead of a circular one.
pub fn step_angle(
    current: f64,
    direction: Direction,
    size: f64,
    reverse: bool,
) -> (f64, Direction) {
    let raw = current + direction.sign() * size;
    if !reverse {
        return (wrap_angle(raw), direction);
    }

    if raw >= TAU {
        (wrap_angle(2.0 * TAU - raw), direction.flip())
    } else if raw < 0.0 {
        (wrap_angle(-raw), direction.flip())
    } else {
        (raw, direction)
    }
}

/// Fixed geometry of the scene, in logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub radius: f64,
    pub diameter: f64,
    /// Radius of the point markers
    pub blob_size: f64,
    /// Converts an angle into a linear position along an axis
    pub multiplier: f64,
}

impl Geometry {
    pub fn new(radius: f64) -> Self {
        let diameter = 2.0 * radius;
        Geometry {
            radius,
            diameter,
            blob_size: radius / 25.0,
            multiplier: diameter / TAU,
        }
    }

    /// Center of the circle
    pub fn center(&self) -> Point {
        Point::new(self.radius, self.radius)
    }

    /// Position of the moving point on the circle
    pub fn point(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.radius - self.radius * cos, self.radius - self.radius * sin)
    }

    /// Linear position along an axis for the given angle, in `[0, diameter)`
    pub fn axis_position(&self, angle: f64) -> f64 {
        (angle * self.multiplier).rem_euclid(self.diameter)
    }

    /// Where the sine wave crosses the moving point's height.
    /// The angle runs right to left along the horizontal axis.
    pub fn sine_projection(&self, angle: f64) -> Point {
        let point = self.point(angle);
        Point::new(self.diameter - self.axis_position(angle), point.y)
    }

    /// Where the cosine wave crosses the moving point's horizontal position.
    /// The angle runs top to bottom along the vertical axis.
    pub fn cosine_projection(&self, angle: f64) -> Point {
        let point = self.point(angle);
        Point::new(point.x, self.axis_position(angle))
    }

    /// Full sine curve sampled over one turn
    pub fn sine_curve(&self) -> Vec<Point> {
        samples().map(|angle| self.sine_projection(angle)).collect()
    }

    /// Full cosine curve sampled over one turn
    pub fn cosine_curve(&self) -> Vec<Point> {
        samples().map(|angle| self.cosine_projection(angle)).collect()
    }
}

/// Angles `0, step, 2·step, ...` strictly below `TAU`
fn samples() -> impl Iterator<Item = f64> {
    (0..)
        .map(|i| i as f64 * SAMPLE_STEP)
        .take_while(|angle| *angle < TAU)
}
