use crate::error::{Error, Result};
use crate::math::TAU;
use crate::state::{Toggle, Toggles};
use crate::theme::Scheme;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Largest canvas side, in device pixels; terminal cursor positions are `u16`
const MAX_CANVAS: f64 = u16::MAX as f64;

/// Color scheme selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    /// Guess from the terminal's COLORFGBG hint
    Auto,
    Light,
    Dark,
}

/// Animates a point on a circle next to its sine and cosine waves.
///
/// Keys: s/c/p toggle sine, cosine and circle; l lines; e edges; n numbers;
/// a or space auto-play; r reverse; arrows step by hand; t theme; q quit.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Circle radius in logical units
    #[arg(long, default_value_t = 50.0, env = "SINCOS_RADIUS")]
    pub radius: f64,

    /// Radians advanced per frame
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true, env = "SINCOS_STEP")]
    pub step: f64,

    /// Frames per second
    #[arg(long, default_value_t = 60, env = "SINCOS_FPS")]
    pub fps: u32,

    /// Device pixels per logical unit; fits the terminal when omitted
    #[arg(long, env = "SINCOS_SCALE")]
    pub scale: Option<f64>,

    #[arg(long, value_enum, default_value_t = ThemeArg::Auto, env = "SINCOS_THEME")]
    pub theme: ThemeArg,

    /// Display flags to switch on (sin, cos, lines, edges, circle, numbers, auto, reverse)
    #[arg(long, value_delimiter = ',')]
    pub show: Vec<Toggle>,

    /// Display flags to switch off
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<Toggle>,

    /// Starting angle in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub angle: f64,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub radius: f64,
    pub step: f64,
    pub frame: Duration,
    pub scale: Option<f64>,
    pub scheme: Scheme,
    pub toggles: Toggles,
    pub angle: f64,
}

impl Settings {
    pub fn from_args(args: Args) -> Result<Self> {
        if !(args.radius.is_finite() && args.radius > 0.0) {
            return Err(invalid("radius", format!("{} is not a positive number", args.radius)));
        }
        if !(args.step > 0.0 && args.step < TAU) {
            return Err(invalid("step", format!("{} is not between 0 and 2π", args.step)));
        }
        if !(1..=240).contains(&args.fps) {
            return Err(invalid("fps", format!("{} is not between 1 and 240", args.fps)));
        }
        if let Some(scale) = args.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(invalid("scale", format!("{scale} is not a positive number")));
            }
            // canvas side is 2·scale·r plus a margin of scale·r
            let side = 3.0 * scale * args.radius;
            if side > MAX_CANVAS {
                let reason = format!(
                    "canvas of {side} px at radius {} exceeds {MAX_CANVAS} px",
                    args.radius
                );
                return Err(invalid("scale", reason));
            }
        }
        if !args.angle.is_finite() {
            return Err(invalid("angle", format!("{} is not finite", args.angle)));
        }

        let mut toggles = Toggles::default();
        for toggle in &args.show {
            toggles.set(*toggle, true);
        }
        for toggle in &args.hide {
            toggles.set(*toggle, false);
        }

        let scheme = match args.theme {
            ThemeArg::Auto => Scheme::detect(),
            ThemeArg::Light => Scheme::Light,
            ThemeArg::Dark => Scheme::Dark,
        };

        Ok(Settings {
            radius: args.radius,
            step: args.step,
            frame: Duration::from_secs_f64(1.0 / args.fps as f64),
            scale: args.scale,
            scheme,
            toggles,
            angle: args.angle,
        })
    }
}

fn invalid(name: &'static str, reason: String) -> Error {
    Error::InvalidSetting { name, reason }
}
