use crate::graphics::Color;
use strum::Display;

/// Semantic color roles used by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Sin,
    Cos,
    Circle,
    Background,
    Foreground,
    SinAlpha,
    CosAlpha,
}

/// Light or dark terminal background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    Light,
    Dark,
}

/// Alpha applied to the translucent role variants
const SOFT_ALPHA: u8 = 0x80;

impl Scheme {
    /// Guesses the scheme from the `COLORFGBG` hint many terminals export
    pub fn detect() -> Self {
        match std::env::var("COLORFGBG") {
            Ok(value) => Scheme::from_colorfgbg(&value).unwrap_or(Scheme::Dark),
            Err(_) => Scheme::Dark,
        }
    }

    /// Parses `"fg;bg"` (or `"fg;default;bg"`), where the last field is an
    /// ANSI color index
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        match bg {
            0..=6 | 8 => Some(Scheme::Dark),
            _ => Some(Scheme::Light),
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Scheme::Light => Scheme::Dark,
            Scheme::Dark => Scheme::Light,
        }
    }
}

/// Colors for every role under one scheme
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    pub scheme: Scheme,
    sin: Color,
    cos: Color,
    circle: Color,
    background: Color,
    foreground: Color,
}

impl ColorScheme {
    pub fn for_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Light => ColorScheme {
                scheme,
                sin: Color::rgb8(0xc0, 0x39, 0x2b),
                cos: Color::rgb8(0x1f, 0x5f, 0xbf),
                circle: Color::rgb8(0x2e, 0x8b, 0x57),
                background: Color::rgb8(0xfa, 0xfa, 0xf5),
                foreground: Color::rgb8(0x22, 0x22, 0x22),
            },
            Scheme::Dark => ColorScheme {
                scheme,
                sin: Color::rgb8(0xff, 0x6e, 0x6e),
                cos: Color::rgb8(0x6e, 0xb4, 0xff),
                circle: Color::rgb8(0x8f, 0xe3, 0x88),
                background: Color::rgb8(0x12, 0x14, 0x1a),
                foreground: Color::rgb8(0xe6, 0xe6, 0xe6),
            },
        }
    }

    pub fn color(&self, role: Role) -> Color {
        match role {
            Role::Sin => self.sin,
            Role::Cos => self.cos,
            Role::Circle => self.circle,
            Role::Background => self.background,
            Role::Foreground => self.foreground,
            Role::SinAlpha => self.sin.with_alpha(SOFT_ALPHA),
            Role::CosAlpha => self.cos.with_alpha(SOFT_ALPHA),
        }
    }
}
