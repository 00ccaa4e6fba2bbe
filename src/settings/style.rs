//! Flash style parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Style value parse errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseStyleError {
    #[error("invalid color '{0}' (expected a name or #RRGGBB[AA])")]
    Color(String),

    #[error("unknown animation style '{0}'")]
    AnimationStyle(String),
}

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 122, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 59, 48);
    pub const GREEN: Color = Color::rgb(52, 199, 89);
    pub const YELLOW: Color = Color::rgb(255, 204, 0);
    pub const ORANGE: Color = Color::rgb(255, 149, 0);
    pub const PURPLE: Color = Color::rgb(175, 82, 222);
    pub const PINK: Color = Color::rgb(255, 45, 85);
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "cyan" => Self::CYAN,
            "blue" => Self::BLUE,
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "yellow" => Self::YELLOW,
            "orange" => Self::ORANGE,
            "purple" => Self::PURPLE,
            "pink" => Self::PINK,
            "clear" => Self::CLEAR,
            _ => return None,
        };
        Some(color)
    }
}

impl FromStr for Color {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        if let Some(color) = Self::named(&trimmed) {
            return Ok(color);
        }

        let invalid = || ParseStyleError::Color(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ParseStyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Presentation variant; drawing is up to the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationStyle {
    #[default]
    RadialBurst,
    LinearWave,
    Pulse,
    Ripple,
}

impl AnimationStyle {
    pub const ALL: [AnimationStyle; 4] = [
        AnimationStyle::RadialBurst,
        AnimationStyle::LinearWave,
        AnimationStyle::Pulse,
        AnimationStyle::Ripple,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AnimationStyle::RadialBurst => "radial-burst",
            AnimationStyle::LinearWave => "linear-wave",
            AnimationStyle::Pulse => "pulse",
            AnimationStyle::Ripple => "ripple",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AnimationStyle::RadialBurst => "Radial Burst",
            AnimationStyle::LinearWave => "Linear Wave",
            AnimationStyle::Pulse => "Pulse",
            AnimationStyle::Ripple => "Ripple",
        }
    }
}

impl FromStr for AnimationStyle {
    type Err = ParseStyleError;

    /// Accepts `radial-burst`, `radialBurst` and `Radial Burst` alike
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|style| style.key().replace('-', "") == folded)
            .ok_or_else(|| ParseStyleError::AnimationStyle(s.to_string()))
    }
}

impl fmt::Display for AnimationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of every animation parameter
///
/// Every trigger copies one of these; edits to the live settings never reach
/// a flash that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub primary_color: Color,
    pub secondary_color: Color,
    pub accent_color: Color,
    pub style: AnimationStyle,
    pub duration_seconds: f64,
    pub edge_thickness: f64,
    pub show_direction_arrow: bool,
    pub show_particles: bool,
}

pub const DEFAULT_DURATION_SECONDS: f64 = 0.6;
pub const DEFAULT_EDGE_THICKNESS: f64 = 20.0;

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            primary_color: Color::CYAN,
            secondary_color: Color::BLUE,
            accent_color: Color::WHITE,
            style: AnimationStyle::RadialBurst,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            edge_thickness: DEFAULT_EDGE_THICKNESS,
            show_direction_arrow: true,
            show_particles: true,
        }
    }
}

impl StyleConfig {
    /// Flash duration
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_seconds)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(DEFAULT_DURATION_SECONDS))
    }

    /// Check the numeric parameters
    pub fn validate(&self) -> Result<(), String> {
        validate_duration(self.duration_seconds)?;
        validate_thickness(self.edge_thickness)?;
        Ok(())
    }

    /// Canonical string form of one field, as persisted
    pub fn get(&self, key: StyleKey) -> String {
        match key {
            StyleKey::PrimaryColor => self.primary_color.to_string(),
            StyleKey::SecondaryColor => self.secondary_color.to_string(),
            StyleKey::AccentColor => self.accent_color.to_string(),
            StyleKey::AnimationStyle => self.style.to_string(),
            StyleKey::AnimationDuration => self.duration_seconds.to_string(),
            StyleKey::FlashThickness => self.edge_thickness.to_string(),
            StyleKey::ShowArrow => self.show_direction_arrow.to_string(),
            StyleKey::ShowParticles => self.show_particles.to_string(),
        }
    }

    /// Parse and validate `raw`, then store it in the field for `key`
    ///
    /// The config is left untouched when the value is rejected.
    pub fn apply(&mut self, key: StyleKey, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        match key {
            StyleKey::PrimaryColor => self.primary_color = raw.parse().map_err(err_string)?,
            StyleKey::SecondaryColor => self.secondary_color = raw.parse().map_err(err_string)?,
            StyleKey::AccentColor => self.accent_color = raw.parse().map_err(err_string)?,
            StyleKey::AnimationStyle => self.style = raw.parse().map_err(err_string)?,
            StyleKey::AnimationDuration => {
                let seconds = parse_number(raw)?;
                validate_duration(seconds)?;
                self.duration_seconds = seconds;
            }
            StyleKey::FlashThickness => {
                let thickness = parse_number(raw)?;
                validate_thickness(thickness)?;
                self.edge_thickness = thickness;
            }
            StyleKey::ShowArrow => self.show_direction_arrow = parse_flag(raw)?,
            StyleKey::ShowParticles => self.show_particles = parse_flag(raw)?,
        }
        Ok(())
    }
}

fn err_string(e: ParseStyleError) -> String {
    e.to_string()
}

fn parse_number(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", raw))
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("'{}' is not a boolean", raw)),
    }
}

fn validate_duration(seconds: f64) -> Result<(), String> {
    if seconds.is_finite() && seconds > 0.0 {
        Ok(())
    } else {
        Err(format!("duration must be a positive number of seconds, got {}", seconds))
    }
}

fn validate_thickness(thickness: f64) -> Result<(), String> {
    if thickness.is_finite() && thickness > 0.0 {
        Ok(())
    } else {
        Err(format!("edge thickness must be positive, got {}", thickness))
    }
}

/// Persisted style fields, keyed by name in the settings store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    PrimaryColor,
    SecondaryColor,
    AccentColor,
    AnimationStyle,
    AnimationDuration,
    FlashThickness,
    ShowArrow,
    ShowParticles,
}

impl StyleKey {
    pub const ALL: [StyleKey; 8] = [
        StyleKey::PrimaryColor,
        StyleKey::SecondaryColor,
        StyleKey::AccentColor,
        StyleKey::AnimationStyle,
        StyleKey::AnimationDuration,
        StyleKey::FlashThickness,
        StyleKey::ShowArrow,
        StyleKey::ShowParticles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleKey::PrimaryColor => "primary_color",
            StyleKey::SecondaryColor => "secondary_color",
            StyleKey::AccentColor => "accent_color",
            StyleKey::AnimationStyle => "animation_style",
            StyleKey::AnimationDuration => "animation_duration",
            StyleKey::FlashThickness => "flash_thickness",
            StyleKey::ShowArrow => "show_arrow",
            StyleKey::ShowParticles => "show_particles",
        }
    }
}

impl FromStr for StyleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
