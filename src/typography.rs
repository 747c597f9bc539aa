//! Display typography for the preview surface.
//!
//! Every attribute is a closed set: the toolbar only ever offers the members
//! listed here, so the session never has to validate a value at runtime.
//! Parsing from text exists for configuration files and the command line.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A typography label that is not a member of its enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypographyError {
    #[error("unknown font family `{0}` (expected one of: {list})", list = FontFamily::labels())]
    UnknownFamily(String),
    #[error("unsupported font size `{0}` (expected one of: {list})", list = FontSize::labels())]
    UnknownSize(String),
    #[error("unknown font color `{0}` (expected one of: {list})", list = FontColor::labels())]
    UnknownColor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    Arial,
    Verdana,
    Helvetica,
    TimesNewRoman,
    CourierNew,
}

impl FontFamily {
    /// All families in toolbar order.
    pub const ALL: [Self; 5] = [
        Self::Arial,
        Self::Verdana,
        Self::Helvetica,
        Self::TimesNewRoman,
        Self::CourierNew,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::Verdana => "Verdana",
            Self::Helvetica => "Helvetica",
            Self::TimesNewRoman => "Times New Roman",
            Self::CourierNew => "Courier New",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }

    fn labels() -> String {
        join_labels(Self::ALL.iter().map(|f| f.label()))
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FontFamily {
    type Err = TypographyError;

    /// Accepts the display label in any case, with spaces, dashes or
    /// underscores between words (`times new roman`, `times-new-roman`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|family| normalize(family.label()) == wanted)
            .ok_or_else(|| TypographyError::UnknownFamily(s.to_string()))
    }
}

/// Font size in pixels, restricted to 6px..=18px in steps of 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u8);

impl FontSize {
    pub const MIN_PX: u8 = 6;
    pub const MAX_PX: u8 = 18;
    pub const STEP_PX: u8 = 2;

    /// All sizes in toolbar order.
    pub const ALL: [Self; 7] = [
        Self(6),
        Self(8),
        Self(10),
        Self(12),
        Self(14),
        Self(16),
        Self(18),
    ];

    /// The member with the given pixel value, if there is one.
    pub fn from_px(px: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.0 == px)
    }

    pub const fn px(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        format!("{}px", self.0)
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }

    fn labels() -> String {
        join_labels(Self::ALL.iter().map(|s| s.label()))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(16)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl FromStr for FontSize {
    type Err = TypographyError;

    /// Accepts `16` or `16px`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix("px")
            .or_else(|| trimmed.strip_suffix("PX"))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::from_px)
            .ok_or_else(|| TypographyError::UnknownSize(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontColor {
    #[default]
    Black,
    Red,
    Blue,
    Green,
}

impl FontColor {
    /// All colors in toolbar order.
    pub const ALL: [Self; 4] = [Self::Black, Self::Red, Self::Blue, Self::Green];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }

    fn labels() -> String {
        join_labels(Self::ALL.iter().map(|c| c.label()))
    }
}

impl fmt::Display for FontColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FontColor {
    type Err = TypographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|color| color.label() == wanted)
            .ok_or_else(|| TypographyError::UnknownColor(s.to_string()))
    }
}

/// The display attributes applied to the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Typography {
    pub family: FontFamily,
    pub size: FontSize,
    pub color: FontColor,
}

impl Typography {
    /// Inline style declaration carried by the preview container.
    pub fn css(&self) -> String {
        format!(
            "font-family: {}; font-size: {} !important; color: {}; white-space: pre-line;",
            self.family, self.size, self.color
        )
    }
}

/// The option lists offered by the toolbar selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypographyOptions {
    pub families: &'static [FontFamily],
    pub sizes: &'static [FontSize],
    pub colors: &'static [FontColor],
}

pub const fn options() -> TypographyOptions {
    TypographyOptions {
        families: &FontFamily::ALL,
        sizes: &FontSize::ALL,
        colors: &FontColor::ALL,
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn join_labels(labels: impl Iterator<Item = impl AsRef<str>>) -> String {
    labels
        .map(|l| l.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
