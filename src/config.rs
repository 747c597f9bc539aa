//! Saved default flags.
//!
//! Defaults live in `.markpadrc`-style files holding the same flags the CLI
//! accepts, whitespace separated, with `#` comment lines. Values holding
//! spaces are double-quoted, with `\"` and `\\` escapes inside the quotes. A
//! global file is merged with a local `./.markpadrc`, and CLI flags are merged
//! on top.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::typography::{FontColor, FontFamily, FontSize, Typography};

const LOCAL_FILE_NAME: &str = ".markpadrc";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub font: Option<FontFamily>,
    pub size: Option<FontSize>,
    pub color: Option<FontColor>,
    pub preview: bool,
    pub perf: bool,
    pub event_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` on top of `self`: options from `other` win, booleans OR.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            font: other.font.or(self.font),
            size: other.size.or(self.size),
            color: other.color.or(self.color),
            preview: self.preview || other.preview,
            perf: self.perf || other.perf,
            event_log: other
                .event_log
                .clone()
                .or_else(|| self.event_log.clone()),
        }
    }

    /// Starting typography, with defaults for anything unset.
    pub fn typography(&self) -> Typography {
        let defaults = Typography::default();
        Typography {
            family: self.font.unwrap_or(defaults.family),
            size: self.size.unwrap_or(defaults.size),
            color: self.color.unwrap_or(defaults.color),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    PathBuf::from(LOCAL_FILE_NAME)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE_NAME)
}

/// Load flags from a config file; a missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(split_config_line)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as the new defaults, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# markpad defaults (saved with --save)".to_string());
    // Multi-word family names are written without spaces so they survive
    // whitespace tokenizing; parsing ignores spaces.
    if let Some(font) = flags.font {
        lines.push(format!("--font {}", font.label().replace(' ', "")));
    }
    if let Some(size) = flags.size {
        lines.push(format!("--size {}", size.px()));
    }
    if let Some(color) = flags.color {
        lines.push(format!("--color {color}"));
    }
    if flags.preview {
        lines.push("--preview".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.event_log {
        lines.push(format!(
            "--event-log {}",
            quote_value(&path.display().to_string())
        ));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Split a config line into tokens, honoring double quotes.
fn split_config_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Quote a value for [`split_config_line`] when it would not survive as-is.
fn quote_value(value: &str) -> String {
    if !value.is_empty() && !value.contains(|c: char| c.is_whitespace() || c == '"') {
        return value.to_string();
    }
    let escaped = value.replace('\\', r"\\").replace('"', r#"\""#);
    format!("\"{escaped}\"")
}

/// Remove a saved config file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list. Unknown tokens are skipped and
/// invalid typography values are logged and ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(name, "--font" | "--size" | "--color" | "--event-log");
        let value = if takes_value {
            inline_value.or_else(|| {
                let next = tokens.get(i + 1)?;
                i += 1;
                Some(next.as_str())
            })
        } else {
            None
        };

        match (name, value) {
            ("--preview", _) => flags.preview = true,
            ("--perf", _) => flags.perf = true,
            ("--font", Some(value)) => flags.font = parse_value(name, value).or(flags.font),
            ("--size", Some(value)) => flags.size = parse_value(name, value).or(flags.size),
            ("--color", Some(value)) => flags.color = parse_value(name, value).or(flags.color),
            ("--event-log", Some(value)) => flags.event_log = Some(PathBuf::from(value)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_value<T>(flag: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(flag, value, %err, "ignoring invalid flag value");
            None
        }
    }
}
