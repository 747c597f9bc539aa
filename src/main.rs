//! Markpad - A terminal markdown editor with a live HTML preview.
//!
//! # Usage
//!
//! ```bash
//! markpad notes.md
//! markpad notes.md --output notes.out.md --font verdana --size 14
//! markpad --preview --color blue README.md
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use markpad::app::App;
use markpad::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markpad::perf;
use markpad::typography::{FontColor, FontFamily, FontSize};

/// A terminal markdown editor with a live HTML preview
#[derive(Parser, Debug)]
#[command(name = "markpad", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (seeds the content when it exists)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Where submitted content is written (defaults to FILE, else stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Preview font family
    #[arg(long, value_name = "FAMILY")]
    font: Option<FontFamily>,

    /// Preview font size in px (6-18, even)
    #[arg(long, value_name = "PX")]
    size: Option<FontSize>,

    /// Preview text color
    #[arg(long, value_name = "COLOR")]
    color: Option<FontColor>,

    /// Start on the preview surface
    #[arg(long)]
    preview: bool,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write input and preview events to a file
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// What happened to submitted content while the editor was running.
#[derive(Debug, Default)]
struct SaveOutcome {
    /// Content waiting to be printed once the terminal is restored
    stdout: Option<String>,
    /// First write failure
    error: Option<anyhow::Error>,
}

fn read_initial_content(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path.exists() => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => Ok(String::new()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let event_log_path = effective
        .event_log
        .clone()
        .or_else(|| std::env::var_os("MARKPAD_EVENT_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_event_log_path(event_log_path.as_deref()) {
        tracing::warn!(
            path = %event_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to initialize event log"
        );
    }

    let content = read_initial_content(cli.file.as_deref())?;
    let target = cli.output.clone().or_else(|| cli.file.clone());

    let outcome = Rc::new(RefCell::new(SaveOutcome::default()));
    let sink = Rc::clone(&outcome);
    let on_save = move |content: &str| -> Result<()> {
        let mut outcome = sink.borrow_mut();
        let Some(path) = &target else {
            outcome.stdout = Some(content.to_string());
            return Ok(());
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
            .inspect_err(|err| {
                if outcome.error.is_none() {
                    outcome.error = Some(anyhow::anyhow!("{err:#}"));
                }
            })
    };

    // Run the application
    let mut app = App::new()
        .with_content(content)
        .with_typography(effective.typography())
        .with_preview(effective.preview)
        .with_on_save(on_save)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")?;

    let mut outcome = outcome.borrow_mut();
    if let Some(err) = outcome.error.take() {
        return Err(err);
    }
    if let Some(content) = outcome.stdout.take() {
        print!("{content}");
    }
    Ok(())
}
