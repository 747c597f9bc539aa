use std::path::PathBuf;

use markpad::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use markpad::typography::{FontColor, FontFamily, FontSize};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = r"
# comment
--preview

--font courier-new

--event-log=events.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.preview);
    assert_eq!(flags.font, Some(FontFamily::CourierNew));
    assert_eq!(flags.event_log, Some(PathBuf::from("events.log")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markpadrc");
    let content = "--preview\n--color red\n--size 10\n--event-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "markpad".to_string(),
        "--color".to_string(),
        "green".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.preview, "file flags should remain enabled");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(effective.color, Some(FontColor::Green), "cli should override color");
    assert_eq!(effective.size, FontSize::from_px(10));
    assert_eq!(
        effective.event_log,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_local_override_sits_between_global_and_cli() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".markpadrc");
    std::fs::write(&global, "--font verdana\n--size 8\n").unwrap();
    std::fs::write(&local, "--font helvetica\n").unwrap();

    let file_flags = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    let effective = file_flags.union(&parse_flag_tokens(&["--size=14".to_string()]));

    let typography = effective.typography();
    assert_eq!(typography.family, FontFamily::Helvetica);
    assert_eq!(typography.size.px(), 14);
    assert_eq!(typography.color, FontColor::Black);
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        preview: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        perf: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.preview);
    assert!(merged.perf);
}
