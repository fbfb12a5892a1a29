use anyhow::Result;
use clap_complete::Shell;

use super::build;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_completions_with_short_shell_flag() -> Result<()> {
    let matches = build().try_get_matches_from(vec!["counsel", "completions", "-s", "zsh"])?;
    let (name, subcmd_matches) = matches.subcommand().unwrap();

    assert_eq!(name, "completions");
    assert_eq!(subcmd_matches.get_one::<Shell>("shell"), Some(&Shell::Zsh));

    return Ok(());
}

#[test]
fn it_accepts_global_flags_after_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "counsel",
        "session",
        "show",
        "--session-id",
        "abc",
    ])?;
    let (_, session_matches) = matches.subcommand().unwrap();
    let (_, show_matches) = session_matches.subcommand().unwrap();

    assert_eq!(
        show_matches.get_one::<String>("session-id").map(|e| return e.as_str()),
        Some("abc")
    );

    return Ok(());
}
