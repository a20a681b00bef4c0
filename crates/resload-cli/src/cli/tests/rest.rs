//! Tests for resolve and config.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_resolve() {
    match parse(&["resload", "resolve", "--base", "https://e.com/", "a.js", "../b.css"]) {
        CliCommand::Resolve { urls, base } => {
            assert_eq!(urls, vec!["a.js", "../b.css"]);
            assert_eq!(base.as_deref(), Some("https://e.com/"));
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_config() {
    match parse(&["resload", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["resload", "add", "x"]).is_err());
}

#[test]
fn base_url_prefers_flag_then_config() {
    use crate::cli::commands::base_url;

    let u = base_url(Some("https://flag.example/"), Some("https://cfg.example/")).unwrap();
    assert_eq!(u.as_str(), "https://flag.example/");
    let u = base_url(None, Some("https://cfg.example/")).unwrap();
    assert_eq!(u.as_str(), "https://cfg.example/");
    let u = base_url(None, None).unwrap();
    assert_eq!(u.scheme(), "file");
    assert!(u.as_str().ends_with('/'));
    assert!(base_url(Some("not a url"), None).is_err());
}
