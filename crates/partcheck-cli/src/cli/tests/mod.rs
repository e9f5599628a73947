//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use clap_complete::Shell;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_verify_defaults() {
    match parse(&["partcheck", "verify", "s3://bucket/a/b.bin", "./b.bin"]).command {
        CliCommand::Verify {
            object,
            file,
            attributes,
            part_size,
            json,
        } => {
            assert_eq!(object.bucket, "bucket");
            assert_eq!(object.key, "a/b.bin");
            assert_eq!(file, Path::new("./b.bin"));
            assert!(attributes.is_none());
            assert!(part_size.is_none());
            assert!(!json);
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_with_options() {
    let cli = parse(&[
        "partcheck",
        "verify",
        "bucket/key",
        "file.bin",
        "--attributes",
        "attrs.json",
        "--part-size",
        "8388608",
        "--json",
        "--config",
        "/tmp/partcheck.toml",
    ]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/partcheck.toml")));
    match cli.command {
        CliCommand::Verify {
            attributes,
            part_size,
            json,
            ..
        } => {
            assert_eq!(attributes.as_deref(), Some(Path::new("attrs.json")));
            assert_eq!(part_size, Some(8_388_608));
            assert!(json);
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_rejects_bad_locator() {
    assert!(Cli::try_parse_from(["partcheck", "verify", "s3://bucket", "f"]).is_err());
}

#[test]
fn cli_parse_checksum() {
    match parse(&["partcheck", "checksum", "disk.img", "--part-size", "100"]).command {
        CliCommand::Checksum {
            file,
            part_size,
            json,
        } => {
            assert_eq!(file, Path::new("disk.img"));
            assert_eq!(part_size, Some(100));
            assert!(!json);
        }
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["partcheck", "completions", "bash"]).command {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["partcheck"]).is_err());
}
