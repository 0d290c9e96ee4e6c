//! Argument normalization.
//!
//! The tool has always been invoked Go-style (`-owner=acme -repo=widgets`).
//! clap only knows `--long` flags, so single-dash spellings of declared
//! long flags are rewritten before parsing.

use std::ffi::OsString;

use clap::CommandFactory;

use super::Cli;

/// Rewrite `-name[=value]` to `--name[=value]` for every declared long flag
///
/// The program name, unknown flags, short flags and anything after `--`
/// pass through untouched.
pub fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let longs = long_flags();
    let mut passthrough = false;

    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg: OsString = arg.into();
            if i == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }

            arg.to_str()
                .and_then(|s| go_style(s, &longs))
                .map(OsString::from)
                .unwrap_or(arg)
        })
        .collect()
}

fn long_flags() -> Vec<String> {
    Cli::command()
        .get_arguments()
        .filter_map(|a| a.get_long())
        .chain(["help", "version"])
        .map(str::to_string)
        .collect()
}

fn go_style(arg: &str, longs: &[String]) -> Option<String> {
    let body = arg.strip_prefix('-')?;
    if body.starts_with('-') {
        return None;
    }

    let name = body.split_once('=').map_or(body, |(name, _)| name);
    if name.len() > 1 && longs.iter().any(|l| l == name) {
        Some(format!("-{}", arg))
    } else {
        None
    }
}
