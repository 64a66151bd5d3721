//! CLI definitions using clap derive API

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser};

use crate::config::DEFAULT_CONFIG_FILE;

/// Long flags that may also be spelled with a single dash (`-function name`)
const LONG_FLAGS: &[&str] = &["function", "purge", "config", "package-only", "verbose"];

/// lapd - package and deploy a Lambda function
///
/// Zips the files selected for a function in lapd.yml, uploads the archive
/// to S3 and points the function's code at it.
#[derive(Parser, Debug)]
#[command(
    name = "lapd",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package a source tree, upload it to S3 and update a Lambda function",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  lapd --function import-document\n    \
                  lapd --function import-document --purge\n    \
                  lapd -function default -package-only\n    \
                  lapd --config deploy/lapd.yml --function api"
)]
pub struct Cli {
    /// Function to package and deploy, as named in the configuration
    #[arg(long, short = 'f', value_name = "NAME")]
    pub function: String,

    /// Delete all CloudWatch log streams of the function after deploying
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub purge: bool,

    /// Configuration file (created with defaults if missing)
    #[arg(long, short = 'c', env = "LAPD_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Build the archive only, without uploading or deploying
    #[arg(long)]
    pub package_only: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Rewrite Go-style single-dash long flags to the double-dash form
///
/// `-function x`, `-function=x` and `-purge` become `--function x`,
/// `--function=x` and `--purge`. Arguments after `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    None
                }
                Some(s) if is_single_dash_long(s) => Some(OsString::from(format!("-{s}"))),
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LONG_FLAGS.contains(&name)
}
