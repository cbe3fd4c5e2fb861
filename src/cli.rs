use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Arg, ArgAction, Command};

use crate::internal::config::{get_version_info, ColorMode, LoggerConfig};
use crate::internal::logger::Severity;

const SEVERITIES: [&str; 5] = ["debug", "info", "warn", "warning", "error"];

/// One run of the `taglog` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub config: LoggerConfig,
    pub module: Option<String>,
    pub severity: Severity,
    pub message: Vec<String>,
    pub stdin: bool,
}

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str = Box::leak(get_version_info().into_boxed_str());

    Command::new("taglog")
        .version(version)
        .about("Write module-tagged log lines to stdout and an optional file")
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .value_parser(SEVERITIES)
                .ignore_case(true)
                .default_value("debug")
                .help("Minimum severity that is written")
        )
        .arg(
            Arg::new("severity")
                .long("severity")
                .short('s')
                .value_parser(SEVERITIES)
                .ignore_case(true)
                .default_value("info")
                .help("Severity of the emitted lines")
        )
        .arg(
            Arg::new("module")
                .long("module")
                .short('m')
                .help("Module tag for the emitted lines (default: main)")
        )
        .arg(
            Arg::new("simple")
                .long("simple")
                .action(ArgAction::SetTrue)
                .help("Print only the time of day and drop the caller location")
        )
        .arg(
            Arg::new("align")
                .long("align")
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
                .help("Centre module tags in this many columns (0 disables)")
        )
        .arg(
            Arg::new("color")
                .long("color")
                .value_parser(["auto", "always", "never"])
                .default_value("auto")
                .help("Colour severity labels (auto|always|never)")
        )
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .help("Also append every line to this file")
        )
        .arg(
            Arg::new("stdin")
                .long("stdin")
                .action(ArgAction::SetTrue)
                .help("Log each line read from standard input")
        )
        .arg(
            Arg::new("message")
                .num_args(0..)
                .help("Words of the message to log")
        )
}

fn severity_arg(matches: &clap::ArgMatches, id: &str) -> anyhow::Result<Severity> {
    let value = matches
        .get_one::<String>(id)
        .ok_or_else(|| anyhow!("missing --{}", id))?;
    Ok(value.parse::<Severity>()?)
}

pub fn parse_config(matches: &clap::ArgMatches) -> anyhow::Result<Invocation> {
    let level = severity_arg(matches, "level")?;
    let severity = severity_arg(matches, "severity")?;

    let color = matches
        .get_one::<String>("color")
        .and_then(|s| ColorMode::parse(s))
        .unwrap_or_default();

    let tag_align = matches.get_one::<usize>("align").copied().unwrap_or(0);

    let file = matches.get_one::<String>("file").map(PathBuf::from);

    let module = matches.get_one::<String>("module").map(|s| s.to_string());

    let message = matches
        .get_many::<String>("message")
        .map(|words| words.cloned().collect())
        .unwrap_or_default();

    let config = LoggerConfig {
        level,
        simple: matches.get_flag("simple"),
        tag_align,
        color,
        file,
        ..Default::default()
    };

    Ok(Invocation {
        config,
        module,
        severity,
        message,
        stdin: matches.get_flag("stdin"),
    })
}
