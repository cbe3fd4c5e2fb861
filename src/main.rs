use std::io::{self, BufRead};

use anyhow::Context;
use taglog::cli::{build_cli, parse_config};
use taglog::Logger;

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let invocation = parse_config(&matches)?;

    let root = Logger::from_config(&invocation.config).context("failed to initialize logger")?;
    let module;
    let logger = match &invocation.module {
        Some(name) => {
            module = root.module(name.as_str());
            &module
        }
        None => &root,
    };

    if !invocation.message.is_empty() {
        let words: Vec<&dyn std::fmt::Display> = invocation
            .message
            .iter()
            .map(|w| w as &dyn std::fmt::Display)
            .collect();
        logger.log(invocation.severity, &words);
    }

    if invocation.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read standard input")?;
            logger.log(invocation.severity, &[&line]);
        }
    }

    root.close();
    Ok(())
}
