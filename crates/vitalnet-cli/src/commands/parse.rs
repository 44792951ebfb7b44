//! `vitalnet parse`: decode a saved raw response and print it as JSON.

use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use vitalnet_protocol::ResponseParser;

use super::{print_json, response_json};

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// File holding the raw response bytes, `-` for stdin
    pub input: PathBuf,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    let raw = if args.input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?
    };

    print_json(&parse(&raw)?)
}

/// Parity-stripped, classified and extracted, as JSON.
pub fn parse(raw: &[u8]) -> anyhow::Result<Value> {
    let response = ResponseParser::parse_bytes(raw)?;
    Ok(response_json(&response))
}
