//! symstat: load one symbol per input line and report the table shape.
//!
//! Usage: `symstat [BUCKETS] < keys.txt`
//!
//! The bucket count comes from the first argument, else `SYMSTAT_BUCKETS`,
//! else the library default. Empty lines are skipped. Log output is
//! filtered with `RUST_LOG`.

use anyhow::{Context, Result};
use bucket_symtab::{SymbolTable, TableConfig};
use std::io::{self, BufRead};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Table config from the positional argument or the environment value;
/// the argument wins.
fn table_config(arg: Option<String>, env: Option<String>) -> Result<TableConfig> {
    let Some(raw) = arg.or(env) else {
        return Ok(TableConfig::default());
    };
    let buckets = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid bucket count {:?}", raw))?;
    Ok(TableConfig::new(buckets))
}

/// Store every non-empty line of `reader`; returns how many were read.
fn load<R: BufRead>(reader: R, table: &mut SymbolTable<()>) -> Result<usize> {
    let mut lines = 0usize;
    for line in reader.split(b'\n') {
        let mut line = line.context("reading input")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            continue;
        }
        lines += 1;
        table
            .get_or_create(&line)
            .with_context(|| format!("storing key #{}", lines))?;
    }
    Ok(lines)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = table_config(
        std::env::args().nth(1),
        std::env::var("SYMSTAT_BUCKETS").ok(),
    )?;
    let mut table: SymbolTable<()> = SymbolTable::with_config(config)?;

    let lines = load(io::stdin().lock(), &mut table)?;

    info!(lines, symbols = table.len(), "input consumed");
    println!("{}", table.stat());
    Ok(())
}
