//! prism-sg: tabulate a DescribeSecurityGroups response
//!
//! Each group's shared fields appear on its first row; every ingress
//! permission gets its own row in the `ports` column, rendered as
//! `protocol/cidr-list:port-range` (`0.0.0.0/0` shown as `*`, the
//! all-traffic rule as `*:*`).
//!
//! Usage:
//!   aws ec2 describe-security-groups | prism-sg
//!   prism-sg groups.json --fields 'name:GroupName id:GroupId'
//!   prism-sg groups.json --json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;
use prism::extract::{resolve, security_group_rows, Row, RowExtractor};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};

/// Field list of the original security-group listing, used when --fields is
/// omitted
const DEFAULT_FIELDS: &str = "name/30:GroupName id:GroupId description/40:Description";

#[derive(Parser, Debug)]
#[command(name = "prism-sg")]
#[command(about = "Tabulate security groups with one row per ingress rule", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Path from the document down to the group sequence
    #[arg(long, short = 'r', default_value = "SecurityGroups")]
    root: String,

    /// Whitespace-separated field specifications for the shared columns
    #[arg(long, short = 'f')]
    fields: Option<String>,

    /// Column name for the per-permission rows
    #[arg(long, default_value = "ports")]
    ports_column: String,

    /// Emit one JSON object per row instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let fields = args.fields.as_deref().unwrap_or(DEFAULT_FIELDS);
    let specs: Vec<&str> = fields.split_whitespace().collect();
    let extractor = RowExtractor::new(&specs).context("Failed to parse field specifications")?;

    let document = read_document(args.input.as_deref())?;
    let groups = match resolve(&document, &args.root)
        .with_context(|| format!("Failed to resolve --root {:?}", args.root))?
        .into_value()
    {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut rows = Vec::new();
    for group in &groups {
        let expanded = security_group_rows(group, &extractor, &args.ports_column)
            .context("Failed to extract security group")?;
        rows.extend(expanded);
    }

    if args.json {
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
    } else {
        print_table(&rows, extractor.specs().iter().map(|s| s.name.clone()), &args.ports_column);
    }

    Ok(())
}

/// Read one JSON document, simd-json first with a serde_json fallback.
fn read_document(input: Option<&str>) -> Result<Value> {
    let mut content = Vec::new();
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path))?,
        )),
        None => Box::new(std::io::stdin()),
    };
    BufReader::new(reader)
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    let mut simd_buf = content.clone();
    if let Ok(parsed) = simd_json::to_owned_value(&mut simd_buf) {
        let json_str = simd_json::to_string(&parsed)?;
        return Ok(serde_json::from_str(&json_str)?);
    }

    serde_json::from_slice(&content).context("Failed to parse JSON input")
}

fn print_table<I: Iterator<Item = String>>(rows: &[Row], shared_columns: I, ports_column: &str) {
    // Shared columns in spec order, the permission column last
    let mut columns: Vec<String> = shared_columns.collect();
    columns.push(ports_column.to_string());

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    table.set_header(columns.clone());
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|name| row.get(name).map(|c| c.to_display()).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
}
