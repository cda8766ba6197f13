//! prism-rows: project nested JSON API responses into a table
//!
//! Usage:
//!   # Describe-instances response from a file
//!   prism-rows instances.json --root 'Reservations.[].Instances.[0]'
//!
//!   # Pick fields explicitly, read from stdin
//!   aws ec2 describe-instances | prism-rows --root 'Reservations.[].Instances.[0]' \
//!       --fields 'id:InstanceId state:State.Name security[,]:SecurityGroups.[].GroupId'
//!
//!   # NDJSON stream, one record per line, rows out as JSON lines
//!   prism-rows --ndjson events.jsonl --fields 'id type:detail.type' --json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::Table;
use prism::extract::{resolve, Row, RowExtractor};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};

/// Field list of the original instance listing, used when --fields is omitted
const DEFAULT_FIELDS: &str = "id:InstanceId \
    type:InstanceType \
    ip:PublicIpAddress? \
    ami:ImageId \
    az:Placement.AvailabilityZone \
    key:KeyName \
    state:State.Name \
    security[,]:SecurityGroups.[].GroupId";

#[derive(Parser, Debug)]
#[command(name = "prism-rows")]
#[command(about = "Project nested JSON into flat display rows", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one record per line)
    #[arg(long)]
    ndjson: bool,

    /// Path from each document down to the record sequence,
    /// e.g. 'Reservations.[].Instances.[0]'
    #[arg(long, short = 'r')]
    root: Option<String>,

    /// Whitespace-separated field specifications
    /// (<name>[/<maxlen>][<join>]:<path>, bare token = name and path)
    #[arg(long, short = 'f')]
    fields: Option<String>,

    /// Emit one JSON object per row instead of a table
    #[arg(long)]
    json: bool,

    /// Skip records that fail to resolve instead of aborting
    #[arg(long)]
    skip_bad_records: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let fields = args.fields.as_deref().unwrap_or(DEFAULT_FIELDS);
    let specs: Vec<&str> = fields.split_whitespace().collect();
    let extractor = RowExtractor::new(&specs).context("Failed to parse field specifications")?;

    let documents = read_documents(args.input.as_deref(), args.ndjson)?;
    let records = collect_records(documents, args.root.as_deref())?;

    let mut rows = Vec::new();
    for record in &records {
        match extractor.extract(record) {
            Ok(row) => rows.push(row),
            Err(err) if args.skip_bad_records => {
                eprintln!("⚠ Skipping record: {}", err);
            }
            Err(err) => return Err(err).context("Failed to extract record"),
        }
    }

    if args.json {
        print_json(&rows)?;
    } else {
        print_table(&rows);
    }

    Ok(())
}

/// Read input as whole-buffer JSON via simd-json when possible, falling back
/// to line-by-line serde_json for NDJSON or when --ndjson is forced.
fn read_documents(input: Option<&str>, ndjson: bool) -> Result<Vec<Value>> {
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

    if !ndjson {
        // Try SIMD parsing first (faster), converting into serde_json values.
        // simd-json mutates its buffer, so it gets its own copy.
        let mut simd_buf = content.clone();
        if let Ok(parsed) = simd_json::to_owned_value(&mut simd_buf) {
            let json_str = simd_json::to_string(&parsed)?;
            let value: Value = serde_json::from_str(&json_str)?;
            return Ok(vec![value]);
        }
    }

    // NDJSON (or malformed-as-single-document) fallback
    let content_str = String::from_utf8_lossy(&content);
    let mut documents = Vec::new();
    for line in content_str.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(line).context("Failed to parse JSON line")?;
        documents.push(value);
    }
    Ok(documents)
}

/// Flatten documents into records: descend --root in each document, then
/// spread top-level arrays into individual records.
fn collect_records(documents: Vec<Value>, root: Option<&str>) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for document in documents {
        let value = match root {
            Some(path) => resolve(&document, path)
                .with_context(|| format!("Failed to resolve --root {:?}", path))?
                .into_value(),
            None => document,
        };
        match value {
            Value::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    Ok(records)
}

fn print_json(rows: &[Row]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}

fn print_table(rows: &[Row]) {
    // Column order: first appearance across all rows
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

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
