use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::display_cell;

/// Render the envelope as tables: scalar result fields first, a sub-table
/// per schedule array, commentary as plain text, then warnings and
/// methodology. Money is rounded to 2 dp for display.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(result) => {
            print_section(None, result);
            print_envelope_footer(envelope);
        }
        None => print_section(None, value),
    }
}

/// One result object: scalars as a Field/Value table, arrays of rows as
/// sub-tables, arrays of strings as indented lines, nested objects (the
/// per-convention quote) recursively with a heading.
fn print_section(title: Option<&str>, value: &Value) {
    if let Some(title) = title {
        println!("\n[{title}]");
    }
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut has_scalars = false;
    let mut row_tables: Vec<(&String, &Vec<Value>)> = Vec::new();
    let mut text_blocks: Vec<(&String, &Vec<Value>)> = Vec::new();
    let mut nested: Vec<(&String, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Object(_) => nested.push((key, val)),
            Value::Array(arr) if arr.first().map_or(false, Value::is_object) => {
                row_tables.push((key, arr));
            }
            Value::Array(arr) if !arr.is_empty() && arr.iter().all(Value::is_string) => {
                text_blocks.push((key, arr));
            }
            _ => {
                builder.push_record([key.as_str(), &display_cell(val)]);
                has_scalars = true;
            }
        }
    }

    if has_scalars {
        println!("{}", Table::from(builder));
    }
    for (key, rows) in row_tables {
        print_rows_table(key, rows);
    }
    for (key, lines) in text_blocks {
        println!("\n{key}:");
        for line in lines {
            if let Value::String(s) = line {
                println!("  {s}");
            }
        }
    }
    for (key, obj) in nested {
        print_section(Some(key), obj);
    }
}

fn print_rows_table(title: &str, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display_cell).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("\n{title} ({} rows)", rows.len());
    println!("{}", Table::from(builder));
}

fn print_envelope_footer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}
