use serde_json::Value;
use std::io;

/// Write the result as CSV to stdout, full precision.
///
/// Results carrying a schedule emit the schedule rows; the dual-convention
/// quote emits both schedules with a leading `convention` column; anything
/// else falls back to field,value pairs. Summary scalars for schedule
/// outputs are available through the json and minimal formats.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = value.get("result").unwrap_or(value);

    if let Some(Value::Array(rows)) = result.get("schedule") {
        write_rows(&mut wtr, rows);
    } else if let Some(conventions) = quote_schedules(result) {
        write_quote_rows(&mut wtr, &conventions);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&csv_value(result)]);
    }

    let _ = wtr.flush();
}

/// The two per-convention schedules of a quote result, if this is one.
fn quote_schedules(result: &Value) -> Option<[(&'static str, &Vec<Value>); 2]> {
    let equal_payment = result.get("equal_payment")?.get("schedule")?.as_array()?;
    let equal_principal = result.get("equal_principal")?.get("schedule")?.as_array()?;
    Some([
        ("equal_payment", equal_payment),
        ("equal_principal", equal_principal),
    ])
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn write_quote_rows(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    conventions: &[(&'static str, &Vec<Value>)],
) {
    let Some(Value::Object(first)) = conventions
        .first()
        .and_then(|(_, rows)| rows.first())
    else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut header_record = vec!["convention".to_string()];
    header_record.extend(headers.iter().cloned());
    let _ = wtr.write_record(&header_record);

    for (name, rows) in conventions {
        for row in *rows {
            if let Value::Object(map) = row {
                let mut record = vec![name.to_string()];
                record.extend(
                    headers
                        .iter()
                        .map(|h| map.get(h.as_str()).map(csv_value).unwrap_or_default()),
                );
                let _ = wtr.write_record(&record);
            }
        }
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(csv_value).collect();
            items.join("; ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
