use serde_json::Value;

/// Print just the headline number from the output.
///
/// The dual quote answers with the equal-payment monthly payment; other
/// results try well-known fields in priority order, then fall back to the
/// first field of the result object. Values print at full precision for
/// scripting.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Dual-convention quote: the level payment is the headline.
    if let Some(payment) = result
        .get("equal_payment")
        .and_then(|ep| ep.get("monthly_payment"))
    {
        println!("{}", format_minimal(payment));
        return;
    }

    let priority_keys = [
        "interest_saved",
        "payment_to_income_pct",
        "monthly_payment",
        "total_interest",
    ];

    if let Value::Object(map) = result {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
