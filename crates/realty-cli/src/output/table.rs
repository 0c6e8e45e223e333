use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::plain_text;

/// Format output as tables: the `formatted` (or `result`) fields first, then
/// any `results` rows, then warnings and methodology.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };

    if let Some(Value::Object(formatted)) = envelope.get("formatted") {
        print_field_table(formatted);
    } else if let Some(Value::Object(result)) = envelope.get("result") {
        print_field_table(&scalar_fields(result));
    } else if !envelope.contains_key("results") {
        print_field_table(envelope);
    }

    if let Some(Value::Array(rows)) = envelope.get("results") {
        println!();
        print_array_table(rows);
    }

    print_footer(envelope);
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &plain_text(val)]);
    }
    println!("{}", Table::from(builder));
}

/// Drop nested arrays/objects (records, schedule rows) from a result object.
fn scalar_fields(result: &Map<String, Value>) -> Map<String, Value> {
    result
        .iter()
        .filter(|(_, v)| !v.is_array() && !v.is_object())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(no rows)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(plain_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", plain_text(item));
        }
    }
}

fn print_footer(envelope: &Map<String, Value>) {
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

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
