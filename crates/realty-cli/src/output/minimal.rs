use serde_json::Value;

use super::plain_text;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_installment",
    "total_matched",
    "price_per_sqft",
    "price",
    "total_payable",
    "id",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Schedules nest the totals under `summary`
    let result_obj = result_obj.get("summary").unwrap_or(result_obj);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return plain_text(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, plain_text(val));
        }
    }

    plain_text(result_obj)
}
