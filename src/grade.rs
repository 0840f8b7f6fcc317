use serde_json::Value;

pub const EXCELLENT: &str = "Excellent 🎯";
pub const GOOD: &str = "Good 👍";
pub const AVERAGE: &str = "Average 🟡";
pub const BELOW_AVERAGE: &str = "Below Average ⚠️";
pub const NEEDS_ATTENTION: &str = "Needs Attention ❗";

/// Reads an integer the lenient way the service's clients always have:
/// numbers are truncated, strings contribute their leading integer.
fn grade_class(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, s.strip_prefix('+').unwrap_or(s)),
            };
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}

pub fn grade_label(value: &Value) -> &'static str {
    match grade_class(value) {
        Some(1) => EXCELLENT,
        Some(2) => GOOD,
        Some(3) => AVERAGE,
        Some(4) => BELOW_AVERAGE,
        _ => NEEDS_ATTENTION,
    }
}
