//! Rolling CPU usage history per named source.

use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;

/// Message kind carrying a CPU usage sample.
pub const USAGE_CPU: &str = "usage.cpu";

/// Samples kept per source.
pub const WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageSample {
    pub value: f64,
}

/// Source name → last [`WINDOW`] samples, oldest first. Iterates in
/// lexicographic order of source name.
#[derive(Debug, Clone, Default)]
pub struct UsageHistory {
    sources: BTreeMap<String, VecDeque<UsageSample>>,
}

impl UsageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, dropping the oldest once the window is full.
    pub fn push(&mut self, name: &str, sample: UsageSample) {
        let window = self.sources.entry(name.to_string()).or_default();
        window.push_back(sample);
        while window.len() > WINDOW {
            window.pop_front();
        }
    }

    /// Apply one inbound message. Returns true when state changed.
    ///
    /// Only [`USAGE_CPU`] is acted on; payloads without a string `name` are
    /// dropped. `value` may be a JSON string or number.
    pub fn on_message(&mut self, kind: &str, data: &Value) -> bool {
        if kind != USAGE_CPU {
            return false;
        }
        let Some(name) = data.get("name").and_then(Value::as_str) else {
            return false;
        };
        let value = match data.get("value") {
            Some(Value::String(s)) => parse_float(s),
            Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            _ => f64::NAN,
        };
        self.push(name, UsageSample { value });
        true
    }

    pub fn get(&self, name: &str) -> Option<&VecDeque<UsageSample>> {
        self.sources.get(name)
    }

    /// Sources that have at least one sample, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VecDeque<UsageSample>)> {
        self.sources
            .iter()
            .filter(|(_, w)| !w.is_empty())
            .map(|(name, w)| (name.as_str(), w))
    }

    pub fn latest(&self, name: &str) -> Option<f64> {
        self.sources.get(name)?.back().map(|s| s.value)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lenient float parse: leading whitespace is skipped and the longest
/// numeric prefix wins (`"12.5%"` → 12.5). No numeric prefix gives `NaN`.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Percentage label for the latest sample, rounded to an integer.
pub fn percent_label(value: f64) -> String {
    if value.is_nan() {
        return "NaN%".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity%" } else { "-Infinity%" }.to_string();
    }
    let rounded = value.round();
    // Avoid "-0%".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}%")
}
