//! Pure formatting helpers exposed to templates.

use chrono::Datelike;
use minijinja::value::Value as TemplateValue;
use minijinja::Environment;

/// Everything after the last `-`; the input unchanged when there is none.
/// Turns a Scopus EID like `10-s2.0-0042` into its numeric tail.
pub fn remove_id_prefix(value: &str) -> String {
    match value.rsplit_once('-') {
        Some((_, tail)) => tail.to_string(),
        None => value.to_string(),
    }
}

/// Splits a camelCase identifier on uppercase boundaries and capitalizes
/// the first letter: `ScholarlyOutput` → `Scholarly Output`.
pub fn camel_case_to_spaced(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for (i, ch) in value.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
            continue;
        }
        if ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Loose equality over string representations, so `5` equals `"5"`.
pub fn if_equals(a: &str, b: &str) -> bool {
    a == b
}

/// Current calendar year minus `offset`.
pub fn current_year(offset: i32) -> i32 {
    chrono::Utc::now().year() - offset
}

/// Thousands-grouped number rendering: `1234567` → `1,234,567`. Fractions
/// are rounded to two decimals; integral values render without any.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let negative = value < 0.0;
    let abs = value.abs();

    let formatted = format!("{abs:.2}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (formatted, String::new()),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !frac_part.is_empty() && frac_part != "00" {
        out.push('.');
        out.push_str(&frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Register every helper on a template environment.
pub(crate) fn register(env: &mut Environment<'static>) {
    env.add_filter("remove_id_prefix", |value: String| remove_id_prefix(&value));
    env.add_filter("camel_case_to_spaced", |value: String| {
        camel_case_to_spaced(&value)
    });
    env.add_filter("format_number", format_number);
    env.add_function("if_equals", |a: TemplateValue, b: TemplateValue| {
        if_equals(&a.to_string(), &b.to_string())
    });
    env.add_function("current_year", current_year);
}
