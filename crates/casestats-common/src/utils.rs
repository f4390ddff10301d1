//! Shared utility functions.

/// Turns a snake_case field name into a display label.
///
/// Underscores become spaces and the first letter of every word is
/// upper-cased; the rest of each word is left untouched.
#[must_use]
pub fn humanize_field_name(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                label.extend(c.to_uppercase());
            } else {
                label.push(c);
            }
            at_word_start = false;
        } else {
            label.push(c);
            at_word_start = true;
        }
    }
    label
}

/// Last two digits of a year, zero padded (`2024` -> `"24"`).
#[must_use]
pub fn short_year(year: i32) -> String {
    format!("{:02}", year.rem_euclid(100))
}
