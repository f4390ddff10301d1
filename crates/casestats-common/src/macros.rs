//! Convenience macro for early returns with `StatsError`

/// Returns a `StatsError::Validation` naming the offending field unless the
/// condition holds
///
/// # Examples
///
/// ```rust
/// use casestats_common::{ensure_field, Result};
///
/// fn check_years(years: &[i32]) -> Result<()> {
///     ensure_field!(!years.is_empty(), "years", "at least one year is required");
///     Ok(())
/// }
///
/// let err = check_years(&[]).unwrap_err();
/// assert_eq!(err.field(), Some("years"));
/// ```
#[macro_export]
macro_rules! ensure_field {
    ($cond:expr, $field:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::StatsError::validation_field($msg, $field));
        }
    };
    ($cond:expr, $field:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::StatsError::validation_field(format!($fmt, $($arg)*), $field));
        }
    };
}
