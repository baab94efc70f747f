use serde::Serialize;
use serde_json::Value;

/// Placeholder written for values whose `Serialize` impl fails.
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// A value that can be written as one field of a log record.
/// This is automatically implemented for all types that implement `Serialize`.
///
/// Text is written as-is (no surrounding quotes); everything else is written
/// in compact JSON form.
pub trait Loggable {
    /// Appends the textual form of `self` to `out`.
    fn render(&self, out: &mut String);
}

impl<T> Loggable for T
where
    T: Serialize + ?Sized,
{
    fn render(&self, out: &mut String) {
        match serde_json::to_value(self) {
            Ok(Value::String(s)) => out.push_str(&s),
            Ok(other) => out.push_str(&other.to_string()),
            Err(_) => out.push_str(UNSERIALIZABLE),
        }
    }
}

/// Renders a single value to a fresh string.
pub fn render_to_string<T: Loggable + ?Sized>(value: &T) -> String {
    let mut out = String::new();
    value.render(&mut out);
    out
}
