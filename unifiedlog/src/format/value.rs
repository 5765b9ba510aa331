use std::io;

use serde::Serialize;
use serde_json::{ser::Formatter, Number, Serializer, Value};

/**
Coerce a JSON value into the string a sink will display for it.

- Strings are used as-is.
- Numbers are rendered without a fractional part.
- Booleans are `true` or `false`.
- Anything else is written back out as compact JSON. Object keys are sorted,
`<`, `>` and `&` are escaped, and whole floats are written without a fraction.
*/
pub(super) fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number(n),
        Value::Bool(b) => b.to_string(),
        other => to_json(other).unwrap_or_default(),
    }
}

// NOTE: Non-integer numbers are rounded, so `1.75` is displayed as `2`.
// The fields we extract are timestamps and counters, which osquery writes as integers.
// Integers are displayed exactly, even beyond 2^53 where a float would lose digits,
// so `9007199254740993` is not displayed as `9007199254740992`.
fn number(n: &Number) -> String {
    if let Some(n) = n.as_i64() {
        n.to_string()
    } else if let Some(n) = n.as_u64() {
        n.to_string()
    } else {
        n.as_f64().map(|n| format!("{:.0}", n)).unwrap_or_default()
    }
}

fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    value.serialize(&mut Serializer::with_formatter(&mut buf, Escaped))?;

    // The serializer only writes valid UTF8
    Ok(String::from_utf8(buf).unwrap_or_default())
}

/**
Compact JSON that's safe to embed in HTML.
*/
struct Escaped;

impl Formatter for Escaped {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;

        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };

            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;

            start = i + c.len_utf8();
        }

        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let abs = value.abs();

        // Very large and very small values use an exponent, like `1e+21` or `1e-7`
        if abs != 0.0 && (abs < 1e-6 || abs >= 1e21) {
            let formatted = format!("{:e}", value);

            match formatted.find('e') {
                Some(e) if !formatted[e + 1..].starts_with('-') => {
                    write!(writer, "{}e+{}", &formatted[..e], &formatted[e + 1..])
                }
                _ => writer.write_all(formatted.as_bytes()),
            }
        } else {
            // `Display` never writes a trailing `.0`
            write!(writer, "{}", value)
        }
    }
}
