/*!
Formatting of osquery log lines into structured records.

A sink accepts a message plus at most `MAX_PAIRS` key/value annotations. Query
results from osquery are JSON objects with a well-known shape, so when a line
parses as an object we pick its interesting fields out as annotations. Anything
else is passed through as a flat message.

Formatting never fails. The raw line is always a valid fallback.
*/

mod str;
mod value;

use std::collections::HashMap;

use serde_json::Value;

use self::str::Str;

use crate::sink::Severity;

metrics! {
    structured,
    fallback
}

/**
The fields extracted from a log line, in priority order.

If a line carries more eligible fields than a record can hold then
earlier fields win, regardless of their order in the line.
*/
pub const FIELDS: [&str; 8] = [
    "name",
    "hostIdentifier",
    "calendarTime",
    "unixTime",
    "action",
    "columns",
    "decorations",
    "epoch",
];

/**
The maximum number of pairs in a record.
*/
pub const MAX_PAIRS: usize = 8;

/**
The message of a record that carries pairs.

The raw line isn't repeated in a structured record. Callers that want it
need to emit it separately.
*/
pub const BASE_MESSAGE: &str = "osquery";

/**
A field extracted from a log line.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /**
    One of `FIELDS`.
    */
    pub key: &'static str,
    /**
    The field's value, coerced to a string. Never empty.
    */
    pub value: String,
}

/**
A formatted log line, ready to hand to a sink.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub severity: Severity,
    pub message: &'a str,
    pub pairs: Vec<Pair>,
}

impl<'a> Record<'a> {
    fn fallback(raw: &'a str, severity: Severity) -> Self {
        Record {
            severity,
            message: raw,
            pairs: Vec::new(),
        }
    }

    /**
    Whether the record carries any pairs.

    A record without pairs is just the raw line.
    */
    pub fn is_structured(&self) -> bool {
        !self.pairs.is_empty()
    }
}

/**
Format a raw log line.

If the line is a JSON object with at least one of the `FIELDS` then the record
carries those fields as pairs with `BASE_MESSAGE` as its message. Otherwise the
record is the raw line with no pairs.
*/
pub fn format(raw: &str, severity: Severity) -> Record<'_> {
    let fields: HashMap<Str, Value> = match serde_json::from_str(raw) {
        Ok(fields) => fields,
        // Not an object, or not JSON at all
        Err(_) => {
            increment!(format.fallback);
            return Record::fallback(raw, severity);
        }
    };

    let pairs = extract(&fields);

    if pairs.is_empty() {
        increment!(format.fallback);
        return Record::fallback(raw, severity);
    }

    increment!(format.structured);

    Record {
        severity,
        message: BASE_MESSAGE,
        pairs,
    }
}

fn extract(fields: &HashMap<Str, Value>) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(MAX_PAIRS);

    for &key in FIELDS.iter() {
        let value = match fields.get(&Str::Borrowed(key)) {
            Some(value) => value::coerce(value),
            None => continue,
        };

        // An empty value is treated like a missing one
        if value.is_empty() {
            continue;
        }

        pairs.push(Pair { key, value });

        if pairs.len() == MAX_PAIRS {
            break;
        }
    }

    pairs
}
