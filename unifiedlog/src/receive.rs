/*!
Decoding of osquery logger requests.

Each line of input is a single request. A request is a JSON object of strings
using the same keys osquery sends to a logger plugin:

- `{"string": "..."}` or `{"log": "..."}`: a query result.
- `{"snapshot": "..."}`: a snapshot.
- `{"status": "true", "log": "[...]"}`: a batch of status logs.
- `{"init": "..."}`: the logger is being initialized.
- `{"health": ""}`: a health check.

Any other line is treated as a raw query result, so the output of osquery's
filesystem logger can be piped in directly.
*/

use std::collections::HashMap;

use serde_json::value::RawValue;

use crate::Error;

/**
A request to a logger plugin.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    String(String),
    Snapshot(String),
    /**
    Status logs, one entry per line logged by osquery.
    */
    Status(Vec<String>),
    Init(String),
    Health,
}

/**
Decode a single line of input.

Blank lines produce no request.
*/
pub fn decode(line: &str) -> Result<Option<Request>, Error> {
    let line = line.trim_end_matches('\r');

    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut request: HashMap<String, String> = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(_) => return Ok(Some(Request::String(line.to_owned()))),
    };

    if let Some(log) = request.remove("log") {
        if request.get("status").map(|status| status == "true").unwrap_or(false) {
            return Ok(Some(Request::Status(status_entries(&log)?)));
        }

        return Ok(Some(Request::String(log)));
    }

    if let Some(log) = request.remove("string") {
        return Ok(Some(Request::String(log)));
    }

    if let Some(snapshot) = request.remove("snapshot") {
        return Ok(Some(Request::Snapshot(snapshot)));
    }

    if let Some(name) = request.remove("init") {
        return Ok(Some(Request::Init(name)));
    }

    if request.contains_key("health") {
        return Ok(Some(Request::Health));
    }

    Ok(Some(Request::String(line.to_owned())))
}

/**
Split a batch of status logs into its entries.

Each entry is kept exactly as osquery wrote it.
*/
fn status_entries(log: &str) -> Result<Vec<String>, Error> {
    let entries: Vec<Box<RawValue>> = serde_json::from_str(log)
        .map_err(Error::from)
        .map_err(|e| e.context(format!("could not parse status logs from: {:?}", log)))?;

    Ok(entries.iter().map(|entry| entry.get().to_owned()).collect())
}
