//! CSV export of the passenger request log.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::request::PassengerRequest;

/// Schema v1 column header for the request log.
const HEADER: &str = "id,source,destination,priority,status,cabin,\
                      created_ms,assigned_ms,pickup_ms,dropoff_ms,wait_ms,ride_ms";

/// Exports the request log to a CSV file at the given path.
///
/// Writes a header row followed by one row per request using the schema v1
/// column layout. Missing timestamps and cabins are written as empty
/// fields. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `requests` - Request log, typically ordered by id
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(requests: &[PassengerRequest], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(requests, buf)
}

/// Writes the request log as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(requests: &[PassengerRequest], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in requests {
        wtr.write_record(&[
            r.id.to_string(),
            r.source.to_string(),
            r.destination.to_string(),
            r.priority.to_string(),
            r.status.to_string(),
            optional(r.cabin),
            r.created_at.to_string(),
            optional(r.assigned_at),
            optional(r.pickup_at),
            optional(r.dropoff_at),
            optional(r.wait_ms()),
            optional(r.ride_ms()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
