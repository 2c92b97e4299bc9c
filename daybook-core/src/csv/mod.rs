//! CSV export and import of a calendar's events.
//!
//! One header record followed by one record per event. Fields holding a
//! comma, a quote or a line break are quoted, so a record may span lines:
//! `Subject,Start Date,Start Time,End Date,End Time,All Day Event,Description,Location,Private`.

mod export;
mod import;

use std::io::{Read, Write};

use csv::ReaderBuilder;

use crate::calendar::Calendar;
use crate::error::DaybookResult;

pub use export::{event_record, write_csv};
pub use import::{ImportSummary, parse_record, parse_row};

pub const HEADER: [&str; 9] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Description",
    "Location",
    "Private",
];

const DATE_FORMAT: &str = "%m/%d/%Y";

impl Calendar {
    /// Write every event, in store order.
    pub fn export_csv<W: Write>(&self, writer: W) -> DaybookResult<()> {
        write_csv(&self.events(), writer)
    }

    /// Append every well-formed record to the store without duplicate or
    /// conflict checks, notifying listeners of each addition. Malformed
    /// records are logged and skipped. The first record is the header.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> DaybookResult<ImportSummary> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let mut summary = ImportSummary::default();

        for (index, result) in reader.records().enumerate() {
            let line_number = index + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(calendar = %self.title(), "Skipping record {line_number}: {e}");
                    summary.skipped += 1;
                    continue;
                }
            };
            let line_number = record
                .position()
                .map_or(line_number, |p| p.line() as usize);

            // Whitespace-only line
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }

            match parse_record(&record, line_number, self.default_visibility()) {
                Ok(event) => {
                    self.append_unchecked(event);
                    summary.imported += 1;
                }
                Err(e) => {
                    tracing::warn!(calendar = %self.title(), "Skipping row: {e}");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}
