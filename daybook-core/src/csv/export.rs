//! CSV row generation.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::csv::{DATE_FORMAT, HEADER};
use crate::error::DaybookResult;
use crate::event::{Event, Visibility, display_time};

/// Write the header and one record per event.
///
/// Fields are quoted only when they contain a delimiter, a quote or a line
/// break; everything else is written as is, surrounding whitespace included.
pub fn write_csv<W: Write>(events: &[Event], writer: W) -> DaybookResult<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for event in events {
        writer.write_record(event_record(event))?;
    }

    writer.flush()?;
    Ok(())
}

/// The nine column values of one event, unquoted.
pub fn event_record(event: &Event) -> [String; 9] {
    [
        event.subject().to_string(),
        event.start_date().format(DATE_FORMAT).to_string(),
        event.start_time().map(display_time).unwrap_or_default(),
        event.end_date().format(DATE_FORMAT).to_string(),
        event.end_time().map(display_time).unwrap_or_default(),
        bool_field(event.is_all_day()),
        event.description().unwrap_or_default().to_string(),
        event.location().unwrap_or_default().to_string(),
        bool_field(event.visibility() == Visibility::Private),
    ]
}

fn bool_field(value: bool) -> String {
    String::from(if value { "True" } else { "False" })
}
