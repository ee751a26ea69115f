//! CSV rendering for the bulk export, RFC4180-style: fields containing a
//! comma, quote, or newline are quoted, with inner quotes doubled.

use chrono::SecondsFormat;

use crate::model::tick::Tick;

pub const EXPORT_HEADER: &str = "employee,date,slot,timestamp,ip,userAgent";

pub fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Renders the full export: header line plus one row per tick, in the
/// order the rows were handed in.
pub fn render_export(ticks: &[Tick]) -> String {
    let mut lines = Vec::with_capacity(ticks.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for tick in ticks {
        let row = [
            csv_escape(&tick.employee),
            csv_escape(&tick.date),
            csv_escape(&tick.slot),
            csv_escape(&tick.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
            csv_escape(&tick.ip),
            csv_escape(&tick.user_agent),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}
