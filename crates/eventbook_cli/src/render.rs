//! Output shapes for the shell: events rendered in a display zone.

use anyhow::Result;
use eventbook_core::timezone::{format_log_timestamp, to_local, to_local_parts};
use eventbook_core::{EventRecord, Profile, ZoneId};
use serde_json::json;

/// Event as shown to a user in `zone`.
pub struct EventView<'a> {
    record: &'a EventRecord,
    zone: ZoneId,
}

impl<'a> EventView<'a> {
    pub fn new(record: &'a EventRecord, zone: ZoneId) -> Self {
        Self { record, zone }
    }

    fn to_json(&self) -> serde_json::Value {
        let record = self.record;
        let (start_date, start_time) = to_local_parts(record.start, record.timezone);
        let (end_date, end_time) = to_local_parts(record.end, record.timezone);
        json!({
            "id": record.id,
            "profiles": record.profiles.iter().map(profile_json).collect::<Vec<_>>(),
            "timezone": record.timezone,
            "start": record.start,
            "end": record.end,
            "display": {
                "zone": self.zone,
                "start": to_local(record.start, self.zone),
                "end": to_local(record.end, self.zone),
                "created": to_local(record.created_at, self.zone),
                "updated": to_local(record.updated_at, self.zone),
            },
            "edit": {
                "start_date": start_date,
                "start_time": start_time,
                "end_date": end_date,
                "end_time": end_time,
            },
            "logs": record.logs,
            "version": record.version,
        })
    }
}

impl serde::Serialize for EventView<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn profile_json(profile: &Profile) -> serde_json::Value {
    json!({ "id": profile.id, "name": profile.name })
}

/// One line per audit entry, oldest first.
pub fn log_lines(record: &EventRecord, zone: ZoneId) -> Vec<String> {
    record
        .logs
        .iter()
        .map(|entry| {
            format!(
                "{} - {}",
                format_log_timestamp(entry.timestamp, zone),
                entry.message
            )
        })
        .collect()
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
