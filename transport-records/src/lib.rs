//! Upstream booking/hospital rows and their translation to and from the
//! internal model, plus JSON entry points for portfolio summaries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use transport_core::{
    external_to_internal_status, external_to_internal_urgency, internal_to_external_status,
    internal_to_external_urgency, join, parse_instant, split_instant, summarize_portfolio, Booking,
    Clock, Coordinate, ExternalStatus, ExternalUrgency, Hospital, HospitalIndex, PortfolioSummary,
    TransportConfig, TransportError,
};

/// Booking row as stored upstream. Field names are the upstream contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalBooking {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub origin_hospital_id: Option<String>,
    #[serde(default)]
    pub destination_hospital_id: Option<String>,
    pub status: ExternalStatus,
    pub urgency: ExternalUrgency,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub equipment_needed: Vec<String>,
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Kept raw: upstream sends numbers, numeric strings, or junk.
    #[serde(default)]
    pub estimated_cost: Option<Value>,
    #[serde(default)]
    pub actual_cost: Option<Value>,
}

/// Hospital row as stored upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalHospital {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// Rows read from a payload and how many had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub records: Vec<T>,
    pub rejected: usize,
}

/// Translates booking rows between the upstream and internal shapes.
pub struct RecordTranslator<'a, C: Clock + ?Sized> {
    config: &'a TransportConfig,
    clock: &'a C,
    requester_names: HashMap<String, String>,
}

impl<'a, C: Clock + ?Sized> RecordTranslator<'a, C> {
    pub fn new(config: &'a TransportConfig, clock: &'a C) -> Self {
        Self {
            config,
            clock,
            requester_names: HashMap::new(),
        }
    }

    /// Display names keyed by creator id. Unknown creators keep their id as name.
    pub fn with_requester_names(mut self, names: HashMap<String, String>) -> Self {
        self.requester_names = names;
        self
    }

    pub fn to_internal(&self, record: &ExternalBooking) -> Booking {
        let pickup_at = join(
            record.preferred_date.as_deref(),
            record.preferred_time.as_deref(),
            self.clock,
            self.config,
        );

        let requested_at = created_at(record, self.config).unwrap_or_else(|| {
            tracing::warn!(booking = %record.id, "missing or unreadable created_at, using current instant");
            self.clock.now()
        });

        let requester_name = self
            .requester_names
            .get(&record.created_by)
            .cloned()
            .unwrap_or_else(|| record.created_by.clone());

        Booking {
            id: record.id.clone(),
            patient_id: record.patient_id.clone(),
            origin_hospital_id: non_blank(record.origin_hospital_id.as_deref()),
            destination_hospital_id: non_blank(record.destination_hospital_id.as_deref()),
            status: external_to_internal_status(&record.status),
            urgency: external_to_internal_urgency(&record.urgency),
            pickup_at,
            equipment: record.equipment_needed.clone(),
            requester_id: record.created_by.clone(),
            requester_name,
            requested_at,
            estimated_cost: recorded_cost(&record.id, "estimated_cost", record.estimated_cost.as_ref()),
            actual_cost: recorded_cost(&record.id, "actual_cost", record.actual_cost.as_ref()),
            approvals: Vec::new(),
            timeline: Vec::new(),
        }
    }

    /// Build the upstream row for a booking. Approvals and timeline are not
    /// part of the row and are dropped.
    pub fn to_external(&self, booking: &Booking) -> ExternalBooking {
        let pickup = split_instant(booking.pickup_at, self.config);
        ExternalBooking {
            id: booking.id.clone(),
            patient_id: booking.patient_id.clone(),
            origin_hospital_id: booking.origin_hospital_id.clone(),
            destination_hospital_id: booking.destination_hospital_id.clone(),
            status: internal_to_external_status(&booking.status),
            urgency: internal_to_external_urgency(&booking.urgency),
            preferred_date: pickup.date,
            preferred_time: pickup.time,
            equipment_needed: booking.equipment.clone(),
            created_by: booking.requester_id.clone(),
            created_at: Some(booking.requested_at.to_rfc3339()),
            estimated_cost: booking.estimated_cost.map(Value::from),
            actual_cost: booking.actual_cost.map(Value::from),
        }
    }

    pub fn to_internal_all(&self, records: &[ExternalBooking]) -> Vec<Booking> {
        records.iter().map(|record| self.to_internal(record)).collect()
    }
}

/// Convert a hospital row. A coordinate exists only when both parts are numeric.
pub fn hospital_from_external(record: &ExternalHospital) -> Hospital {
    let latitude = record.latitude.as_ref().and_then(lenient_number);
    let longitude = record.longitude.as_ref().and_then(lenient_number);

    Hospital {
        id: record.id.clone(),
        name: record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| record.id.clone()),
        coordinate: match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        },
    }
}

pub fn hospital_index(records: &[ExternalHospital]) -> HospitalIndex {
    records.iter().map(hospital_from_external).collect()
}

/// Instant a record was created upstream, for callers that only need that.
pub fn created_at(record: &ExternalBooking, config: &TransportConfig) -> Option<DateTime<Utc>> {
    record
        .created_at
        .as_deref()
        .and_then(|text| parse_instant(text, config))
}

/// Read booking rows from a JSON array. Rows that do not fit the row shape
/// are skipped and counted.
pub fn parse_bookings_value(value: &Value) -> Result<Batch<ExternalBooking>, TransportError> {
    parse_rows(value, "booking")
}

pub fn parse_hospitals_value(value: &Value) -> Result<Batch<ExternalHospital>, TransportError> {
    parse_rows(value, "hospital")
}

/// Translate a JSON array of booking rows into internal bookings.
pub fn translate_bookings_value<C: Clock + ?Sized>(
    bookings: &Value,
    config: &TransportConfig,
    clock: &C,
) -> Result<Vec<Booking>, TransportError> {
    let batch = parse_bookings_value(bookings)?;
    Ok(RecordTranslator::new(config, clock).to_internal_all(&batch.records))
}

/// Summarize a portfolio from JSON strings holding booking and hospital arrays.
pub fn summarize_portfolio_str<C: Clock + ?Sized>(
    bookings_json: &str,
    hospitals_json: &str,
    config: &TransportConfig,
    clock: &C,
) -> Result<PortfolioSummary, TransportError> {
    let bookings: Value =
        serde_json::from_str(bookings_json).map_err(|err| TransportError::Parse(err.to_string()))?;
    let hospitals: Value = serde_json::from_str(hospitals_json)
        .map_err(|err| TransportError::Parse(err.to_string()))?;
    summarize_portfolio_value(&bookings, &hospitals, config, clock)
}

/// Summarize a portfolio from `serde_json::Value` arrays.
pub fn summarize_portfolio_value<C: Clock + ?Sized>(
    bookings: &Value,
    hospitals: &Value,
    config: &TransportConfig,
    clock: &C,
) -> Result<PortfolioSummary, TransportError> {
    let booking_rows = parse_bookings_value(bookings)?;
    let hospital_rows = parse_hospitals_value(hospitals)?;

    let translated = RecordTranslator::new(config, clock).to_internal_all(&booking_rows.records);
    let index = hospital_index(&hospital_rows.records);

    let mut summary = summarize_portfolio(&translated, &index, config, clock.now());
    summary.rejected_records = booking_rows.rejected + hospital_rows.rejected;
    Ok(summary)
}

fn parse_rows<T: for<'de> Deserialize<'de>>(
    value: &Value,
    kind: &str,
) -> Result<Batch<T>, TransportError> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Null => return Err(TransportError::MissingData),
        other => {
            return Err(TransportError::Parse(format!(
                "expected an array of {kind} rows, received {}",
                json_kind(other)
            )))
        }
    };

    let mut batch = Batch {
        records: Vec::with_capacity(rows.len()),
        rejected: 0,
    };

    for (index, row) in rows.iter().enumerate() {
        match T::deserialize(row) {
            Ok(record) => batch.records.push(record),
            Err(err) => {
                tracing::warn!(kind, index, %err, "skipping unreadable row");
                batch.rejected += 1;
            }
        }
    }

    Ok(batch)
}

/// Recorded cost as a number. Numeric strings count; anything else is absent.
fn recorded_cost(booking_id: &str, field: &str, value: Option<&Value>) -> Option<f64> {
    let value = value?;
    let number = lenient_number(value);
    if number.is_none() && !value.is_null() {
        tracing::warn!(booking = booking_id, field, "non-numeric recorded cost treated as absent");
    }
    number
}

fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
