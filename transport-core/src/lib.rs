//! Core reconciliation and estimation logic for medical transport bookings.
//!
//! Everything in this crate is a pure function over data the caller already
//! holds in memory: vocabulary translation, pickup date/time reconciliation,
//! great-circle tariffs and the valuation fallback chain.

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

pub mod geo;
pub mod model;
pub mod status;
pub mod temporal;
pub mod valuation;

pub use geo::{distance_km, haversine_km, tariff_cost, Coordinate};
pub use model::{Approval, ApprovalDecision, Booking, Hospital, HospitalIndex, TimelineEntry};
pub use status::{
    external_to_internal_status, external_to_internal_urgency, internal_to_external_status,
    internal_to_external_urgency, ExternalStatus, ExternalUrgency, InternalStatus,
    InternalUrgency,
};
pub use temporal::{join, parse_instant, split, split_instant, Clock, FixedClock, PickupFields, SystemClock};
pub use valuation::{
    estimate_booking_value, portfolio_total, summarize_portfolio, value_booking,
    BookingValuation, PortfolioSummary, ValueSource,
};

/// Monetary amount in currency units.
pub type Amount = f64;

/// Tunable constants for tariffs and pickup reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransportConfig {
    /// Currency units charged per great-circle kilometre.
    pub tariff_per_km: f64,
    /// Radius of the spherical earth model.
    pub earth_radius_km: f64,
    /// Wall-clock time used when a pickup date arrives without a time.
    pub default_pickup_time: NaiveTime,
    /// Offset (minutes east of UTC) in which pickup date/time fields are written.
    pub utc_offset_minutes: i32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tariff_per_km: 1000.0,
            earth_radius_km: 6371.0,
            default_pickup_time: NaiveTime::MIN,
            utc_offset_minutes: 0,
        }
    }
}

impl TransportConfig {
    /// Offset used for split date/time fields. Out-of-range values fall back to UTC.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Errors raised at the ingestion boundary. The core functions never return them.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("input is missing required data")]
    MissingData,
    #[error("could not parse input: {0}")]
    Parse(String),
    #[error("other error: {0}")]
    Other(String),
}
