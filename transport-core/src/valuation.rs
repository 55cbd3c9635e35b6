//! Booking valuation and portfolio totals.
//!
//! A booking's value comes from the first tier in [`VALUE_TIERS`] that yields
//! an amount; when none does the value is zero. Recorded costs are used as
//! recorded; only the route tariff is rounded. Nothing in this module fails.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{distance_km, tariff_cost, Amount, Booking, HospitalIndex, TransportConfig};

/// Which tier produced a booking's value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    RouteTariff,
    RecordedEstimate,
    RecordedActual,
    None,
}

type Tier = fn(&Booking, &HospitalIndex, &TransportConfig) -> Option<Amount>;

/// Ordered fallback chain. The terminal zero is applied by [`value_booking`].
pub const VALUE_TIERS: [(ValueSource, Tier); 3] = [
    (ValueSource::RouteTariff, route_tariff_value as Tier),
    (ValueSource::RecordedEstimate, recorded_estimate_value as Tier),
    (ValueSource::RecordedActual, recorded_actual_value as Tier),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingValuation {
    pub booking_id: String,
    pub source: ValueSource,
    pub amount: Amount,
}

/// Tariff over the great-circle route between origin and destination.
///
/// Needs both hospitals resolved and located, and only counts a positive amount.
pub fn route_tariff_value(
    booking: &Booking,
    hospitals: &HospitalIndex,
    config: &TransportConfig,
) -> Option<Amount> {
    let origin = hospitals.coordinate_of(booking.origin_hospital_id.as_deref()?)?;
    let destination = hospitals.coordinate_of(booking.destination_hospital_id.as_deref()?)?;
    let amount = tariff_cost(distance_km(origin, destination, config), config);
    (amount > 0.0).then_some(amount)
}

pub fn recorded_estimate_value(
    booking: &Booking,
    _hospitals: &HospitalIndex,
    _config: &TransportConfig,
) -> Option<Amount> {
    booking.estimated_cost.and_then(recorded_amount)
}

pub fn recorded_actual_value(
    booking: &Booking,
    _hospitals: &HospitalIndex,
    _config: &TransportConfig,
) -> Option<Amount> {
    booking.actual_cost.and_then(recorded_amount)
}

fn recorded_amount(cost: f64) -> Option<Amount> {
    cost.is_finite().then_some(cost)
}

/// Resolve a booking's value and report the tier that produced it.
pub fn value_booking(
    booking: &Booking,
    hospitals: &HospitalIndex,
    config: &TransportConfig,
) -> BookingValuation {
    let (source, amount) = VALUE_TIERS
        .iter()
        .find_map(|(source, tier)| tier(booking, hospitals, config).map(|amount| (*source, amount)))
        .unwrap_or((ValueSource::None, 0.0));

    tracing::debug!(booking = %booking.id, ?source, amount, "valued booking");

    BookingValuation {
        booking_id: booking.id.clone(),
        source,
        amount,
    }
}

pub fn estimate_booking_value(
    booking: &Booking,
    hospitals: &HospitalIndex,
    config: &TransportConfig,
) -> Amount {
    value_booking(booking, hospitals, config).amount
}

/// Sum of every booking's value. Order of `bookings` does not matter.
pub fn portfolio_total(
    bookings: &[Booking],
    hospitals: &HospitalIndex,
    config: &TransportConfig,
) -> Amount {
    sum_amounts(
        bookings
            .iter()
            .map(|booking| estimate_booking_value(booking, hospitals, config))
            .collect(),
    )
}

/// Adds amounts in ascending order so the float result does not depend on
/// input order. Overflow saturates at the largest finite amount.
fn sum_amounts(mut amounts: Vec<Amount>) -> Amount {
    amounts.sort_by(f64::total_cmp);
    amounts
        .into_iter()
        .fold(0.0, |total, amount| total + amount)
        .clamp(Amount::MIN, Amount::MAX)
}

/// Portfolio statistics for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub generated_at: DateTime<Utc>,
    pub booking_count: usize,
    pub active_count: usize,
    /// Rows dropped at ingestion because they could not be read at all.
    #[serde(default)]
    pub rejected_records: usize,
    pub total_value: Amount,
    pub valued_by: BTreeMap<ValueSource, usize>,
    pub valuations: Vec<BookingValuation>,
}

impl PortfolioSummary {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            booking_count: 0,
            active_count: 0,
            rejected_records: 0,
            total_value: 0.0,
            valued_by: BTreeMap::new(),
            valuations: Vec::new(),
        }
    }
}

pub fn summarize_portfolio(
    bookings: &[Booking],
    hospitals: &HospitalIndex,
    config: &TransportConfig,
    generated_at: DateTime<Utc>,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::empty(generated_at);

    for booking in bookings {
        let valuation = value_booking(booking, hospitals, config);
        *summary.valued_by.entry(valuation.source).or_insert(0) += 1;
        summary.valuations.push(valuation);
        if booking.status.is_active() {
            summary.active_count += 1;
        }
    }
    summary.booking_count = bookings.len();
    summary.total_value = sum_amounts(summary.valuations.iter().map(|v| v.amount).collect());

    summary
}
