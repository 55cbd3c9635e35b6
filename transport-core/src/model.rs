//! Internal booking and hospital records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Coordinate, InternalStatus, InternalUrgency};

/// A transport booking in the application's own vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub patient_id: String,
    pub origin_hospital_id: Option<String>,
    pub destination_hospital_id: Option<String>,
    pub status: InternalStatus,
    pub urgency: InternalUrgency,
    pub pickup_at: DateTime<Utc>,
    pub equipment: Vec<String>,
    pub requester_id: String,
    pub requester_name: String,
    pub requested_at: DateTime<Utc>,
    /// Recorded cost fields, already reduced to numbers. Non-numeric values are `None`.
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    /// Filled in by the approval workflow, never by translation.
    #[serde(default)]
    pub approvals: Vec<Approval>,
    /// Append-only status history, also owned by the workflow.
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Approval {
    pub approver: String,
    pub role: Option<String>,
    pub decision: ApprovalDecision,
    pub decided_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub status: InternalStatus,
    pub occurred_at: DateTime<Utc>,
    pub actor: Option<String>,
    pub note: Option<String>,
}

/// A hospital that bookings may reference as origin or destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

/// Read-only lookup of hospitals by id.
#[derive(Debug, Clone, Default)]
pub struct HospitalIndex {
    by_id: HashMap<String, Hospital>,
}

impl HospitalIndex {
    pub fn new(hospitals: impl IntoIterator<Item = Hospital>) -> Self {
        hospitals.into_iter().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Hospital> {
        self.by_id.get(id)
    }

    /// Coordinate of a hospital, if it is known and located.
    pub fn coordinate_of(&self, id: &str) -> Option<Coordinate> {
        self.get(id).and_then(|hospital| hospital.coordinate)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Hospital> for HospitalIndex {
    fn from_iter<I: IntoIterator<Item = Hospital>>(iter: I) -> Self {
        Self {
            by_id: iter
                .into_iter()
                .map(|hospital| (hospital.id.clone(), hospital))
                .collect(),
        }
    }
}
