//! Booking status and urgency vocabularies and the fixed tables between them.
//!
//! The external vocabulary is what the upstream booking store persists; the
//! internal vocabulary is what the application works with. Codes outside the
//! tables are carried through literally in an `Other` variant so ingestion
//! never fails on a vocabulary mismatch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Booking status as persisted upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExternalStatus {
    Pending,
    Approved,
    Scheduled,
    EnRoute,
    Completed,
    Cancelled,
    Other(String),
}

/// Booking status used inside the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InternalStatus {
    Requested,
    ClinicalReview,
    DispatchReview,
    AirlineConfirmed,
    CrewAssigned,
    InTransit,
    Completed,
    Cancelled,
    Other(String),
}

/// Clinical priority as persisted upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExternalUrgency {
    Stable,
    Urgent,
    Critical,
    Other(String),
}

/// Clinical priority used inside the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InternalUrgency {
    Routine,
    Urgent,
    Emergency,
    Other(String),
}

/// External ↔ internal status pairs in lifecycle order.
static STATUS_TABLE: [(ExternalStatus, InternalStatus); 6] = [
    (ExternalStatus::Pending, InternalStatus::Requested),
    (ExternalStatus::Approved, InternalStatus::ClinicalReview),
    (ExternalStatus::Scheduled, InternalStatus::DispatchReview),
    (ExternalStatus::EnRoute, InternalStatus::InTransit),
    (ExternalStatus::Completed, InternalStatus::Completed),
    (ExternalStatus::Cancelled, InternalStatus::Cancelled),
];

/// Internal states the upstream store cannot represent, and where they land.
/// Both sit between dispatch review and departure, so they persist as `scheduled`.
static COLLAPSED_STATUSES: [(InternalStatus, ExternalStatus); 2] = [
    (InternalStatus::AirlineConfirmed, ExternalStatus::Scheduled),
    (InternalStatus::CrewAssigned, ExternalStatus::Scheduled),
];

static URGENCY_TABLE: [(InternalUrgency, ExternalUrgency); 3] = [
    (InternalUrgency::Routine, ExternalUrgency::Stable),
    (InternalUrgency::Urgent, ExternalUrgency::Urgent),
    (InternalUrgency::Emergency, ExternalUrgency::Critical),
];

/// Translate an upstream status. Unknown codes pass through as
/// [`InternalStatus::Other`], even when the literal spells an internal code,
/// so `is_known()` is true only for translated values.
pub fn external_to_internal_status(code: &ExternalStatus) -> InternalStatus {
    if let Some((_, internal)) = STATUS_TABLE.iter().find(|(external, _)| external == code) {
        return internal.clone();
    }
    tracing::warn!(code = code.as_str(), "external status not in vocabulary, passing through");
    InternalStatus::Other(code.as_str().to_string())
}

/// Translate an internal status for persistence.
///
/// `airline_confirmed` and `crew_assigned` have no upstream counterpart and
/// both become `scheduled`. Unknown codes pass through unchanged.
pub fn internal_to_external_status(code: &InternalStatus) -> ExternalStatus {
    let mapped = STATUS_TABLE
        .iter()
        .find(|(_, internal)| internal == code)
        .map(|(external, _)| external)
        .or_else(|| {
            COLLAPSED_STATUSES
                .iter()
                .find(|(internal, _)| internal == code)
                .map(|(_, external)| external)
        });

    match mapped {
        Some(external) => external.clone(),
        None => {
            tracing::warn!(code = code.as_str(), "internal status not in vocabulary, passing through");
            ExternalStatus::Other(code.as_str().to_string())
        }
    }
}

/// Translate an internal urgency for persistence.
pub fn internal_to_external_urgency(code: &InternalUrgency) -> ExternalUrgency {
    if let Some((_, external)) = URGENCY_TABLE.iter().find(|(internal, _)| internal == code) {
        return external.clone();
    }
    tracing::warn!(code = code.as_str(), "internal urgency not in vocabulary, passing through");
    ExternalUrgency::Other(code.as_str().to_string())
}

/// Translate an upstream urgency.
pub fn external_to_internal_urgency(code: &ExternalUrgency) -> InternalUrgency {
    if let Some((internal, _)) = URGENCY_TABLE.iter().find(|(_, external)| external == code) {
        return internal.clone();
    }
    tracing::warn!(code = code.as_str(), "external urgency not in vocabulary, passing through");
    InternalUrgency::Other(code.as_str().to_string())
}

impl ExternalStatus {
    pub const KNOWN: [ExternalStatus; 6] = [
        Self::Pending,
        Self::Approved,
        Self::Scheduled,
        Self::EnRoute,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "scheduled" => Self::Scheduled,
            "en_route" => Self::EnRoute,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Scheduled => "scheduled",
            Self::EnRoute => "en_route",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Position in the forward lifecycle. `cancelled` and unknown codes have none.
    pub fn lifecycle_rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Approved => Some(1),
            Self::Scheduled => Some(2),
            Self::EnRoute => Some(3),
            Self::Completed => Some(4),
            Self::Cancelled | Self::Other(_) => None,
        }
    }
}

impl InternalStatus {
    pub const KNOWN: [InternalStatus; 8] = [
        Self::Requested,
        Self::ClinicalReview,
        Self::DispatchReview,
        Self::AirlineConfirmed,
        Self::CrewAssigned,
        Self::InTransit,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "requested" => Self::Requested,
            "clinical_review" => Self::ClinicalReview,
            "dispatch_review" => Self::DispatchReview,
            "airline_confirmed" => Self::AirlineConfirmed,
            "crew_assigned" => Self::CrewAssigned,
            "in_transit" => Self::InTransit,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "requested",
            Self::ClinicalReview => "clinical_review",
            Self::DispatchReview => "dispatch_review",
            Self::AirlineConfirmed => "airline_confirmed",
            Self::CrewAssigned => "crew_assigned",
            Self::InTransit => "in_transit",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Position in the forward lifecycle. `cancelled` and unknown codes have none.
    pub fn lifecycle_rank(&self) -> Option<u8> {
        match self {
            Self::Requested => Some(0),
            Self::ClinicalReview => Some(1),
            Self::DispatchReview => Some(2),
            Self::AirlineConfirmed => Some(3),
            Self::CrewAssigned => Some(4),
            Self::InTransit => Some(5),
            Self::Completed => Some(6),
            Self::Cancelled | Self::Other(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Known and not yet finished. Unknown codes are never counted as active.
    pub fn is_active(&self) -> bool {
        self.is_known() && !self.is_terminal()
    }
}

impl ExternalUrgency {
    pub const KNOWN: [ExternalUrgency; 3] = [Self::Stable, Self::Urgent, Self::Critical];

    pub fn from_code(code: &str) -> Self {
        match code {
            "stable" => Self::Stable,
            "urgent" => Self::Urgent,
            "critical" => Self::Critical,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Stable => "stable",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
            Self::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl InternalUrgency {
    pub const KNOWN: [InternalUrgency; 3] = [Self::Routine, Self::Urgent, Self::Emergency];

    pub fn from_code(code: &str) -> Self {
        match code {
            "routine" => Self::Routine,
            "urgent" => Self::Urgent,
            "emergency" => Self::Emergency,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
            Self::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ExternalStatus {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ExternalStatus> for String {
    fn from(code: ExternalStatus) -> Self {
        match code {
            ExternalStatus::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl From<String> for InternalStatus {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<InternalStatus> for String {
    fn from(code: InternalStatus) -> Self {
        match code {
            InternalStatus::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl From<String> for ExternalUrgency {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ExternalUrgency> for String {
    fn from(code: ExternalUrgency) -> Self {
        match code {
            ExternalUrgency::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl From<String> for InternalUrgency {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<InternalUrgency> for String {
    fn from(code: InternalUrgency) -> Self {
        match code {
            InternalUrgency::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExternalUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InternalUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
