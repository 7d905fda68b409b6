use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

/// Request body for toggling a lawyer profile's verification flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetVerificationRequest {
    pub is_verified: bool,
}

/// Request DTO for the lead finder function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct LeadSearchRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Practice area is required"))
    )]
    pub practice_area: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 2, message = "Location must be at least 2 characters"))
    )]
    pub location: String,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))
    )]
    pub limit: u32,
}

/// Request DTO for starting an email sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct EmailSequenceRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Sequence name is required"))
    )]
    pub sequence: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "At least one recipient is required"))
    )]
    pub recipients: Vec<String>,
}

/// Request DTO for recording progress on an outreach lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct OutreachUpdateRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Lead id is required"))
    )]
    pub lead_id: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Status is required"))
    )]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Function responses
// ---------------------------------------------------------------------------

/// A prospective firm or attorney returned by the lead finder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub practice_area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadSearchResponse {
    #[serde(default)]
    pub leads: Vec<Lead>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailSequenceResponse {
    pub sequence_id: String,
    pub scheduled: u32,
}
