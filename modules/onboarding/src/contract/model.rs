use chrono::{DateTime, Utc};

/// Raw signup submission as received from a client; exists only for the
/// duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupRequest {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Normalized signup data: trimmed name/company, digit-only phone,
/// lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSignup {
    pub name: String,
    pub company: String,
    /// Digits only, 10 or 11 of them.
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// One invalid field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A login credential created at the external auth service. Never mutated
/// here; deleted only as the compensating action for a failed record insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Persisted business entity, owned by the external store. An establishment
/// record never exists without its identity (identity is created first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstablishmentRecord {
    pub id: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub identity_id: String,
    pub created_at: DateTime<Utc>,
}

/// Success payload of a completed signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupReceipt {
    pub identity_id: String,
    pub record_id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a validation-only run. Never echoes the password back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
    pub validated: Option<ValidatedFields>,
}

/// The normalized fields a validation-only caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

impl From<&ValidatedSignup> for ValidatedFields {
    fn from(v: &ValidatedSignup) -> Self {
        Self {
            name: v.name.clone(),
            company: v.company.clone(),
            phone: v.phone.clone(),
            email: v.email.clone(),
        }
    }
}

/// Result of a duplicate lookup by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailPresence {
    pub exists: bool,
    pub count: usize,
}
