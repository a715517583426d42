use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{
    EmailPresence, EstablishmentRecord, FieldError, SignupReceipt, SignupRequest, ValidatedFields,
    ValidationReport,
};

/// REST DTO for an establishment signup submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct SignupRequestDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// REST DTO for a completed signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupReceiptDto {
    pub identity_id: String,
    pub record_id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// REST DTO for one invalid field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    pub field: String,
    pub message: String,
}

/// REST DTO for a validation-only run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationReportDto {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub errors: Vec<FieldErrorDto>,
    #[serde(rename = "validatedData", skip_serializing_if = "Option::is_none")]
    pub validated_data: Option<ValidatedDataDto>,
}

/// The normalized fields echoed by a validation-only run. Deliberately has
/// no password field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidatedDataDto {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
}

/// REST DTO for a duplicate-email lookup request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CheckUserReq {
    #[serde(default)]
    pub email: String,
}

/// REST DTO for a duplicate-email lookup result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckUserDto {
    pub exists: bool,
    pub count: usize,
}

/// REST DTO for one stored establishment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentDto {
    pub id: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub identity_id: String,
    pub created_at: DateTime<Utc>,
}

/// REST DTO for an establishment lookup by email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstablishmentLookupDto {
    pub found: bool,
    pub establishments: Vec<EstablishmentDto>,
}

// Conversion implementations between REST DTOs and contract models

impl From<SignupRequestDto> for SignupRequest {
    fn from(dto: SignupRequestDto) -> Self {
        Self {
            name: dto.name,
            company: dto.company,
            phone: dto.phone,
            email: dto.email,
            password: dto.password,
        }
    }
}

impl From<SignupReceipt> for SignupReceiptDto {
    fn from(receipt: SignupReceipt) -> Self {
        Self {
            identity_id: receipt.identity_id,
            record_id: receipt.record_id,
            name: receipt.name,
            company: receipt.company,
            email: receipt.email,
            created_at: receipt.created_at,
        }
    }
}

impl From<FieldError> for FieldErrorDto {
    fn from(e: FieldError) -> Self {
        Self {
            field: e.field,
            message: e.message,
        }
    }
}

impl From<ValidatedFields> for ValidatedDataDto {
    fn from(v: ValidatedFields) -> Self {
        Self {
            name: v.name,
            company: v.company,
            phone: v.phone,
            email: v.email,
        }
    }
}

impl From<ValidationReport> for ValidationReportDto {
    fn from(report: ValidationReport) -> Self {
        Self {
            is_valid: report.is_valid,
            errors: report.errors.into_iter().map(FieldErrorDto::from).collect(),
            validated_data: report.validated.map(ValidatedDataDto::from),
        }
    }
}

impl From<EmailPresence> for CheckUserDto {
    fn from(p: EmailPresence) -> Self {
        Self {
            exists: p.exists,
            count: p.count,
        }
    }
}

impl From<EstablishmentRecord> for EstablishmentDto {
    fn from(r: EstablishmentRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            company: r.company,
            phone: r.phone,
            email: r.email,
            identity_id: r.identity_id,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_report_uses_camel_case_keys() {
        let dto = ValidationReportDto {
            is_valid: true,
            errors: Vec::new(),
            validated_data: Some(ValidatedDataDto {
                name: "Padaria Central".into(),
                company: "Padaria Central LTDA".into(),
                phone: "11912345678".into(),
                email: "maria@example.com".into(),
            }),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["isValid"], true);
        assert!(json["validatedData"].is_object());
        assert!(json["validatedData"].get("password").is_none());
    }

    #[test]
    fn validated_data_is_omitted_when_invalid() {
        let dto = ValidationReportDto {
            is_valid: false,
            errors: vec![FieldErrorDto {
                field: "email".into(),
                message: "A valid email is required".into(),
            }],
            validated_data: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("validatedData").is_none());
    }
}
