use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::model::{FieldError, SignupRequest, ValidatedSignup};

/// Minimal address shape: non-whitespace/non-@ local part, one `@`, dotted
/// domain, alphabetic TLD of 2+ characters.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email regex"));

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;

/// Strip everything that is not an ASCII digit.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a raw submission, collecting one error per invalid field.
/// Pure: no I/O, no side effects. On success returns the normalized values.
pub fn validate(request: &SignupRequest) -> Result<ValidatedSignup, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = request.name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            "name is required and must have at least 2 characters",
        ));
    }

    let company = request.company.trim();
    if company.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(
            "company",
            "company is required and must have at least 2 characters",
        ));
    }

    let phone = normalize_phone(&request.phone);
    if phone.len() != 10 && phone.len() != 11 {
        errors.push(FieldError::new(
            "phone",
            "phone must contain 10 or 11 digits",
        ));
    }

    let email = request.email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        errors.push(FieldError::new("email", "email address is not valid"));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "password must have at least 6 characters",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidatedSignup {
        name: name.to_string(),
        company: company.to_string(),
        phone,
        email,
        password: request.password.clone(),
    })
}

/// Normalization applied to emails arriving outside the signup body
/// (lookup and duplicate-check endpoints).
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SignupRequest {
        SignupRequest {
            name: "  Maria Silva ".to_string(),
            company: "Padaria Central".to_string(),
            phone: "(11) 91234-5678".to_string(),
            email: " Maria@Example.COM ".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[test]
    fn accepts_and_normalizes_a_valid_request() {
        let v = validate(&valid_request()).unwrap();
        assert_eq!(v.name, "Maria Silva");
        assert_eq!(v.company, "Padaria Central");
        assert_eq!(v.phone, "11912345678");
        assert_eq!(v.email, "maria@example.com");
        assert_eq!(v.password, "secret123");
    }

    #[test]
    fn empty_request_reports_one_error_per_field() {
        let errors = validate(&SignupRequest::default()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "company", "phone", "email", "password"]);
    }

    #[test]
    fn collects_all_errors_not_just_the_first() {
        let req = SignupRequest {
            name: "X".to_string(),
            company: "OK Corp".to_string(),
            phone: "123".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = validate(&req).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "phone", "email", "password"]);
    }

    #[test]
    fn email_format_cases() {
        let mut req = valid_request();

        req.email = "not-an-email".to_string();
        assert!(validate(&req)
            .unwrap_err()
            .iter()
            .any(|e| e.field == "email"));

        req.email = "a@b.co".to_string();
        assert!(validate(&req).is_ok());

        req.email = "a@b".to_string();
        assert!(validate(&req).is_err());

        req.email = "a b@c.com".to_string();
        assert!(validate(&req).is_err());

        req.email = "a@b.c".to_string(); // single-letter TLD
        assert!(validate(&req).is_err());
    }

    #[test]
    fn phone_normalization_cases() {
        assert_eq!(normalize_phone("(11) 91234-5678"), "11912345678");
        assert_eq!(normalize_phone("+55 11 91234-5678"), "5511912345678");

        let mut req = valid_request();
        req.phone = "123".to_string();
        assert!(validate(&req)
            .unwrap_err()
            .iter()
            .any(|e| e.field == "phone"));

        // 10 digits (landline style) is also valid
        req.phone = "(11) 3123-4567".to_string();
        assert!(validate(&req).is_ok());

        // 12 digits is too long
        req.phone = "551191234567".to_string();
        assert!(validate(&req).is_err());
    }

    #[test]
    fn password_boundary() {
        let mut req = valid_request();
        req.password = "12345".to_string();
        assert!(validate(&req).is_err());
        req.password = "123456".to_string();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn whitespace_only_names_are_rejected() {
        let mut req = valid_request();
        req.name = "   ".to_string();
        assert!(validate(&req)
            .unwrap_err()
            .iter()
            .any(|e| e.field == "name"));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }
}
