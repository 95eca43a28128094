//! Per-field validation chains for the signup form.
//!
//! Each field carries an ordered list of checks with bail semantics: the
//! first failing check ends that field's chain, so a missing email reports
//! "not present" without also reporting a format error. Failures from
//! different fields are aggregated and returned together, email first.

use serde::{Deserialize, Serialize};

use pronto_core::Email;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_CHARS: usize = 4;

const EMAIL_NOT_PRESENT: &str = "Email not present";
const EMAIL_INVALID_FORMAT: &str = "Email has not a valid format";
const PASSWORD_NOT_PRESENT: &str = "Password not present";
const PASSWORD_TOO_SHORT: &str = "Password must have min 4 characters";

/// Raw signup form fields, as posted.
///
/// Both fields default to empty so an absent field reaches the presence
/// check instead of failing form deserialization with a 422.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A single field-level validation error, in the response wire shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Where the offending value came from (always the request body here).
    pub location: &'static str,
    /// Human-readable message.
    pub msg: &'static str,
    /// Name of the failing field.
    pub param: &'static str,
    /// The submitted value, echoed back.
    pub value: String,
}

/// Outcome of a successful validation: normalized email plus the raw
/// password, ready for hashing.
#[derive(Debug)]
pub struct ValidSignup {
    pub email: Email,
    pub password: String,
}

/// One step of a field's validation chain.
struct Rule {
    msg: &'static str,
    check: fn(&str) -> bool,
}

fn email_present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn email_well_formed(value: &str) -> bool {
    Email::parse(value).is_ok()
}

fn password_present(value: &str) -> bool {
    !value.is_empty()
}

fn password_long_enough(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_CHARS
}

const EMAIL_CHAIN: &[Rule] = &[
    Rule {
        msg: EMAIL_NOT_PRESENT,
        check: email_present,
    },
    Rule {
        msg: EMAIL_INVALID_FORMAT,
        check: email_well_formed,
    },
];

const PASSWORD_CHAIN: &[Rule] = &[
    Rule {
        msg: PASSWORD_NOT_PRESENT,
        check: password_present,
    },
    Rule {
        msg: PASSWORD_TOO_SHORT,
        check: password_long_enough,
    },
];

/// Run a chain against one field, stopping at the first failing rule.
fn first_failure(chain: &[Rule], param: &'static str, value: &str) -> Option<FieldError> {
    chain
        .iter()
        .find(|rule| !(rule.check)(value))
        .map(|rule| FieldError {
            location: "body",
            msg: rule.msg,
            param,
            value: value.to_owned(),
        })
}

/// Validate the signup form.
///
/// # Errors
///
/// Returns the aggregated, ordered list of field errors when any chain
/// fails; the caller must not reach the creation stage in that case.
pub fn validate_signup(form: &SignupForm) -> Result<ValidSignup, Vec<FieldError>> {
    let mut errors = Vec::new();
    errors.extend(first_failure(EMAIL_CHAIN, "email", &form.email));
    errors.extend(first_failure(PASSWORD_CHAIN, "password", &form.password));

    if !errors.is_empty() {
        return Err(errors);
    }

    // The chain already proved the email parses; normalize it for downstream.
    let email = Email::parse(&form.email).map_err(|_| {
        vec![FieldError {
            location: "body",
            msg: EMAIL_INVALID_FORMAT,
            param: "email",
            value: form.email.clone(),
        }]
    })?;

    Ok(ValidSignup {
        email,
        password: form.password.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> SignupForm {
        SignupForm {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_valid_form_normalizes_email() {
        let valid = validate_signup(&form(" User@Example.COM ", "validpass")).unwrap();
        assert_eq!(valid.email.as_str(), "user@example.com");
        assert_eq!(valid.password, "validpass");
    }

    #[test]
    fn test_missing_email_reports_not_present_only() {
        let errors = validate_signup(&form("", "validpass")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "email");
        assert_eq!(errors[0].msg, "Email not present");
    }

    #[test]
    fn test_invalid_email_bails_past_presence() {
        let errors = validate_signup(&form("not-an-email", "validpass")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Email has not a valid format");
        assert!(errors.iter().all(|e| e.msg != "Email not present"));
    }

    #[test]
    fn test_short_password() {
        let errors = validate_signup(&form("a@b.com", "abc")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "password");
        assert_eq!(errors[0].msg, "Password must have min 4 characters");
    }

    #[test]
    fn test_missing_password_reports_not_present_only() {
        let errors = validate_signup(&form("a@b.com", "")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Password not present");
    }

    #[test]
    fn test_errors_aggregate_across_fields_email_first() {
        let errors = validate_signup(&form("", "")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "email");
        assert_eq!(errors[1].param, "password");
    }

    #[test]
    fn test_exactly_four_char_password_passes() {
        assert!(validate_signup(&form("a@b.com", "abcd")).is_ok());
    }

    #[test]
    fn test_error_wire_shape() {
        let errors = validate_signup(&form("", "ok")).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "location": "body",
                    "msg": "Email not present",
                    "param": "email",
                    "value": ""
                },
                {
                    "location": "body",
                    "msg": "Password must have min 4 characters",
                    "param": "password",
                    "value": "ok"
                }
            ])
        );
    }
}
