use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Reject anything that is not a plausible phone number
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if sg_shared::is_valid_phone(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 1, max = 128, message = "password is required"))]
    pub password: String,
    /// Requested access token lifetime; absent or `<= 0` means the default
    #[validate(range(max = 2592000, message = "expire_seconds must not exceed 30 days"))]
    #[serde(default)]
    pub expire_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom = "validate_phone")]
    pub phone: String,
    #[validate(length(min = 8, max = 128, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub message: String,
    /// Refresh tokens revoked by this call
    pub revoked: u64,
}

/// Identity carried by the presented access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            phone: "13800000001".to_string(),
            password: "x".to_string(),
            expire_seconds: None,
        };
        assert!(ok.validate().is_ok());

        let bad_phone = LoginRequest {
            phone: "not-a-phone".to_string(),
            ..ok.clone()
        };
        let errors = bad_phone.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("phone"));

        let no_password = LoginRequest {
            password: String::new(),
            ..ok
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn test_register_password_floor() {
        let request = RegisterRequest {
            phone: "+8613800000001".to_string(),
            password: "short".to_string(),
            email: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_expire_seconds_is_optional() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"phone":"13800000001","password":"pw"}"#).unwrap();
        assert_eq!(request.expire_seconds, None);
    }

    #[test]
    fn test_expire_seconds_upper_bound() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"phone":"13800000001","password":"pw","expire_seconds":9223372036854775807}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("expire_seconds"));

        let negative = LoginRequest {
            expire_seconds: Some(-1),
            ..request.clone()
        };
        assert!(negative.validate().is_ok());

        let thirty_days = LoginRequest {
            expire_seconds: Some(2_592_000),
            ..request
        };
        assert!(thirty_days.validate().is_ok());
    }
}
