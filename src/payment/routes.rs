//! Payment and form validation route handlers

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::AppState;

use super::methods::{process_payment, PaymentDetails, PaymentReceipt};
use super::validators::{self, PasswordStrength};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payments/validate", post(validate_payment))
        .route("/api/payments", post(pay))
        .route("/api/validation/fields", post(validate_fields))
}

#[derive(Debug, Serialize)]
pub struct PaymentCheckResponse {
    pub valid: bool,
    pub method: &'static str,
}

/// Check a payment submission without charging it
async fn validate_payment(Json(details): Json<PaymentDetails>) -> Result<Json<PaymentCheckResponse>> {
    details.validate(Utc::now().date_naive())?;
    Ok(Json(PaymentCheckResponse {
        valid: true,
        method: details.method_name(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub details: PaymentDetails,
}

/// Simulated payment
async fn pay(
    State(state): State<AppState>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<PaymentReceipt>> {
    let receipt = process_payment(&req.details, req.amount, &state.config.currency, Utc::now())?;
    Ok(Json(receipt))
}

/// Form fields to check; absent fields are skipped
#[derive(Debug, Default, Deserialize)]
pub struct FieldValidationRequest {
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub upi_id: Option<String>,
    pub mobile: Option<String>,
    pub pincode: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct FieldValidationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_strength: Option<PasswordStrength>,
}

impl FieldValidationRequest {
    pub fn check(&self, today: chrono::NaiveDate) -> FieldValidationResponse {
        FieldValidationResponse {
            card_number: self.card_number.as_deref().map(validators::validate_card_number),
            expiry: self.expiry.as_deref().map(|e| validators::validate_expiry(e, today)),
            cvv: self.cvv.as_deref().map(validators::validate_cvv),
            upi_id: self.upi_id.as_deref().map(validators::validate_upi_id),
            mobile: self.mobile.as_deref().map(validators::validate_indian_mobile),
            pincode: self.pincode.as_deref().map(validators::validate_pincode),
            email: self.email.as_deref().map(validators::validate_email),
            name: self.name.as_deref().map(validators::validate_person_name),
            password_strength: self.password.as_deref().map(validators::password_strength),
        }
    }
}

/// Run the field validators used by the signup and payment forms
async fn validate_fields(Json(req): Json<FieldValidationRequest>) -> Json<FieldValidationResponse> {
    Json(req.check(Utc::now().date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post_json, test_app};
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_field_check_skips_absent_fields() {
        let req = FieldValidationRequest {
            mobile: Some("9876543210".to_string()),
            pincode: Some("012345".to_string()),
            ..Default::default()
        };
        let res = req.check(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        assert_eq!(res.mobile, Some(true));
        assert_eq!(res.pincode, Some(false));
        assert!(res.card_number.is_none());
        assert!(res.password_strength.is_none());
    }

    #[tokio::test]
    async fn test_validate_fields_endpoint() {
        let (status, body) = post_json(
            test_app(),
            "/api/validation/fields",
            json!({
                "card_number": "4539 1488 0343 6467",
                "expiry": "01/20",
                "upi_id": "asha@okaxis",
                "email": "asha@spingo.in",
                "password": "Abcdef1!"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["card_number"], true);
        assert_eq!(body["expiry"], false);
        assert_eq!(body["upi_id"], true);
        assert_eq!(body["email"], true);
        assert_eq!(body["password_strength"], "strong");
        assert!(body.get("mobile").is_none());
    }

    #[tokio::test]
    async fn test_validate_payment_rejection() {
        let (status, body) = post_json(
            test_app(),
            "/api/payments/validate",
            json!({"method": "upi", "app": "gpay", "upi_id": "not-an-id"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "payment_rejected");
        assert_eq!(body["message"], "Please enter a valid UPI ID");
        assert_eq!(body["details"]["field"], "upi_id");
    }

    #[tokio::test]
    async fn test_validate_payment_ok() {
        let (status, body) = post_json(
            test_app(),
            "/api/payments/validate",
            json!({"method": "wallet", "wallet": "paytm"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["method"], "wallet");
    }

    #[tokio::test]
    async fn test_pay_by_card() {
        let (status, body) = post_json(
            test_app(),
            "/api/payments",
            json!({
                "amount": 15670,
                "details": {
                    "method": "card",
                    "number": "4539 1488 0343 6467",
                    "expiry": "12/99",
                    "cvv": "123",
                    "holder_name": "Asha Rao"
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "card");
        assert_eq!(body["amount"], "15670");
        assert_eq!(body["currency"], "INR");
        assert_eq!(body["card_last4"], "6467");
        assert!(body["transaction_id"].as_str().is_some());
    }
}
