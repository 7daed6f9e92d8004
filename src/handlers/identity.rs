use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::errors::AppError;

/// Header carrying the authenticated buyer's email. Token issuance and
/// verification happen upstream (reverse proxy / identity service); this
/// service only consumes the resulting principal.
pub const BUYER_EMAIL_HEADER: &str = "x-buyer-email";

/// The authenticated buyer. Extraction fails with 401 when the principal
/// header is missing or empty.
#[derive(Debug, Clone)]
pub struct BuyerIdentity(pub String);

impl FromRequest for BuyerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let email = req
            .headers()
            .get(BUYER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        ready(email.map(BuyerIdentity).ok_or(AppError::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use actix_web::FromRequest;

    use super::*;

    #[actix_web::test]
    async fn extracts_email_from_header() {
        let req = TestRequest::default()
            .insert_header((BUYER_EMAIL_HEADER, "buyer@test.com"))
            .to_http_request();

        let identity = BuyerIdentity::extract(&req).await.expect("should extract");
        assert_eq!(identity.0, "buyer@test.com");
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();

        let err = BuyerIdentity::extract(&req)
            .await
            .expect_err("should be unauthorized");
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[actix_web::test]
    async fn blank_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((BUYER_EMAIL_HEADER, "   "))
            .to_http_request();

        assert!(BuyerIdentity::extract(&req).await.is_err());
    }
}
