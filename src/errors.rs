use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidBasketState(_)
            | DomainError::InsufficientStock { .. }
            | DomainError::PersistenceFailure => AppError::BadRequest(e.to_string()),
            DomainError::NotFound => AppError::NotFound,
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": msg
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string()
            })),
            // Never leak internal detail to the client.
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn bad_request_returns_400() {
        let resp = AppError::BadRequest("Basket is empty or not found".to_string())
            .error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(
            AppError::NotFound.error_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unauthorized_returns_401() {
        assert_eq!(
            AppError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("connection reset".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_basket_state_maps_to_bad_request_with_client_message() {
        let app_err: AppError =
            DomainError::InvalidBasketState("basket has no items".to_string()).into();
        match app_err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Basket is empty or not found"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn insufficient_stock_maps_to_bad_request() {
        let app_err: AppError = DomainError::InsufficientStock {
            product: "board".to_string(),
        }
        .into();
        match app_err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Some items out of stock"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn persistence_failure_maps_to_bad_request() {
        let app_err: AppError = DomainError::PersistenceFailure.into();
        match app_err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Problem creating order"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_unauthorized_maps_to_app_unauthorized() {
        let app_err: AppError = DomainError::Unauthorized.into();
        assert!(matches!(app_err, AppError::Unauthorized));
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
