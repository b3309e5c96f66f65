//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl for `AppError` lives in `ecotrace-core` alongside
//! the type itself (Rust's orphan rule forbids implementing the foreign
//! `axum::IntoResponse` trait for the foreign `AppError` type here). The
//! response body type is re-exported for convenience.

pub use ecotrace_core::error::ApiErrorResponse;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use ecotrace_core::error::AppError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::authentication("x"), StatusCode::UNAUTHORIZED),
            (AppError::authorization("x"), StatusCode::FORBIDDEN),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::invalid_state("x"), StatusCode::CONFLICT),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
