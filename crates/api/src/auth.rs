//! Bearer-token guard for the reminder-scan trigger.
//!
//! The scan endpoint is meant to be hit by an external scheduler; it is
//! gated by a static shared secret compared for exact equality. There is no
//! per-user auth model anywhere else in this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use intake_core::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request presented the configured cron secret.
///
/// Use as an extractor parameter; extraction fails with 401 before the
/// handler body runs, so no side effect happens on a bad token.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if token != state.config.cron_secret {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid scan token".into(),
            )));
        }

        Ok(CronAuth)
    }
}
