//! Shared response envelope for API handlers.
//!
//! Aggregate and list endpoints wrap their payload in `{ "data": ... }`;
//! using this struct instead of ad-hoc `json!` keeps the shape typed.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
