use serde::{Deserialize, Serialize};

/// Query of `GET /api/v1/time/echo`
#[derive(Debug, Clone, Deserialize)]
pub struct TimeEchoQuery {
    /// Client-supplied date-time, with or without an offset or zone
    pub at: String,
}

/// The parsed instant, canonical and as seen from the request's zone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEchoResponse {
    pub received: String,
    pub utc: String,
    pub rendered: String,
    pub time_zone: String,
}
