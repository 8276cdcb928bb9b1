#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use cb_api::app::AppState;
use cb_api::handlers::EnvelopeBuilder;
use cb_api::i18n::embedded_catalog;
use cb_api::routes::EmployeeDirectory;
use cb_shared::config::EnvelopeConfig;

/// Builder over the embedded bundle with default settings
pub fn envelope_builder() -> EnvelopeBuilder {
    envelope_builder_with(EnvelopeConfig::default())
}

pub fn envelope_builder_with(config: EnvelopeConfig) -> EnvelopeBuilder {
    let catalog = embedded_catalog().expect("embedded bundle parses");
    EnvelopeBuilder::new(Arc::new(catalog), config)
}

/// State with the seeded directory
pub fn app_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(envelope_builder(), EmployeeDirectory::seeded()))
}

/// 2024-01-02T15:04:05Z
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
}
