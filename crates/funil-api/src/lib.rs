// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Funil wire layer.
//!
//! Everything a transport needs to speak to the outside world: response
//! DTOs, the error envelope, urlencoded form decoding, and the mapping for
//! legacy routes. Transport-agnostic: this crate never imports axum.

mod compat;
mod dto;
mod errors;
mod params;

pub use compat::{compatibility_channel, legacy_login_redirect, CompatibilityChannel, CompatibilityRedirect};
pub use dto::{
    CaptureFormDto, CaptureFormFieldDto, DashboardResponseDto, LeadDto, ProjectionDisplayDto,
    ProjectionDto, API_VERSION,
};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{decode_funnel_form, parse_optional_lead_id, FunnelForm, LeadCaptureForm};

pub const CRATE_NAME: &str = "funil-api";
