// SPDX-License-Identifier: Apache-2.0

use funil_api::{
    compatibility_channel, legacy_login_redirect, ApiError, ApiErrorCode, CompatibilityChannel,
    DashboardResponseDto, LeadDto, ProjectionDto, API_VERSION,
};
use funil_calc::{project, FunnelInputs};
use funil_model::{FieldError, Lead, LeadDraft, LeadEmail, LeadId, LeadName, LeadPhone};

#[test]
fn legacy_login_maps_to_capture_with_permanent_status() {
    let redirect = legacy_login_redirect();
    assert_eq!(redirect.from_path, "/login");
    assert_eq!(redirect.to_path, "/");
    assert_eq!(redirect.status_code, 308);
    assert_eq!(
        compatibility_channel("/login"),
        CompatibilityChannel::LegacyLoginRedirect
    );
    assert_eq!(
        compatibility_channel("/dashboard"),
        CompatibilityChannel::Stable
    );
}

#[test]
fn validation_error_envelope_names_each_field() {
    let errors = LeadDraft::default().validate().expect_err("empty draft");
    let api_error = ApiError::validation_failed(&errors);
    assert_eq!(api_error.code, ApiErrorCode::ValidationFailed);
    let listed: Vec<&str> = api_error.details["field_errors"]
        .as_array()
        .expect("field_errors array")
        .iter()
        .map(|e| e["field"].as_str().expect("field name"))
        .collect();
    assert_eq!(listed, vec!["name", "phone", "email"]);
}

#[test]
fn storage_failure_message_is_generic() {
    let err = ApiError::storage_failure();
    assert_eq!(err.code, ApiErrorCode::StorageFailure);
    assert!(err.message.contains("try again"));
    assert_eq!(err.details, serde_json::json!({}));
}

#[test]
fn error_codes_serialize_as_snake_case() {
    let err = ApiError::validation_failed(&[FieldError {
        field: "name",
        message: "name must not be empty".to_string(),
    }]);
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["code"], "validation_failed");
    let back: ApiError = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back.code, ApiErrorCode::ValidationFailed);
}

#[test]
fn dashboard_dto_carries_lead_and_formatted_projection() {
    let lead = Lead {
        id: LeadId::new(3).expect("id"),
        name: LeadName::parse("Ana").expect("name"),
        phone: LeadPhone::parse("+55 11 91234-5678").expect("phone"),
        email: LeadEmail::parse("ana@example.com").expect("email"),
        company: None,
        created_at_unix_ms: 1_700_000_000_000,
    };
    let projection = project(&FunnelInputs {
        investment: 10_000.0,
        cost_per_lead: 50.0,
        scheduling_rate_pct: 20.0,
        attendance_rate_pct: 80.0,
        conversion_rate_pct: 25.0,
        avg_ticket: 500.0,
    });
    let dto = DashboardResponseDto::new(
        Some(LeadDto::from(&lead)),
        Some(ProjectionDto::from(&projection)),
    );
    assert_eq!(dto.api_version, API_VERSION);
    let results = dto.results.expect("projection present");
    assert_eq!(results.leads, 200);
    assert_eq!(results.display.revenue, "R$ 4.000,00");
    assert_eq!(results.display.profit, "R$ -6.000,00");
    assert_eq!(results.display.cost_per_attendance, "R$ 312,50");
}

#[test]
fn dashboard_dto_without_results_reads_as_not_computed_yet() {
    let dto = DashboardResponseDto::new(None, None);
    let value = serde_json::to_value(&dto).expect("serialize");
    assert!(value["lead"].is_null());
    assert!(value["results"].is_null());
}
