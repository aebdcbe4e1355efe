use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use funil_api::{
    decode_funnel_form, legacy_login_redirect, parse_optional_lead_id, ApiError, CaptureFormDto,
    DashboardResponseDto, FunnelForm, LeadCaptureForm, LeadDto, ProjectionDto,
};
use funil_calc::project;
use funil_model::{Lead, LeadDraft};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{info, warn};

pub(crate) fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    let body = Json(json!({ "error": err }));
    (status, body).into_response()
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn is_draining(state: &AppState) -> bool {
    !state.accepting_requests.load(Ordering::Relaxed)
}

fn draining_response(route: &str) -> Response {
    api_error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        ApiError::internal(&format!("{route} is draining for shutdown")),
    )
}

pub(crate) async fn capture_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = Json(CaptureFormDto::current()).into_response();
    state
        .metrics
        .observe_request("/", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn capture_submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LeadCaptureForm>, FormRejection>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        let resp = draining_response("/");
        state
            .metrics
            .observe_request("/", StatusCode::SERVICE_UNAVAILABLE, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }

    let draft: LeadDraft = match form {
        Ok(Form(form)) => form.into(),
        Err(rejection) => {
            let resp = api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::malformed_body(&rejection.body_text()),
            );
            state
                .metrics
                .observe_request("/", StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };

    let new_lead = match draft.validate() {
        Ok(lead) => lead,
        Err(field_errors) => {
            let resp = api_error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::validation_failed(&field_errors),
            );
            state
                .metrics
                .observe_request("/", StatusCode::UNPROCESSABLE_ENTITY, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };

    let insert = timeout(state.api.request_timeout, state.store.insert_lead(new_lead)).await;
    let resp = match insert {
        Ok(Ok(lead)) => {
            state.metrics.leads_created.fetch_add(1, Ordering::Relaxed);
            if started.elapsed() > state.api.slow_insert_threshold {
                warn!(
                    request_id = %request_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "slow lead insert"
                );
            }
            info!(request_id = %request_id, lead_id = lead.id.as_i64(), "lead captured");
            Redirect::to(&format!("/dashboard?lead_id={}", lead.id)).into_response()
        }
        Ok(Err(e)) => {
            state
                .metrics
                .store_write_failures
                .fetch_add(1, Ordering::Relaxed);
            warn!(request_id = %request_id, error = %e, "lead insert failed");
            api_error_response(StatusCode::SERVICE_UNAVAILABLE, ApiError::storage_failure())
        }
        Err(_) => {
            state
                .metrics
                .store_write_failures
                .fetch_add(1, Ordering::Relaxed);
            warn!(request_id = %request_id, "lead insert timed out");
            api_error_response(StatusCode::SERVICE_UNAVAILABLE, ApiError::storage_failure())
        }
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

async fn lead_for_query(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Option<Lead>, ApiError> {
    let Some(id) = parse_optional_lead_id(params.get("lead_id").map(String::as_str)) else {
        return Ok(None);
    };
    match timeout(state.api.request_timeout, state.store.fetch_lead(id)).await {
        Ok(Ok(lead)) => Ok(lead),
        Ok(Err(e)) => {
            warn!(lead_id = id.as_i64(), error = %e, "lead fetch failed");
            Err(ApiError::storage_failure())
        }
        Err(_) => {
            warn!(lead_id = id.as_i64(), "lead fetch timed out");
            Err(ApiError::storage_failure())
        }
    }
}

pub(crate) async fn dashboard_view_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = match lead_for_query(&state, &params).await {
        Ok(lead) => {
            let dto = DashboardResponseDto::new(lead.as_ref().map(LeadDto::from), None);
            Json(dto).into_response()
        }
        Err(err) => api_error_response(StatusCode::SERVICE_UNAVAILABLE, err),
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/dashboard", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn dashboard_project_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    form: Result<Form<FunnelForm>, FormRejection>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    if is_draining(&state) {
        let resp = draining_response("/dashboard");
        state
            .metrics
            .observe_request("/dashboard", StatusCode::SERVICE_UNAVAILABLE, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let resp = api_error_response(
                StatusCode::BAD_REQUEST,
                ApiError::malformed_body(&rejection.body_text()),
            );
            state
                .metrics
                .observe_request("/dashboard", StatusCode::BAD_REQUEST, started.elapsed())
                .await;
            return with_request_id(resp, &request_id);
        }
    };

    let resp = match lead_for_query(&state, &params).await {
        Ok(lead) => {
            let inputs = decode_funnel_form(&form);
            let projection = project(&inputs);
            info!(
                request_id = %request_id,
                leads = projection.leads,
                sales = projection.sales,
                "funnel projection computed"
            );
            let dto = DashboardResponseDto::new(
                lead.as_ref().map(LeadDto::from),
                Some(ProjectionDto::from(&projection)),
            );
            Json(dto).into_response()
        }
        Err(err) => api_error_response(StatusCode::SERVICE_UNAVAILABLE, err),
    };
    let status = resp.status();
    state
        .metrics
        .observe_request("/dashboard", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn legacy_login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let redirect = legacy_login_redirect();
    let status = StatusCode::from_u16(redirect.status_code).unwrap_or(StatusCode::PERMANENT_REDIRECT);
    let mut resp = status.into_response();
    if let Ok(v) = HeaderValue::from_str(&redirect.to_path) {
        resp.headers_mut().insert("location", v);
    }
    state
        .metrics
        .observe_request("/login", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// There is no session to clear; the route exists so clients with a sign-out
/// control land back on the capture view.
pub(crate) async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let resp = Redirect::to("/").into_response();
    state
        .metrics
        .observe_request("/logout", StatusCode::SEE_OTHER, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let store_ready = if state.api.readiness_requires_store {
        state.store.ping().await.is_ok()
    } else {
        true
    };
    let (status, body) = if state.ready.load(Ordering::Relaxed) && store_ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
    };
    let resp = (status, body).into_response();
    state
        .metrics
        .observe_request("/readyz", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let payload = json!({
        "service": {
            "name": "funil",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "server": {
            "crate": crate::CRATE_NAME,
            "config_schema_version": crate::config::CONFIG_SCHEMA_VERSION,
        },
        "api_version": funil_api::API_VERSION,
    });
    let mut response = Json(payload).into_response();
    if let Ok(value) = HeaderValue::from_str("public, max-age=30") {
        response.headers_mut().insert("cache-control", value);
    }
    state
        .metrics
        .observe_request("/v1/version", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    crate::telemetry::metrics_endpoint::metrics_handler(State(state)).await
}
