// SPDX-License-Identifier: Apache-2.0

use funil_calc::{format_currency_brl, FunnelProjection};
use funil_model::{Lead, LeadCompany};
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeadDto {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: Option<String>,
    pub created_at_unix_ms: i64,
}

impl From<&Lead> for LeadDto {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.as_i64(),
            name: lead.name.as_str().to_string(),
            phone: lead.phone.as_str().to_string(),
            email: lead.email.as_str().to_string(),
            company: lead.company.as_ref().map(LeadCompany::as_str).map(String::from),
            created_at_unix_ms: lead.created_at_unix_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureFormFieldDto {
    pub name: String,
    pub required: bool,
    pub max_len: usize,
}

/// Contract for rendering the capture form client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureFormDto {
    pub api_version: String,
    pub submit_path: String,
    pub fields: Vec<CaptureFormFieldDto>,
}

impl CaptureFormDto {
    #[must_use]
    pub fn current() -> Self {
        let field = |name: &str, required: bool, max_len: usize| CaptureFormFieldDto {
            name: name.to_string(),
            required,
            max_len,
        };
        Self {
            api_version: API_VERSION.to_string(),
            submit_path: "/".to_string(),
            fields: vec![
                field("name", true, funil_model::NAME_MAX_LEN),
                field("phone", true, funil_model::PHONE_MAX_LEN),
                field("email", true, funil_model::EMAIL_MAX_LEN),
                field("company", false, funil_model::COMPANY_MAX_LEN),
            ],
        }
    }
}

/// Monetary fields of the projection, pre-rendered as pt-BR currency for
/// display alongside the raw numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionDisplayDto {
    pub revenue: String,
    pub cost_per_acquisition: String,
    pub cost_per_attendance: String,
    pub revenue_per_lead: String,
    pub profit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionDto {
    pub leads: u64,
    pub appointments: u64,
    pub attendances: u64,
    pub sales: u64,
    pub revenue: f64,
    pub cost_per_acquisition: f64,
    pub return_on_spend: f64,
    pub cost_per_attendance: f64,
    pub schedulers_needed: u64,
    pub closers_needed: u64,
    pub overall_conversion_pct: f64,
    pub revenue_per_lead: f64,
    pub profit: f64,
    pub display: ProjectionDisplayDto,
}

impl From<&FunnelProjection> for ProjectionDto {
    fn from(p: &FunnelProjection) -> Self {
        Self {
            leads: p.leads,
            appointments: p.appointments,
            attendances: p.attendances,
            sales: p.sales,
            revenue: p.revenue,
            cost_per_acquisition: p.cost_per_acquisition,
            return_on_spend: p.return_on_spend,
            cost_per_attendance: p.cost_per_attendance,
            schedulers_needed: p.schedulers_needed,
            closers_needed: p.closers_needed,
            overall_conversion_pct: p.overall_conversion_pct,
            revenue_per_lead: p.revenue_per_lead,
            profit: p.profit,
            display: ProjectionDisplayDto {
                revenue: format_currency_brl(p.revenue),
                cost_per_acquisition: format_currency_brl(p.cost_per_acquisition),
                cost_per_attendance: format_currency_brl(p.cost_per_attendance),
                revenue_per_lead: format_currency_brl(p.revenue_per_lead),
                profit: format_currency_brl(p.profit),
            },
        }
    }
}

/// Dashboard payload. `results` stays `None` until a projection has been
/// requested; clients render that as "no results yet".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardResponseDto {
    pub api_version: String,
    pub lead: Option<LeadDto>,
    pub results: Option<ProjectionDto>,
}

impl DashboardResponseDto {
    #[must_use]
    pub fn new(lead: Option<LeadDto>, results: Option<ProjectionDto>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            lead,
            results,
        }
    }
}
