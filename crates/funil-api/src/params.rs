// SPDX-License-Identifier: Apache-2.0

use funil_calc::{parse_decimal_br, FunnelInputs};
use funil_model::{LeadDraft, LeadId};
use serde::Deserialize;

/// Raw capture submission as it arrives on the wire. All fields optional so
/// that a partial form still reaches validation and gets per-field errors
/// instead of a decode rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadCaptureForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
}

impl From<LeadCaptureForm> for LeadDraft {
    fn from(form: LeadCaptureForm) -> Self {
        Self {
            name: form.name,
            phone: form.phone,
            email: form.email,
            company: form.company,
        }
    }
}

/// The six dashboard fields, pt-BR formatted strings exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FunnelForm {
    pub investment: Option<String>,
    pub cost_per_lead: Option<String>,
    pub scheduling_rate: Option<String>,
    pub attendance_rate: Option<String>,
    pub conversion_rate: Option<String>,
    pub avg_ticket: Option<String>,
}

/// Decodes the form through the pt-BR codec. Absent and malformed fields
/// decode to zero by the codec's contract, so this never fails.
#[must_use]
pub fn decode_funnel_form(form: &FunnelForm) -> FunnelInputs {
    FunnelInputs {
        investment: parse_decimal_br(form.investment.as_deref()),
        cost_per_lead: parse_decimal_br(form.cost_per_lead.as_deref()),
        scheduling_rate_pct: parse_decimal_br(form.scheduling_rate.as_deref()),
        attendance_rate_pct: parse_decimal_br(form.attendance_rate.as_deref()),
        conversion_rate_pct: parse_decimal_br(form.conversion_rate.as_deref()),
        avg_ticket: parse_decimal_br(form.avg_ticket.as_deref()),
    }
}

/// Lenient `lead_id` query decoding: absent, non-numeric, or non-positive
/// values read as "no lead selected", never as an error.
#[must_use]
pub fn parse_optional_lead_id(raw: Option<&str>) -> Option<LeadId> {
    let raw = raw?.trim();
    let id = raw.parse::<i64>().ok()?;
    LeadId::new(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funnel_form_decodes_through_the_codec() {
        let form = FunnelForm {
            investment: Some("10.000,00".to_string()),
            cost_per_lead: Some("50".to_string()),
            scheduling_rate: Some("20".to_string()),
            attendance_rate: Some("80".to_string()),
            conversion_rate: Some("25".to_string()),
            avg_ticket: Some("500,00".to_string()),
        };
        let inputs = decode_funnel_form(&form);
        assert_eq!(inputs.investment, 10_000.0);
        assert_eq!(inputs.cost_per_lead, 50.0);
        assert_eq!(inputs.scheduling_rate_pct, 20.0);
        assert_eq!(inputs.avg_ticket, 500.0);
    }

    #[test]
    fn absent_and_malformed_fields_decode_to_zero() {
        let inputs = decode_funnel_form(&FunnelForm {
            investment: Some("not a number".to_string()),
            ..FunnelForm::default()
        });
        assert_eq!(inputs.investment, 0.0);
        assert_eq!(inputs.cost_per_lead, 0.0);
    }

    #[test]
    fn lead_id_decoding_is_lenient() {
        assert_eq!(
            parse_optional_lead_id(Some("7")),
            Some(LeadId::new(7).expect("id"))
        );
        assert_eq!(parse_optional_lead_id(Some(" 7 ")).map(LeadId::as_i64), Some(7));
        assert_eq!(parse_optional_lead_id(None), None);
        assert_eq!(parse_optional_lead_id(Some("")), None);
        assert_eq!(parse_optional_lead_id(Some("abc")), None);
        assert_eq!(parse_optional_lead_id(Some("0")), None);
        assert_eq!(parse_optional_lead_id(Some("-4")), None);
    }
}
