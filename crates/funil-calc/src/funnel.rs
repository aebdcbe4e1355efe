//! Sales-funnel projection.
//!
//! A linear derivation chain over six inputs: paid investment buys leads,
//! a share of leads schedule an appointment, a share of those attend, a
//! share of attendances convert into sales. Counts truncate toward zero at
//! every stage; monetary and ratio outputs are rounded to two decimals at
//! the point of output.

use serde::{Deserialize, Serialize};

/// Attendances one scheduler can work per period.
pub const SCHEDULER_ATTENDANCE_CAPACITY: u64 = 180;
/// Closed sales one closer can work per period.
pub const CLOSER_SALES_CAPACITY: u64 = 120;

/// The six dashboard inputs. Rates are percentages: `25.0` means 25%.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunnelInputs {
    pub investment: f64,
    pub cost_per_lead: f64,
    pub scheduling_rate_pct: f64,
    pub attendance_rate_pct: f64,
    pub conversion_rate_pct: f64,
    pub avg_ticket: f64,
}

impl FunnelInputs {
    /// Clamps negative and non-finite inputs to zero.
    ///
    /// The projection is total over all of `f64`: a negative or NaN field
    /// behaves exactly like an absent one rather than producing wrapped
    /// counts or poisoned ratios downstream.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            investment: clamp(self.investment),
            cost_per_lead: clamp(self.cost_per_lead),
            scheduling_rate_pct: clamp(self.scheduling_rate_pct),
            attendance_rate_pct: clamp(self.attendance_rate_pct),
            conversion_rate_pct: clamp(self.conversion_rate_pct),
            avg_ticket: clamp(self.avg_ticket),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunnelProjection {
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
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn staff_needed(volume: u64, capacity: u64) -> u64 {
    volume.div_ceil(capacity).max(1)
}

/// Projects the funnel. Never fails: every denominator is guarded and the
/// inputs are sanitized first (see [`FunnelInputs::sanitized`]).
#[must_use]
pub fn project(inputs: &FunnelInputs) -> FunnelProjection {
    let i = inputs.sanitized();
    let scheduling_rate = i.scheduling_rate_pct / 100.0;
    let attendance_rate = i.attendance_rate_pct / 100.0;
    let conversion_rate = i.conversion_rate_pct / 100.0;

    let leads = if i.cost_per_lead > 0.0 {
        (i.investment / i.cost_per_lead) as u64
    } else {
        0
    };
    let appointments = (leads as f64 * scheduling_rate) as u64;
    let attendances = (appointments as f64 * attendance_rate) as u64;
    let sales = (attendances as f64 * conversion_rate) as u64;

    let revenue = sales as f64 * i.avg_ticket;
    let cost_per_acquisition = if sales > 0 {
        i.investment / sales as f64
    } else {
        0.0
    };
    let return_on_spend = if i.investment > 0.0 {
        revenue / i.investment
    } else {
        0.0
    };
    let cost_per_attendance = if attendances > 0 {
        i.investment / attendances as f64
    } else {
        0.0
    };

    let overall_conversion_pct = if leads > 0 {
        round2(sales as f64 / leads as f64 * 100.0)
    } else {
        0.0
    };
    let revenue_per_lead = if leads > 0 { round2(revenue / leads as f64) } else { 0.0 };

    FunnelProjection {
        leads,
        appointments,
        attendances,
        sales,
        revenue: round2(revenue),
        cost_per_acquisition: round2(cost_per_acquisition),
        return_on_spend: round2(return_on_spend),
        cost_per_attendance: round2(cost_per_attendance),
        schedulers_needed: staff_needed(attendances, SCHEDULER_ATTENDANCE_CAPACITY),
        closers_needed: staff_needed(sales, CLOSER_SALES_CAPACITY),
        overall_conversion_pct,
        revenue_per_lead,
        profit: round2(revenue - i.investment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_inputs() -> FunnelInputs {
        FunnelInputs {
            investment: 10_000.0,
            cost_per_lead: 50.0,
            scheduling_rate_pct: 20.0,
            attendance_rate_pct: 80.0,
            conversion_rate_pct: 25.0,
            avg_ticket: 500.0,
        }
    }

    #[test]
    fn baseline_projection_matches_the_derivation_chain() {
        let p = project(&baseline_inputs());
        assert_eq!(p.leads, 200);
        assert_eq!(p.appointments, 40);
        assert_eq!(p.attendances, 32);
        assert_eq!(p.sales, 8);
        assert_eq!(p.revenue, 4000.0);
        assert_eq!(p.profit, -6000.0);
        assert_eq!(p.cost_per_acquisition, 1250.0);
        assert_eq!(p.return_on_spend, 0.4);
        assert_eq!(p.cost_per_attendance, 312.5);
        assert_eq!(p.schedulers_needed, 1);
        assert_eq!(p.closers_needed, 1);
        assert_eq!(p.overall_conversion_pct, 4.0);
        assert_eq!(p.revenue_per_lead, 20.0);
    }

    #[test]
    fn zero_inputs_avoid_every_division() {
        let p = project(&FunnelInputs::default());
        assert_eq!(p.leads, 0);
        assert_eq!(p.sales, 0);
        assert_eq!(p.revenue, 0.0);
        assert_eq!(p.cost_per_acquisition, 0.0);
        assert_eq!(p.return_on_spend, 0.0);
        assert_eq!(p.cost_per_attendance, 0.0);
        assert_eq!(p.overall_conversion_pct, 0.0);
        assert_eq!(p.revenue_per_lead, 0.0);
        assert_eq!(p.profit, 0.0);
    }

    #[test]
    fn staffing_never_drops_below_one() {
        let p = project(&FunnelInputs::default());
        assert_eq!(p.schedulers_needed, 1);
        assert_eq!(p.closers_needed, 1);

        let busy = project(&FunnelInputs {
            investment: 1_000_000.0,
            cost_per_lead: 1.0,
            scheduling_rate_pct: 100.0,
            attendance_rate_pct: 100.0,
            conversion_rate_pct: 100.0,
            avg_ticket: 10.0,
        });
        // 1_000_000 attendances / 180 and sales / 120, rounded up.
        assert_eq!(busy.schedulers_needed, 5556);
        assert_eq!(busy.closers_needed, 8334);
    }

    #[test]
    fn staffing_rounds_up_at_capacity_boundaries() {
        assert_eq!(staff_needed(180, SCHEDULER_ATTENDANCE_CAPACITY), 1);
        assert_eq!(staff_needed(181, SCHEDULER_ATTENDANCE_CAPACITY), 2);
        assert_eq!(staff_needed(120, CLOSER_SALES_CAPACITY), 1);
        assert_eq!(staff_needed(121, CLOSER_SALES_CAPACITY), 2);
        assert_eq!(staff_needed(0, CLOSER_SALES_CAPACITY), 1);
    }

    #[test]
    fn counts_truncate_toward_zero() {
        let p = project(&FunnelInputs {
            investment: 999.0,
            cost_per_lead: 100.0,
            scheduling_rate_pct: 55.0,
            attendance_rate_pct: 55.0,
            conversion_rate_pct: 55.0,
            avg_ticket: 100.0,
        });
        // 9.99 leads -> 9, 4.95 appointments -> 4, 2.2 -> 2, 1.1 -> 1.
        assert_eq!(p.leads, 9);
        assert_eq!(p.appointments, 4);
        assert_eq!(p.attendances, 2);
        assert_eq!(p.sales, 1);
    }

    #[test]
    fn negative_inputs_are_clamped_to_zero() {
        let negative = project(&FunnelInputs {
            investment: -10_000.0,
            cost_per_lead: -50.0,
            scheduling_rate_pct: -20.0,
            attendance_rate_pct: -80.0,
            conversion_rate_pct: -25.0,
            avg_ticket: -500.0,
        });
        assert_eq!(negative, project(&FunnelInputs::default()));
    }

    #[test]
    fn non_finite_inputs_are_clamped_to_zero() {
        let p = project(&FunnelInputs {
            investment: f64::NAN,
            cost_per_lead: f64::INFINITY,
            ..FunnelInputs::default()
        });
        assert_eq!(p, project(&FunnelInputs::default()));
    }

    #[test]
    fn rates_above_one_hundred_percent_amplify() {
        let p = project(&FunnelInputs {
            investment: 1000.0,
            cost_per_lead: 10.0,
            scheduling_rate_pct: 150.0,
            attendance_rate_pct: 100.0,
            conversion_rate_pct: 100.0,
            avg_ticket: 1.0,
        });
        assert_eq!(p.leads, 100);
        assert_eq!(p.appointments, 150);
        assert_eq!(p.sales, 150);
    }

    #[test]
    fn monetary_outputs_round_to_two_decimals() {
        let p = project(&FunnelInputs {
            investment: 1000.0,
            cost_per_lead: 300.0,
            scheduling_rate_pct: 100.0,
            attendance_rate_pct: 100.0,
            conversion_rate_pct: 100.0,
            avg_ticket: 333.333,
        });
        // 3 sales at 333.333 -> 999.999 revenue.
        assert_eq!(p.revenue, 1000.0);
        assert_eq!(p.cost_per_acquisition, 333.33);
        assert_eq!(p.profit, 0.0);
    }
}
