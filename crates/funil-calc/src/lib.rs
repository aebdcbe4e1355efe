#![forbid(unsafe_code)]
//! Funil computation core.
//!
//! Deterministic and clock-free: the codec and the projector are pure
//! functions over their arguments. All I/O, configuration, and persistence
//! live in `funil-server`.

mod funnel;
mod locale;

pub use funnel::{
    project, FunnelInputs, FunnelProjection, CLOSER_SALES_CAPACITY,
    SCHEDULER_ATTENDANCE_CAPACITY,
};
pub use locale::{format_currency_brl, parse_decimal_br};

pub const CRATE_NAME: &str = "funil-calc";
