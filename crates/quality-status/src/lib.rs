//! Water Quality Status
//!
//! Maps pH readings to a safety status and resolves the latest reading for
//! each household.

mod latest;
mod status;

pub use latest::{latest_per_household, status_table, StatusRow};
pub use status::{classify, PhStatus, STATUS_GUIDE};
