//! Domain types for fitplan

mod plan_request;

pub use plan_request::{AGE_RANGE, Gender, PlanRequest, WEEKS_RANGE, WEIGHT_RANGE_KG};
