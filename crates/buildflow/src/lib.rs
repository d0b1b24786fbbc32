//! Engine powering multi-step construction review workflows: scored
//! constructability, permit/inspection, and constraint logs with a generic
//! list query engine and derived dashboards.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
