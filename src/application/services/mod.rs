//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (HttpTransport)
//! but are themselves concrete structs, not traits.

mod campaign;

pub use campaign::{CampaignDetail, CampaignService, ADD_PATH, DETAIL_PATH};
