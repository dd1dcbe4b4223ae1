pub mod json_api;

pub use json_api::{simulate_json, simulate_request, SimulationRequest, SimulationResponse};
