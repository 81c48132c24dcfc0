pub mod payload;

pub use payload::{extract_json_payload, json_payload_candidates};
