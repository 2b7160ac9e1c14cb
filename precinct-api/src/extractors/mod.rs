//! Request extractors that reject with the API error envelope.

mod json_body;
mod path_id;

pub use json_body::JsonBody;
pub use path_id::PathId;
