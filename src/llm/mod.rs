//! Text-generation backend client and reply parsing.

pub mod client;
pub mod json;
pub mod response;

pub use client::{ChatCompletionsClient, Generator};
pub use json::{extract_json_block, parse_json_to_map, try_parse_json_to_map};
pub use response::{
    FileMessage, GenerationMode, GenerationResult, normalize_unified_message, parse_response,
};
