//! Transport-facing shapes: request/response DTOs and the error body.

pub mod dto;
pub mod error;
