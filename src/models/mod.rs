//! API data models
//!
//! Flow request/response bodies, the provider-neutral generation types and
//! the wire formats of the supported backends.

pub mod flows;
pub mod gemini;
pub mod generation;
pub mod maintenance;
pub mod openai;
