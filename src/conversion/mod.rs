//! Conversion between the provider-neutral generation types and provider
//! wire formats, plus shaping of raw model output.

pub mod request_converter;
pub mod response_converter;
