//! Constants shared across providers and flows
//!
//! Message roles, MIME types, error type tags and the static vehicle
//! catalog offered to clients.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// Model role identifier (Gemini naming)
    pub const MODEL: &str = "model";

    /// Assistant role identifier (OpenAI naming)
    pub const ASSISTANT: &str = "assistant";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// MIME types
pub mod mime {
    /// JSON response type
    pub const APPLICATION_JSON: &str = "application/json";

    /// SVG image type
    pub const IMAGE_SVG: &str = "image/svg+xml";
}

/// Gemini response modalities
pub mod modality {
    pub const TEXT: &str = "TEXT";
    pub const IMAGE: &str = "IMAGE";
}

/// Error type tags used in JSON error bodies
pub mod error_type {
    pub const INVALID_REQUEST: &str = "invalid_request_error";
    pub const AUTHENTICATION: &str = "authentication_error";
    pub const RATE_LIMIT: &str = "rate_limit_error";
    pub const NOT_FOUND: &str = "not_found_error";
    pub const API: &str = "api_error";
}

/// Vehicle models offered in the schematic picker (value, label)
pub const VEHICLE_MODELS: &[(&str, &str)] = &[
    ("komatsu-pc200-8", "Komatsu PC200-8"),
    ("hitachi-ex120-5", "Hitachi EX120-5"),
    ("cat-320d", "Caterpillar 320D"),
    ("doosan-dx225", "Doosan DX225"),
    ("volvo-ec210", "Volvo EC210"),
];

/// Diagram types offered in the schematic picker (value, label)
pub const DIAGRAM_TYPES: &[(&str, &str)] = &[
    ("wiring", "Sơ đồ dây"),
    ("hydraulic", "Mạch thủy lực"),
    ("parts", "Danh mục phụ tùng"),
];
