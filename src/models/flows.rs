//! Request and response bodies of the flow endpoints

use serde::{Deserialize, Serialize};

use crate::models::generation::ChatMessage;

/// Per-request backend settings a client may send along with any flow
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Alternative base URL, e.g. a proxy in front of the backend
    #[serde(default)]
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorCodeTroubleshootingInput {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(flatten)]
    pub settings: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCodeTroubleshootingOutput {
    #[serde(alias = "potentialCauses")]
    pub potential_causes: String,
    #[serde(alias = "troubleshootingInstructions")]
    pub troubleshooting_instructions: String,
}

/// Input of the chatbot and guided diagnostic flows
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationInput {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub settings: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationReply {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElectricalAnalysisInput {
    #[serde(default)]
    pub electrical_issue_description: String,
    #[serde(flatten)]
    pub settings: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricalAnalysisOutput {
    #[serde(alias = "relatedDiagramName")]
    pub related_diagram_name: String,
    #[serde(alias = "componentLocations")]
    pub component_locations: String,
    #[serde(alias = "diagnosticSteps")]
    pub diagnostic_steps: String,
    #[serde(default, alias = "svgDiagram", skip_serializing_if = "Option::is_none")]
    pub svg_diagram: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchematicInput {
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub diagram_type: String,
    #[serde(flatten)]
    pub settings: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchematicOutput {
    pub image_data_uri: String,
}

/// Kind of technical data a client asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalDataRequestType {
    WiringDiagram,
    HydraulicCircuit,
    PartsCatalog,
    Specifications,
    MaintenanceSchedule,
    ErrorCodeLookup,
    ComponentIllustration,
}

/// Shape of the content returned for a technical data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Svg,
    Markdown,
    Image,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TechnicalDataInput {
    #[serde(default)]
    pub vehicle_model: String,
    pub request_type: TechnicalDataRequestType,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(flatten)]
    pub settings: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalDataOutput {
    pub request_type: TechnicalDataRequestType,
    pub format: OutputFormat,
    /// SVG markup, markdown text or an image data URI depending on `format`
    pub content: String,
    /// Data URI form of SVG content, for direct use as an image source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
}
