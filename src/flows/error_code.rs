//! Error code (DTC) troubleshooting flow

use super::FlowContext;
use super::prompts::{self, render};
use crate::conversion::response_converter::parse_json_output;
use crate::core::error::{FlowResult, require};
use crate::core::model_manager::ModelTier;
use crate::models::flows::{ErrorCodeTroubleshootingInput, ErrorCodeTroubleshootingOutput};
use crate::models::generation::OutputMode;
use serde_json::{Value, json};

fn output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "potential_causes": {
                "type": "STRING",
                "description": "A list of potential causes for the error code."
            },
            "troubleshooting_instructions": {
                "type": "STRING",
                "description": "Step-by-step troubleshooting instructions to diagnose the problem."
            }
        },
        "required": ["potential_causes", "troubleshooting_instructions"]
    })
}

/// Explain an error code for a vehicle model
pub async fn error_code_troubleshooting(
    ctx: &FlowContext,
    input: ErrorCodeTroubleshootingInput,
) -> FlowResult<ErrorCodeTroubleshootingOutput> {
    require("error_code", &input.error_code)?;
    require("vehicle_model", &input.vehicle_model)?;
    let credentials = ctx.credentials(&input.settings)?;

    let prompt = render(
        prompts::ERROR_CODE_TROUBLESHOOTING,
        &[
            ("vehicle_model", input.vehicle_model.as_str()),
            ("error_code", input.error_code.as_str()),
        ],
    );
    let request = ctx
        .request(ModelTier::Text, prompt)
        .with_output(OutputMode::Json(output_schema()));

    let response = ctx
        .generate("error_code_troubleshooting", &credentials, &request)
        .await?;

    parse_json_output(&response.text)
}
