//! Schematic image generation flow

use super::FlowContext;
use super::prompts::{self, render};
use crate::core::error::{FlowError, FlowResult, require};
use crate::core::model_manager::ModelTier;
use crate::models::flows::{SchematicInput, SchematicOutput};
use crate::models::generation::OutputMode;

/// Generate a technical line drawing of the requested diagram
pub async fn generate_schematic(
    ctx: &FlowContext,
    input: SchematicInput,
) -> FlowResult<SchematicOutput> {
    require("vehicle_model", &input.vehicle_model)?;
    require("diagram_type", &input.diagram_type)?;
    let credentials = ctx.credentials(&input.settings)?;

    let prompt = render(
        prompts::SCHEMATIC,
        &[
            ("diagram_type", input.diagram_type.as_str()),
            ("vehicle_model", input.vehicle_model.as_str()),
        ],
    );
    let request = ctx
        .request(ModelTier::Image, prompt)
        .with_output(OutputMode::TextAndImage);

    let response = ctx.generate("schematic", &credentials, &request).await?;

    let media = response.media.ok_or(FlowError::ImageGenerationFailed)?;
    Ok(SchematicOutput {
        image_data_uri: media.data_uri,
    })
}
