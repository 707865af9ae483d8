//! Electrical system analysis flow

use super::FlowContext;
use super::prompts::{self, render};
use crate::conversion::response_converter::{extract_svg, parse_json_output};
use crate::core::error::{FlowResult, require};
use crate::core::model_manager::ModelTier;
use crate::models::flows::{ElectricalAnalysisInput, ElectricalAnalysisOutput};
use crate::models::generation::OutputMode;
use serde_json::{Value, json};
use tracing::warn;

fn output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "related_diagram_name": {
                "type": "STRING",
                "description": "The name of the relevant electrical circuit diagram (e.g., Starting Circuit Diagram, ECU Power Diagram)."
            },
            "component_locations": {
                "type": "STRING",
                "description": "A list of relevant components to check, like connectors, fuses, and relays, formatted as a Markdown list."
            },
            "diagnostic_steps": {
                "type": "STRING",
                "description": "A suggested sequence of diagnostic steps, from easy to hard, formatted as a Markdown ordered list."
            },
            "svg_diagram": {
                "type": "STRING",
                "description": "A valid, detailed SVG string of the relevant electrical circuit. If unable to generate, this field can be omitted."
            }
        },
        "required": ["related_diagram_name", "component_locations", "diagnostic_steps"]
    })
}

/// Analyze an electrical issue and suggest where and how to measure
///
/// An `svg_diagram` without a complete `<svg>` element is dropped rather
/// than failing the whole analysis.
pub async fn analyze_electrical_system(
    ctx: &FlowContext,
    input: ElectricalAnalysisInput,
) -> FlowResult<ElectricalAnalysisOutput> {
    require("electrical_issue_description", &input.electrical_issue_description)?;
    let credentials = ctx.credentials(&input.settings)?;

    let prompt = render(
        prompts::ELECTRICAL_ANALYSIS,
        &[("description", input.electrical_issue_description.as_str())],
    );
    let request = ctx
        .request(ModelTier::Text, prompt)
        .with_output(OutputMode::Json(output_schema()));

    let response = ctx
        .generate("electrical_analysis", &credentials, &request)
        .await?;

    let mut output: ElectricalAnalysisOutput = parse_json_output(&response.text)?;
    output.svg_diagram = output.svg_diagram.and_then(|raw| match extract_svg(&raw) {
        Some(svg) => Some(svg.to_string()),
        None => {
            if !raw.trim().is_empty() {
                warn!("Dropping svg_diagram without a complete <svg> element");
            }
            None
        }
    });

    Ok(output)
}
