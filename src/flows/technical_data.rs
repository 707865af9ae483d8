//! Technical data dispatcher
//!
//! A static table decides, per request type, which output shape the client
//! gets (SVG, markdown or image), which model tier produces it and which
//! prompt template is used.

use super::FlowContext;
use super::prompts::{self, render};
use crate::conversion::response_converter::{extract_svg, strip_code_fence, svg_data_uri};
use crate::core::error::{FlowError, FlowResult, require};
use crate::core::model_manager::ModelTier;
use crate::models::flows::{
    OutputFormat, TechnicalDataInput, TechnicalDataOutput, TechnicalDataRequestType,
};
use crate::models::generation::OutputMode;

/// How a request type is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechnicalDataRoute {
    pub format: OutputFormat,
    pub tier: ModelTier,
    pub template: &'static str,
    pub requires_error_code: bool,
}

const fn route(format: OutputFormat, template: &'static str) -> TechnicalDataRoute {
    TechnicalDataRoute {
        format,
        tier: match format {
            OutputFormat::Image => ModelTier::Image,
            OutputFormat::Svg | OutputFormat::Markdown => ModelTier::Text,
        },
        template,
        requires_error_code: false,
    }
}

/// Look up the route for a request type
pub fn route_for(request_type: TechnicalDataRequestType) -> TechnicalDataRoute {
    use TechnicalDataRequestType::*;

    match request_type {
        WiringDiagram => route(OutputFormat::Svg, prompts::TECHNICAL_WIRING_DIAGRAM),
        HydraulicCircuit => route(OutputFormat::Svg, prompts::TECHNICAL_HYDRAULIC_CIRCUIT),
        PartsCatalog => route(OutputFormat::Markdown, prompts::TECHNICAL_PARTS_CATALOG),
        Specifications => route(OutputFormat::Markdown, prompts::TECHNICAL_SPECIFICATIONS),
        MaintenanceSchedule => {
            route(OutputFormat::Markdown, prompts::TECHNICAL_MAINTENANCE_SCHEDULE)
        }
        ErrorCodeLookup => TechnicalDataRoute {
            requires_error_code: true,
            ..route(OutputFormat::Markdown, prompts::TECHNICAL_ERROR_CODE_LOOKUP)
        },
        ComponentIllustration => {
            route(OutputFormat::Image, prompts::TECHNICAL_COMPONENT_ILLUSTRATION)
        }
    }
}

/// Produce technical data for a vehicle in the shape its request type dictates
pub async fn technical_data(
    ctx: &FlowContext,
    input: TechnicalDataInput,
) -> FlowResult<TechnicalDataOutput> {
    let route = route_for(input.request_type);

    require("vehicle_model", &input.vehicle_model)?;
    let error_code = input.error_code.as_deref().unwrap_or_default();
    if route.requires_error_code {
        require("error_code", error_code)?;
    }
    let credentials = ctx.credentials(&input.settings)?;

    let prompt = render(
        route.template,
        &[
            ("vehicle_model", input.vehicle_model.as_str()),
            ("error_code", error_code),
        ],
    );
    let mut request = ctx.request(route.tier, prompt);
    request = match route.format {
        OutputFormat::Image => request.with_output(OutputMode::TextAndImage),
        OutputFormat::Svg | OutputFormat::Markdown => {
            request.with_system(prompts::TECHNICAL_DATA_SYSTEM)
        }
    };

    let response = ctx
        .generate("technical_data", &credentials, &request)
        .await?;

    let (content, data_uri) = match route.format {
        OutputFormat::Svg => {
            let svg = extract_svg(&response.text).ok_or_else(|| {
                FlowError::MalformedOutput("expected an <svg> element".to_string())
            })?;
            (svg.to_string(), Some(svg_data_uri(svg)))
        }
        OutputFormat::Markdown => {
            let markdown = strip_code_fence(&response.text);
            if markdown.is_empty() {
                return Err(FlowError::MalformedOutput("empty response".to_string()));
            }
            (markdown.to_string(), None)
        }
        OutputFormat::Image => {
            let media = response.media.ok_or(FlowError::ImageGenerationFailed)?;
            (media.data_uri, None)
        }
    };

    Ok(TechnicalDataOutput {
        request_type: input.request_type,
        format: route.format,
        content,
        data_uri,
    })
}
