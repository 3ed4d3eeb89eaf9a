//! Presentation of a solved field: streamlines, charge markers and the
//! encoded image handed to whatever hosts the solver.

pub mod streamlines;
pub mod svg;

use crate::charge::Charge;
use crate::config::RenderParams;
use crate::error::FieldResult;
use crate::solver::{GridField, SamplingRegion};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use std::fs;
use std::path::Path;
use strum_macros::Display;
use tracing::debug;

pub use streamlines::{trace_streamlines, Streamline};

/// Encoding of the rendered plot. Plots are vector SVG rather than a raster
/// PNG; both travel the same way through `to_base64` and `data_uri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Svg,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub streamline_count: usize,
}

impl RenderedImage {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime(), self.to_base64())
    }

    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> FieldResult<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Draws the field lines of `grid` and the charges that produced it.
/// Reads the physical arrays only; nothing is rescaled or recomputed.
pub fn render_plot(
    charges: &[Charge],
    region: &SamplingRegion,
    grid: &GridField,
    params: &RenderParams,
) -> FieldResult<RenderedImage> {
    params.validate()?;

    let lines = trace_streamlines(grid, charges, params.density, params.max_steps);
    debug!("Traced {} streamlines", lines.len());

    let svg = svg::render_svg(charges, &lines, region.bounds(), params);
    Ok(RenderedImage {
        format: ImageFormat::Svg,
        bytes: svg.into_bytes(),
        streamline_count: lines.len(),
    })
}
