//! Subcommand implementations; each returns the text to print

use crate::cli::{Command, Settings};
use anyhow::{Context, Result, bail};
use shape_codec_lib::measure::{format_area, geodesic_area};
use shape_codec_lib::{
    Format, Geometry, GeometryKind, ShapeCodec, bounds_of, supported_formats, union_bounds,
};
use std::io::Read;
use std::path::Path;

/// Run the selected subcommand
pub fn run(settings: &Settings) -> Result<String> {
    let codec = settings.codec();

    match &settings.command {
        Command::Convert {
            from,
            from_crs,
            to,
            to_crs,
            text,
        } => {
            let input = read_text(text.as_deref())?;
            convert(
                &codec,
                &input,
                *from,
                from_crs,
                *to,
                to_crs.as_deref().unwrap_or(from_crs),
            )
        }
        Command::Formats { kind } => Ok(formats(*kind)),
        Command::Bounds {
            format,
            crs,
            output_crs,
            file,
        } => {
            let input = read_file(file.as_deref())?;
            bounds(
                &codec,
                &input,
                *format,
                crs,
                output_crs.as_deref().unwrap_or(crs),
            )
        }
        Command::Area { format, crs, text } => {
            let input = read_text(text.as_deref())?;
            area(&codec, &input, *format, crs)
        }
    }
}

/// Decode in one format/CRS and encode in another
///
/// Asking for `bbox` output writes the bounding box of the decoded shape.
pub fn convert(
    codec: &ShapeCodec,
    text: &str,
    from: Format,
    from_crs: &str,
    to: Format,
    to_crs: &str,
) -> Result<String> {
    let geometry = codec
        .decode(text, from, from_crs)
        .with_context(|| format!("Failed to read {} input in {from_crs}", from.label()))?;

    let geometry = match (to, &geometry) {
        (Format::BBox, Geometry::Ring(_) | Geometry::Circle(_)) => {
            Geometry::BoundingBox(bounds_of(&geometry))
        }
        _ => geometry,
    };

    codec
        .encode(&geometry, to, to_crs)
        .with_context(|| format!("Failed to write {} output in {to_crs}", to.label()))
}

/// Supported formats of a geometry kind, one per line
pub fn formats(kind: GeometryKind) -> String {
    supported_formats(kind)
        .iter()
        .map(|f| format!("{}\t{}", f.as_str(), f.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Union bounding box of one shape per non-empty line
pub fn bounds(
    codec: &ShapeCodec,
    input: &str,
    format: Format,
    crs: &str,
    output_crs: &str,
) -> Result<String> {
    let shapes = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            codec
                .decode(line, format, crs)
                .with_context(|| format!("Line {}: not a valid {} shape", i + 1, format.label()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Computing bounds of {} shapes", shapes.len());
    let bbox = union_bounds(&shapes)?;
    codec
        .encode(&Geometry::BoundingBox(bbox), Format::BBox, output_crs)
        .with_context(|| format!("Failed to write bounding box in {output_crs}"))
}

/// Geodesic area of a polygon-like shape
pub fn area(codec: &ShapeCodec, text: &str, format: Format, crs: &str) -> Result<String> {
    let geometry = codec
        .decode(text, format, crs)
        .with_context(|| format!("Failed to read {} input in {crs}", format.label()))?;

    match geodesic_area(&geometry) {
        Some(area) => Ok(format_area(area)),
        None => bail!("{} geometries have no area", geometry.kind()),
    }
}

fn read_text(text: Option<&str>) -> Result<String> {
    match text {
        Some(text) => Ok(text.to_string()),
        None => read_stdin(),
    }
}

fn read_file(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => read_stdin(),
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read standard input")?;
    Ok(buffer)
}
