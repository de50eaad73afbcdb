use clap::{Parser, Subcommand};
use shape_codec_lib::{
    CodecConfig, CrsRegistry, EPSG_4326, Format, GeometryKind, MAX_DECIMALS, ShapeCodec,
};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "shape-codec", author, version, about, long_about = None)]
/// Shape Codec - Convert drawn map shapes between coordinate formats and reference systems
pub struct Settings {
    /// Decimal places for every coordinate CRS (default: 6 geographic, 2 projected)
    #[arg(
        long,
        global = true,
        value_name = "N",
        value_parser = clap::value_parser!(u8).range(0..=MAX_DECIMALS as i64)
    )]
    pub decimals: Option<u8>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse a shape in one format/CRS and print it in another
    Convert {
        /// Input format (geojson, wkt, wkb, leaflet, bbox, circle)
        #[arg(long, value_name = "FORMAT")]
        from: Format,

        /// CRS of the input coordinates
        #[arg(long, value_name = "CRS", default_value = EPSG_4326)]
        from_crs: String,

        /// Output format
        #[arg(long, value_name = "FORMAT")]
        to: Format,

        /// CRS of the output coordinates (defaults to the input CRS)
        #[arg(long, value_name = "CRS")]
        to_crs: Option<String>,

        /// Shape text; read from stdin when omitted
        text: Option<String>,
    },

    /// List the formats available for a geometry kind
    Formats {
        /// polygon, circle, marker or bbox
        kind: GeometryKind,
    },

    /// Print the union bounding box of shapes given one per line
    Bounds {
        /// Format of every input line
        #[arg(long, value_name = "FORMAT")]
        format: Format,

        /// CRS of the input coordinates
        #[arg(long, value_name = "CRS", default_value = EPSG_4326)]
        crs: String,

        /// CRS of the printed bounding box (defaults to the input CRS)
        #[arg(long, value_name = "CRS")]
        output_crs: Option<String>,

        /// Input file; read from stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the geodesic area of a polygon or bounding box
    Area {
        /// Input format
        #[arg(long, value_name = "FORMAT")]
        format: Format,

        /// CRS of the input coordinates
        #[arg(long, value_name = "CRS", default_value = EPSG_4326)]
        crs: String,

        /// Shape text; read from stdin when omitted
        text: Option<String>,
    },
}

impl Settings {
    /// Codec configuration derived from the command line
    pub fn codec_config(&self) -> CodecConfig {
        match self.decimals {
            Some(decimals) => CodecConfig::default().with_decimals(usize::from(decimals)),
            None => CodecConfig::default(),
        }
    }

    pub fn codec(&self) -> ShapeCodec {
        ShapeCodec::new(CrsRegistry::default(), self.codec_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let settings = Settings::try_parse_from([
            "shape-codec",
            "convert",
            "--from",
            "wkt",
            "--to",
            "geojson",
            "--to-crs",
            "EPSG:32633",
            "POLYGON((1 2,3 4,5 6))",
        ])
        .unwrap();

        let Command::Convert {
            from,
            from_crs,
            to,
            to_crs,
            text,
        } = settings.command
        else {
            panic!("expected convert, got {:?}", settings.command);
        };
        assert_eq!(from, Format::Wkt);
        assert_eq!(from_crs, EPSG_4326);
        assert_eq!(to, Format::GeoJson);
        assert_eq!(to_crs.as_deref(), Some("EPSG:32633"));
        assert_eq!(text.as_deref(), Some("POLYGON((1 2,3 4,5 6))"));
    }

    #[test]
    fn test_global_decimals() {
        let settings =
            Settings::try_parse_from(["shape-codec", "formats", "polygon", "--decimals", "3"])
                .unwrap();
        assert_eq!(settings.decimals, Some(3u8));
        assert_eq!(settings.codec_config().geographic_decimals, 3);
        assert_eq!(settings.codec_config().projected_decimals, 3);

        let settings = Settings::try_parse_from(["shape-codec", "formats", "circle"]).unwrap();
        assert_eq!(settings.codec_config(), CodecConfig::default());
    }

    #[test]
    fn test_decimals_range() {
        let parse = |n: &str| {
            Settings::try_parse_from(["shape-codec", "--decimals", n, "formats", "marker"])
        };

        let settings = parse("17").unwrap();
        assert_eq!(settings.codec_config().projected_decimals, MAX_DECIMALS);
        assert_eq!(parse("0").unwrap().decimals, Some(0));

        for bad in ["18", "255", "70000", "-1"] {
            assert!(parse(bad).is_err(), "--decimals {bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_bounds_defaults() {
        let settings = Settings::try_parse_from(["shape-codec", "bounds", "--format", "leaflet"])
            .unwrap();
        let Command::Bounds {
            format,
            crs,
            output_crs,
            file,
        } = settings.command
        else {
            panic!("expected bounds, got {:?}", settings.command);
        };
        assert_eq!(format, Format::Leaflet);
        assert_eq!(crs, EPSG_4326);
        assert!(output_crs.is_none());
        assert!(file.is_none());
    }

    #[test]
    fn test_rejects_unknown_format_and_kind() {
        assert!(
            Settings::try_parse_from(["shape-codec", "convert", "--from", "kml", "--to", "wkt"])
                .is_err()
        );
        assert!(Settings::try_parse_from(["shape-codec", "formats", "hexagon"]).is_err());
    }

    #[test]
    fn test_convert_requires_formats() {
        assert!(Settings::try_parse_from(["shape-codec", "convert", "--from", "wkt"]).is_err());
    }
}
