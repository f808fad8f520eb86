use clap::Parser;
use loopalign::io::{collect_folder_images, FileLoader, GifWriter};
use loopalign::{
    generate, parse_ratio, AlignOptions, CropBranch, LoopReport, Point, RequestBuilder, Rounding,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Align photos on a marked point and write a ping-pong GIF")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RoundingConfig {
    #[default]
    TiesToEven,
    TiesAwayFromZero,
}

impl From<RoundingConfig> for Rounding {
    fn from(value: RoundingConfig) -> Self {
        match value {
            RoundingConfig::TiesToEven => Rounding::TiesToEven,
            RoundingConfig::TiesAwayFromZero => Rounding::TiesAwayFromZero,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatioConfig {
    Number(f64),
    Text(String),
}

impl RatioConfig {
    fn resolve(&self) -> Result<f64, loopalign::LoopAlignError> {
        match self {
            RatioConfig::Number(value) => Ok(*value),
            RatioConfig::Text(text) => parse_ratio(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageConfig {
    path: String,
    point: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    /// Played in listed order; only `folder` sorts by modification time.
    images: Vec<ImageConfig>,
    folder: Option<String>,
    points: Vec<[f64; 2]>,
    rotate: bool,
    ratio: RatioConfig,
    frame_duration_ms: u32,
    rounding: RoundingConfig,
    min_points: usize,
    gif_speed: i32,
    output_dir: Option<String>,
    output_path: Option<String>,
    report_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let options = AlignOptions::default();
        Self {
            images: Vec::new(),
            folder: None,
            points: Vec::new(),
            rotate: options.rotate,
            ratio: RatioConfig::Text("16:9".to_string()),
            frame_duration_ms: options.frame_duration_ms,
            rounding: RoundingConfig::default(),
            min_points: options.min_points_for_generation,
            gif_speed: GifWriter::default().speed,
            output_dir: None,
            output_path: None,
            report_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CropRecord {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
    branch: &'static str,
}

#[derive(Debug, Serialize)]
struct Output {
    output_path: String,
    frame_count: usize,
    frame_width: usize,
    frame_height: usize,
    reference: [f64; 2],
    translations: Vec<[i64; 2]>,
    crop: CropRecord,
}

impl From<LoopReport> for Output {
    fn from(report: LoopReport) -> Self {
        let rect = report.window.rect;
        Self {
            output_path: report.output_path.display().to_string(),
            frame_count: report.frame_count,
            frame_width: report.frame_size.0,
            frame_height: report.frame_size.1,
            reference: [report.reference.x, report.reference.y],
            translations: report.translations.iter().map(|t| [t.dx, t.dy]).collect(),
            crop: CropRecord {
                top: rect.top,
                left: rect.left,
                bottom: rect.bottom,
                right: rect.right,
                branch: match report.window.branch {
                    CropBranch::WidthConstrained => "width_constrained",
                    CropBranch::HeightConstrained => "height_constrained",
                },
            },
        }
    }
}

fn timestamped_output(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("generated_{stamp}.gif"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("loopalign=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;

    let options = AlignOptions {
        rotate: config.rotate,
        ratio: config.ratio.resolve()?,
        frame_duration_ms: config.frame_duration_ms,
        rounding: config.rounding.into(),
        min_points_for_generation: config.min_points,
    };
    options.validate()?;

    let mut builder = RequestBuilder::new().with_options(options);
    let points: Vec<[f64; 2]> = match &config.folder {
        Some(folder) => {
            if !config.images.is_empty() {
                return Err("set either images or folder, not both".into());
            }
            builder.push_images(collect_folder_images(folder)?)?;
            config.points.clone()
        }
        None => {
            builder.push_images(config.images.iter().map(|img| PathBuf::from(&img.path)))?;
            config.images.iter().map(|img| img.point).collect()
        }
    };
    if points.len() != builder.len() {
        return Err(format!(
            "{} images but {} points were configured",
            builder.len(),
            points.len()
        )
        .into());
    }
    for (index, [x, y]) in points.into_iter().enumerate() {
        builder.set_point(index, Point::new(x, y))?;
    }
    if !builder.can_generate() {
        return Err(format!(
            "need a point on every image and at least {} points to generate",
            config.min_points
        )
        .into());
    }

    let output_path = match (&config.output_path, &config.output_dir, &config.folder) {
        (Some(path), _, _) => PathBuf::from(path),
        (None, Some(dir), _) | (None, None, Some(dir)) => timestamped_output(Path::new(dir)),
        (None, None, None) => timestamped_output(Path::new(".")),
    };

    let request = builder.build()?;
    let writer = GifWriter {
        speed: config.gif_speed,
    };
    let report = generate(&request, &FileLoader, &writer, &output_path)?;
    let json = serde_json::to_string_pretty(&Output::from(report))?;

    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Config, EXAMPLE_JSON, SCHEMA_JSON};

    #[test]
    fn example_config_parses() {
        let config: Config = serde_json::from_str(EXAMPLE_JSON).unwrap();
        assert!(!config.images.is_empty() || config.folder.is_some());
    }

    #[test]
    fn schema_states_image_order() {
        let schema: serde_json::Value = serde_json::from_str(SCHEMA_JSON).unwrap();
        let images = schema["properties"]["images"]["description"]
            .as_str()
            .unwrap();
        assert!(images.contains("order listed"));
        let folder = schema["properties"]["folder"]["description"]
            .as_str()
            .unwrap();
        assert!(folder.contains("newest first"));
    }
}
