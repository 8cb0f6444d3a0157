use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use digitpad::{PadConfig, DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_SIZE, MODEL_INPUT_SIDE};

const DEFAULT_MODEL_PATH: &str = "static/mnist.onnx";

/// Settings collected from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model: PathBuf,
    pub brush_size: u32,
    pub canvas_size: u32,
    /// Apply softmax to the raw model output (for models exported without it).
    pub softmax: bool,
    /// Initial content of the save-path field.
    pub save_path: String,
}

impl AppConfig {
    pub fn from_args() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            model: matches
                .get_one::<PathBuf>("model")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            brush_size: matches
                .get_one::<u32>("brush-size")
                .copied()
                .unwrap_or(DEFAULT_BRUSH_SIZE),
            canvas_size: matches
                .get_one::<u32>("canvas-size")
                .copied()
                .unwrap_or(DEFAULT_CANVAS_SIZE),
            softmax: matches.get_flag("softmax"),
            save_path: matches
                .get_one::<String>("save-path")
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn pad_config(&self) -> PadConfig {
        PadConfig {
            canvas_width: self.canvas_size,
            canvas_height: self.canvas_size,
            brush_size: self.brush_size,
        }
    }
}

fn command() -> Command {
    Command::new("digitpad")
        .about("Draw a digit and let an MNIST model recognize it")
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("FILE")
                .help("Path of the ONNX model")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_MODEL_PATH),
        )
        .arg(
            Arg::new("brush-size")
                .short('b')
                .long("brush-size")
                .value_name("PX")
                .help("Brush diameter in pixels [default: 20]")
                .value_parser(value_parser!(u32).range(1..=100)),
        )
        .arg(
            Arg::new("canvas-size")
                .long("canvas-size")
                .value_name("PX")
                .help("Side length of the square drawing canvas [default: 280]")
                .value_parser(value_parser!(u32).range(MODEL_INPUT_SIDE as i64..=1024)),
        )
        .arg(
            Arg::new("softmax")
                .long("softmax")
                .help("Apply softmax to the model output (for models that emit logits)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-path")
                .short('o')
                .long("save-path")
                .value_name("FILE")
                .help("Pre-fill the path used by the Save button"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let argv = std::iter::once("digitpad").chain(args.iter().copied());
        let matches = command().get_matches_from(argv);
        AppConfig::from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.model, PathBuf::from("static/mnist.onnx"));
        assert_eq!(config.pad_config(), PadConfig::default());
        assert!(!config.softmax);
        assert!(config.save_path.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "-m",
            "model.onnx",
            "--brush-size",
            "12",
            "--canvas-size",
            "560",
            "--softmax",
            "-o",
            "out.png",
        ]);
        assert_eq!(config.model, PathBuf::from("model.onnx"));
        assert_eq!(config.brush_size, 12);
        assert_eq!(config.canvas_size, 560);
        assert!(config.softmax);
        assert_eq!(config.save_path, "out.png");
    }

    #[test]
    fn test_rejects_zero_brush() {
        let result = command().try_get_matches_from(["digitpad", "--brush-size", "0"]);
        assert!(result.is_err());
    }
}
