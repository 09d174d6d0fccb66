mod app;
mod brush;
mod color;
mod config;
mod data;
mod error;
mod layout;
mod scale;
mod splom;
mod state;
mod svg;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::RustySplomApp;
use clap::Parser;
use config::SplomConfig;
use eframe::egui;
use state::AppState;

/// Scatterplot matrix viewer with linked brushing.
///
/// Opens a window by default; `--svg` writes the matrix to a file instead.
#[derive(Debug, Parser)]
#[command(name = "rusty-splom", version, about)]
struct Args {
    /// Table to plot (.csv, .json, .parquet)
    data: Option<PathBuf>,
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write an SVG to this path and exit without opening a window
    #[arg(long, requires = "data")]
    svg: Option<PathBuf>,
}

/// Load, build and write the matrix without opening a window.
fn export(data: &std::path::Path, config: &SplomConfig, out: &std::path::Path) -> Result<()> {
    let dataset = data::loader::load_file(data)
        .with_context(|| format!("failed to load '{}'", data.display()))?;
    let splom = splom::Splom::build(&dataset, config)?;
    let view = brush::ViewModel::new(splom.row_count());
    svg::write_svg(&splom, &view, out)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SplomConfig::load(path)?,
        None => SplomConfig::default(),
    };

    if let (Some(out), Some(data)) = (&args.svg, &args.data) {
        return export(data, &config, out);
    }

    let mut state = AppState::new(config);
    if let Some(path) = &args.data {
        state.load_path(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty SPLOM – Scatterplot Matrix",
        options,
        Box::new(|_cc| Ok(Box::new(RustySplomApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("rusty-splom").chain(v.iter().copied()))
    }

    #[test]
    fn parses_data_config_and_svg() {
        let a = args(&["iris.csv", "--config", "c.json", "--svg", "out/m.svg"]).unwrap();
        assert_eq!(a.data, Some(PathBuf::from("iris.csv")));
        assert_eq!(a.config, Some(PathBuf::from("c.json")));
        assert_eq!(a.svg, Some(PathBuf::from("out/m.svg")));
    }

    #[test]
    fn no_args_opens_empty_window() {
        let a = args(&[]).unwrap();
        assert!(a.data.is_none() && a.config.is_none() && a.svg.is_none());
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["--svg"]).is_err());
        assert!(args(&["a.csv", "b.csv"]).is_err());
    }

    #[test]
    fn svg_export_requires_a_data_file() {
        assert!(args(&["--svg", "out.svg"]).is_err());
    }

    #[test]
    fn help_is_a_display_request_not_a_failure() {
        let err = args(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("--svg"));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn headless_export_writes_svg() {
        let dir = std::env::temp_dir().join("rusty_splom_main_test");
        std::fs::create_dir_all(&dir).unwrap();
        let data = dir.join("iris.csv");
        std::fs::write(
            &data,
            "sepal length,sepal width,species\n5.1,3.5,setosa\n7.0,3.2,versicolor\n",
        )
        .unwrap();
        let out = dir.join("splom.svg");
        export(&data, &SplomConfig::default(), &out).unwrap();
        let svg = std::fs::read_to_string(&out).unwrap();
        assert_eq!(svg.matches("class=\"cell\"").count(), 4);
        std::fs::remove_dir_all(&dir).ok();
    }
}
