//! `camcal` command line: calibrate cameras from image files and apply the
//! stored calibrations.
//!
//! Calibrations are kept in a snapshot JSON file (`--store`), which every
//! subcommand loads first if it exists.

use std::error::Error;
use std::path::{Path, PathBuf};

use camcal::convert::{from_image, to_image};
use camcal::{CalibrationConfig, CalibrationEngine, CalibrationSnapshot, PatternKind, RgbImage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "camcal", version, about = "Multi-camera calibration")]
struct Cli {
    /// Engine configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Snapshot JSON holding the stored calibrations.
    #[arg(long, global = true, default_value = "camcal.json")]
    store: PathBuf,

    /// Log verbosity.
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PatternArg {
    Chessboard,
    CirclesGrid,
    AsymmetricCircles,
    ColorChecker,
}

impl From<PatternArg> for PatternKind {
    fn from(p: PatternArg) -> Self {
        match p {
            PatternArg::Chessboard => PatternKind::Chessboard,
            PatternArg::CirclesGrid => PatternKind::CirclesGrid,
            PatternArg::AsymmetricCircles => PatternKind::AsymmetricCircles,
            PatternArg::ColorChecker => PatternKind::ColorChecker,
        }
    }
}

#[derive(Args, Debug)]
struct CorrectArgs {
    #[arg(long)]
    camera_id: String,
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calibrate a single camera.
    Calibrate {
        #[arg(long)]
        camera_id: String,
        #[arg(long, value_enum, default_value = "chessboard")]
        pattern: PatternArg,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Calibrate a camera pair.
    Stereo {
        #[arg(long)]
        left_id: String,
        #[arg(long)]
        right_id: String,
        #[arg(long, value_enum, default_value = "chessboard")]
        pattern: PatternArg,
        #[arg(long, num_args = 1.., required = true)]
        left: Vec<PathBuf>,
        #[arg(long, num_args = 1.., required = true)]
        right: Vec<PathBuf>,
    },
    /// Undistort one image with a stored calibration.
    Undistort(CorrectArgs),
    /// Color-correct one image with a stored calibration.
    ColorCorrect(CorrectArgs),
}

fn load_rgb(path: &Path) -> Result<RgbImage, Box<dyn Error>> {
    let img = image::ImageReader::open(path)?.decode()?.to_rgb8();
    Ok(from_image(&img))
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<RgbImage>, Box<dyn Error>> {
    paths.iter().map(|p| load_rgb(p)).collect()
}

fn save_rgb(img: &RgbImage, path: &Path) -> Result<(), Box<dyn Error>> {
    let out = to_image(img).ok_or("image too large to encode")?;
    out.save(path)?;
    Ok(())
}

fn save_store(engine: &CalibrationEngine, path: &Path) -> Result<(), Box<dyn Error>> {
    engine.export_calibration_data().write_json(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn correct(
    engine: &CalibrationEngine,
    args: &CorrectArgs,
    undistort: bool,
) -> Result<(), Box<dyn Error>> {
    let img = load_rgb(&args.input)?;
    let task = if undistort {
        engine.undistort(&img, &args.camera_id)
    } else {
        engine.color_correct(&img, &args.camera_id)
    };
    let out = task.wait().unwrap_or_else(|| {
        log::warn!("{}: not calibrated, writing input unchanged", args.camera_id);
        img
    });
    save_rgb(&out, &args.output)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    camcal::init_with_level(cli.log_level)?;

    let config = match &cli.config {
        Some(path) => CalibrationConfig::load_json(path)?,
        None => CalibrationConfig::default(),
    };
    let engine = CalibrationEngine::new(config)?;
    if cli.store.exists() {
        engine.import_calibration_data(CalibrationSnapshot::load_json(&cli.store)?);
    }

    match &cli.command {
        Command::Calibrate {
            camera_id,
            pattern,
            images,
        } => {
            let frames = load_all(images)?;
            let record = engine
                .calibrate_single_camera(camera_id, frames, (*pattern).into())
                .wait()
                .ok_or_else(|| format!("calibration of {camera_id} failed"))?;
            println!("{camera_id}: quality {:.2}", record.quality_score);
            save_store(&engine, &cli.store)
        }
        Command::Stereo {
            left_id,
            right_id,
            pattern,
            left,
            right,
        } => {
            let task = engine.calibrate_stereo_camera(
                left_id,
                right_id,
                load_all(left)?,
                load_all(right)?,
                (*pattern).into(),
            );
            let record = task
                .wait()
                .ok_or_else(|| format!("stereo calibration of {left_id}/{right_id} failed"))?;
            println!(
                "{left_id}/{right_id}: baseline {:.1} mm, rectification {:.2}",
                record.extrinsics.baseline_mm, record.rectification_quality
            );
            save_store(&engine, &cli.store)
        }
        Command::Undistort(args) => correct(&engine, args, true),
        Command::ColorCorrect(args) => correct(&engine, args, false),
    }
}
