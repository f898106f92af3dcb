use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use log::info;

use ascii_stage::{app::App, assets::frames::decode_frames, config::StageConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RUN_USAGE: &str = "ascii-stage run [assets_dir]";
const INSPECT_USAGE: &str = "ascii-stage inspect <animation.gif>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("run") => {
            init_logging(true)?;
            let mut config = StageConfig::load();
            if let Some(dir) = args.next() {
                config.assets_dir = PathBuf::from(dir);
            }
            play(config)
        }
        Some("inspect") => {
            init_logging(false)?;
            let path = args.next().context(INSPECT_USAGE)?;
            inspect(Path::new(&path))
        }
        _ => bail!(
            "ASCII Stage: sprite animation and typewriter dialog in the terminal\n\nUsage:\n  {RUN_USAGE}\n  {INSPECT_USAGE}"
        ),
    }
}

/// The interactive program owns the screen, so its log goes to a file.
fn init_logging(to_file: bool) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if to_file {
        let path = std::env::temp_dir().join("ascii-stage.log");
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn play(config: StageConfig) -> Result<()> {
    let mut app = App::open(config);
    app.run()
}

fn inspect(path: &Path) -> Result<()> {
    let config = StageConfig::load();
    let frames = decode_frames(path, config.sprite_max)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let (w, h) = frames
        .first()
        .map(|f| (f.width(), f.height()))
        .unwrap_or_default();
    info!("inspected {}", path.display());
    println!(
        "{}: {} frame(s), {w}x{h} cells at {} ms/frame",
        path.display(),
        frames.len(),
        config.animation_period_ms,
    );
    Ok(())
}
