//! vatbake - Bake the animations of a skinned glTF model into vertex animation textures
//!
//! ```bash
//! vatbake models/robot.glb
//! ```
//!
//! Writes `<output>/VATExportData/<model>/` with one position, normal and
//! tangent texture plus one material per clip, the merged mesh, and the
//! baked object. Settings are read from `~/.config/vatbake/settings.toml`.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use vat_assets::{load_rig, DirectoryStore};
use vat_bake::{bake_object, CancelToken};
use vat_playback::RigPlayer;

use settings::Settings;

#[derive(Parser)]
#[command(name = "vatbake")]
#[command(about = "Bake glTF skeletal animations into vertex animation textures", long_about = None)]
struct Cli {
    /// Skinned model to bake (.glb or .gltf)
    model: PathBuf,

    /// Output directory, overriding the settings file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (settings, loaded) = Settings::load();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.logging.level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    loaded.log();

    let rig = load_rig(&cli.model)
        .with_context(|| format!("Failed to load model {}", cli.model.display()))?;
    info!(
        "Loaded '{}': {} parts, {} clips",
        rig.name,
        rig.parts.len(),
        rig.animations.len()
    );

    let output = cli.output.unwrap_or_else(|| settings.output.directory.clone());
    let mut store = DirectoryStore::new(&output);
    let mut player = RigPlayer::new(&rig);
    let config = settings.bake_config();

    let baked = bake_object(
        &rig.name,
        &rig.mesh_parts(),
        &rig.clips(),
        &mut player,
        &mut store,
        &config,
        CancelToken::new(),
    )
    .with_context(|| format!("Failed to bake '{}'", rig.name))?;

    for failure in &baked.report.skipped {
        info!("Skipped '{}': {}", failure.clip, failure.error);
    }
    info!(
        "Wrote '{}' with {} animations to {}",
        baked.object.name,
        baked.report.animations.len(),
        output.join(baked.folders.bake.path()).display()
    );
    Ok(())
}
