use std::path::PathBuf;

use clap::Parser;
use glade_ngin::{
    flow::{self, RunOptions},
    scene::SceneConfig,
};

/// Headless meadow scene runner
#[derive(Parser, Debug)]
#[command(name = "glade")]
#[command(about = "Builds the procedural meadow and draws it for a number of frames")]
struct Args {
    /// Number of frames to draw
    #[arg(default_value_t = 60)]
    frames: usize,

    /// Seed of the scene generator, random when omitted
    seed: Option<u64>,

    /// Directory the textures are loaded from
    #[arg(long, env = "GLADE_ASSETS")]
    assets: Option<PathBuf>,

    /// OBJ model of the skull props
    #[arg(long, env = "GLADE_SKULL")]
    skull: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> SceneConfig {
        SceneConfig {
            asset_root: self.assets.clone(),
            skull_mesh: self.skull.clone(),
            ..Default::default()
        }
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            frames: self.frames,
            seed: self.seed,
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let stats = flow::run(args.config(), args.options())?;
    println!(
        "{} frames, {} draw calls in {} batches per frame",
        stats.frames, stats.draw_calls, stats.batches
    );
    Ok(())
}
