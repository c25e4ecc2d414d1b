use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "heartwave")]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Valentine's text art: orbiting hearts, a rolling wave and falling droplets", long_about = None)]
pub(crate) struct Cli {
    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long, global = true)]
    pub(crate) log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten)]
    pub(crate) play: PlayArgs,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run the animation (default)
    Play(PlayArgs),
    /// Generate the default screen, heart and marquee canvases
    Forge {
        /// Directory to write the .img files into
        #[arg(long, default_value = "assets")]
        out: PathBuf,
        #[arg(long, default_value_t = 80)]
        width: u16,
        #[arg(long, default_value_t = 40)]
        height: u16,
        /// Seed for the background starfield
        #[arg(long, default_value_t = 2022)]
        seed: u64,
    },
    /// Print the mask and glyph grids of a canvas file
    Inspect { file: PathBuf },
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct PlayArgs {
    /// JSON settings file; flags below override it
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Directory holding screen.img, heart.img and marquee.img
    #[arg(long)]
    pub(crate) assets: Option<PathBuf>,

    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// Number of falling droplets
    #[arg(long)]
    pub(crate) droplets: Option<usize>,

    #[arg(long)]
    pub(crate) radius: Option<f32>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Stop after this many frames even without a key press
    #[arg(long)]
    pub(crate) frames: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps: u32,
    pub(crate) heart_radius: f32,
    pub(crate) droplets: usize,
    pub(crate) wave_rows: u16,
    pub(crate) heart_a: (u16, u16),
    pub(crate) heart_b: (u16, u16),
    pub(crate) assets: PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 15,
            heart_radius: 10.0,
            droplets: 50,
            wave_rows: 15,
            heart_a: (5, 30),
            heart_b: (1, 50),
            assets: PathBuf::from("assets"),
            seed: None,
            max_frames: None,
        }
    }
}

impl Settings {
    pub(crate) fn resolve(args: &PlayArgs) -> Self {
        let mut s = match &args.config {
            Some(path) => load_settings(path),
            None => Settings::default(),
        };
        if let Some(v) = &args.assets {
            s.assets = v.clone();
        }
        if let Some(v) = args.fps {
            s.fps = v;
        }
        if let Some(v) = args.droplets {
            s.droplets = v;
        }
        if let Some(v) = args.radius {
            s.heart_radius = v;
        }
        if args.seed.is_some() {
            s.seed = args.seed;
        }
        if args.frames.is_some() {
            s.max_frames = args.frames;
        }
        s.fps = s.fps.clamp(1, 120);
        s
    }
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring malformed settings"),
        },
        Err(e) => warn!(path = %path.display(), error = %e, "settings not readable, using defaults"),
    }
    Settings::default()
}
