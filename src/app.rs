use crate::assets;
use crate::canvas::Canvas;
use crate::config::{Cli, Command, PlayArgs, Settings};
use crate::geometry::Area;
use crate::logging;
use crate::scene::{FramePacer, Scene};
use crate::terminal::{key_pressed, Terminal};
use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, Write};
use tracing::{info, trace};

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    match cli.command {
        None => play(&cli.play),
        Some(Command::Play(args)) => play(&args),
        Some(Command::Forge {
            out,
            width,
            height,
            seed,
        }) => assets::forge(&out, Area::new(width, height), seed),
        Some(Command::Inspect { file }) => {
            let canvas = Canvas::open(&file).with_context(|| format!("loading {}", file.display()))?;
            let mut out = io::stdout().lock();
            writeln!(out, "{}: {}x{}", file.display(), canvas.area().width(), canvas.area().height())?;
            canvas.dump(&mut out)?;
            Ok(())
        }
    }
}

fn play(args: &PlayArgs) -> Result<()> {
    let settings = Settings::resolve(args);
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (screen, heart, marquee) = assets::load(&settings.assets)?;
    let mut scene = Scene::new(screen, heart, marquee, &settings, &mut rng)?;
    info!(?settings, "starting animation");

    let mut term = Terminal::begin()?;
    let result = animate(&mut scene, &mut term, &settings, &mut rng);
    term.end()?;

    if let Ok(frames) = &result {
        info!(frames, "animation stopped");
    }
    result.map(|_| ())
}

fn animate(scene: &mut Scene, term: &mut Terminal, settings: &Settings, rng: &mut StdRng) -> Result<u64> {
    let mut pacer = FramePacer::new(settings.fps);
    let mut frames = 0u64;
    loop {
        pacer.begin();

        scene.advance(rng)?;
        scene.composite()?;
        scene.render(&mut term.out)?;

        trace!(frame = frames, hearts = ?scene.heart_positions(), "frame drawn");
        pacer.wait();
        scene.restore()?;

        frames += 1;
        if settings.max_frames.is_some_and(|max| frames >= max) || key_pressed()? {
            return Ok(frames);
        }
    }
}
