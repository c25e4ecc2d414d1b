mod app;
mod assets;
mod canvas;
mod config;
mod droplet;
mod geometry;
mod logging;
mod oscillator;
mod scene;
mod terminal;
mod wave;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
