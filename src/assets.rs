//! Built-in artwork for the three canvases the player loads at startup.

use crate::canvas::{Canvas, CanvasError, OPAQUE, TRANSPARENT};
use crate::geometry::{Area, Dimension};
use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::Path};
use tracing::info;

pub(crate) const SCREEN_FILE: &str = "screen.img";
pub(crate) const HEART_FILE: &str = "heart.img";
pub(crate) const MARQUEE_FILE: &str = "marquee.img";

pub(crate) const HEART_W: Dimension = 21;
pub(crate) const HEART_H: Dimension = 11;
const LOVE_NOTE: &str = "I love you! ";

/// Dotted frame plus a sprinkling of stars; every cell transparent.
pub(crate) fn screen(area: Area, seed: u64) -> Result<Canvas, CanvasError> {
    let mut c = Canvas::new(area, TRANSPARENT);
    let (w, h) = (area.width() as usize, area.height() as usize);
    if w < 2 || h < 2 {
        return Ok(c);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            let (g, color) = if edge {
                (if (x + y) % 2 == 0 { b'.' } else { b' ' }, 5)
            } else if rng.gen_bool(0.02) {
                (if rng.gen_bool(0.3) { b'*' } else { b'+' }, 7)
            } else {
                (b' ', 0)
            };
            c.glyphs_mut()[i] = g;
            c.colors_mut()[i] = color;
        }
    }
    Ok(c)
}

/// Heart curve `(x²+y²-1)³ - x²y³ <= 0` sampled into an opaque cut-out.
pub(crate) fn heart() -> Canvas {
    let mut c = Canvas::new(Area::new(HEART_W, HEART_H), TRANSPARENT);
    let (w, h) = (HEART_W as usize, HEART_H as usize);
    for y in 0..h {
        for x in 0..w {
            let fx = (x as f32 + 0.5) / w as f32 * 2.6 - 1.3;
            let fy = 1.3 - (y as f32 + 0.5) / h as f32 * 2.6;
            let a = fx * fx + fy * fy - 1.0;
            if a * a * a - fx * fx * fy * fy * fy <= 0.0 {
                let i = y * w + x;
                c.masks_mut()[i] = OPAQUE;
                c.glyphs_mut()[i] = b'@';
                c.colors_mut()[i] = 1;
            }
        }
    }
    c
}

pub(crate) fn marquee(area: Area) -> Result<Canvas, CanvasError> {
    let mut c = Canvas::new(area, OPAQUE);
    c.fill_with_text(LOVE_NOTE, 1)?;
    Ok(c)
}

pub(crate) fn forge(dir: &Path, area: Area, seed: u64) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let files = [
        (SCREEN_FILE, screen(area, seed)?),
        (HEART_FILE, heart()),
        (MARQUEE_FILE, marquee(area)?),
    ];
    for (name, canvas) in files {
        let path = dir.join(name);
        canvas
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), area = ?canvas.area(), "asset written");
    }
    Ok(())
}

pub(crate) fn load(dir: &Path) -> Result<(Canvas, Canvas, Canvas)> {
    let open = |name: &str| {
        let path = dir.join(name);
        Canvas::open(&path).with_context(|| {
            format!(
                "loading {} (run `heartwave forge --out {}` to create it)",
                path.display(),
                dir.display()
            )
        })
    };
    Ok((open(SCREEN_FILE)?, open(HEART_FILE)?, open(MARQUEE_FILE)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_has_a_solid_middle_and_clear_corners() {
        let h = heart();
        let w = HEART_W as usize;
        assert_eq!(h.masks()[0], TRANSPARENT);
        assert_eq!(h.masks()[w - 1], TRANSPARENT);
        assert_eq!(h.masks()[5 * w + w / 2], OPAQUE);
        let opaque = h.masks().iter().filter(|&&m| m == OPAQUE).count();
        assert!(opaque > 50 && opaque < h.area().size());
    }

    #[test]
    fn screen_is_fully_transparent() {
        let s = screen(Area::new(30, 12), 4).unwrap();
        assert!(s.masks().iter().all(|&m| m == TRANSPARENT));
        assert_eq!(s.glyphs()[0], b'.');
    }

    #[test]
    fn forge_then_load() {
        let dir = std::env::temp_dir().join(format!("heartwave-assets-{}", std::process::id()));
        forge(&dir, Area::new(40, 20), 1).unwrap();
        let (screen, heart, marquee) = load(&dir).unwrap();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(screen.area(), Area::new(40, 20));
        assert_eq!(heart.area(), Area::new(HEART_W, HEART_H));
        assert_eq!(&marquee.glyphs()[..12], LOVE_NOTE.as_bytes());
    }

    #[test]
    fn load_reports_missing_directory() {
        let err = load(Path::new("/no/such/heartwave/dir")).unwrap_err();
        assert!(format!("{err:#}").contains("screen.img"));
    }
}
