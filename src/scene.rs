use crate::canvas::{Canvas, CanvasError, TRANSPARENT};
use crate::config::Settings;
use crate::droplet::Droplets;
use crate::geometry::{Dimension, Point};
use crate::oscillator::{orbit_position, Oscillator, TrigTable};
use crate::wave::WaveStrip;
use anyhow::{ensure, Context, Result};
use rand::Rng;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::debug;

const GREETING: &str = " ~ ~ ~ ~ ~ Happy Heart's Day ~ ~ ~ ~ ~";
const GREETING_COLOR: u8 = 2;
const SIGNATURE: &str = "press any key to leave";
const SIGNATURE_COLOR: u8 = 3;

struct Heart {
    osc: Oscillator,
    dir: (i8, i8),
    at: Point,
    behind: Canvas,
}

/// Owns every canvas of the animation and runs the per-frame compositing order.
pub(crate) struct Scene {
    screen: Canvas,
    heart: Canvas,
    marquee: Canvas,
    wave: WaveStrip,
    wave_at: Point,
    droplets: Droplets,
    hearts: [Heart; 2],
    trig: TrigTable,
    radius: f32,
}

impl Scene {
    pub(crate) fn new<R: Rng>(
        mut screen: Canvas,
        heart: Canvas,
        marquee: Canvas,
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Self> {
        let area = screen.area();
        ensure!(
            area.contains(Point::default(), heart.area()),
            "heart sprite {:?} is larger than the screen {:?}",
            heart.area(),
            area
        );
        ensure!(
            area.contains(Point::default(), marquee.area()),
            "marquee {:?} is larger than the screen {:?}",
            marquee.area(),
            area
        );
        ensure!(
            settings.wave_rows > 0 && settings.wave_rows < area.height(),
            "wave of {} rows does not fit a screen {} rows tall",
            settings.wave_rows,
            area.height()
        );

        stamp_centered(&mut screen, GREETING, GREETING_COLOR, 0)?;
        stamp_centered(&mut screen, SIGNATURE, SIGNATURE_COLOR, 1)?;

        let wave = WaveStrip::new(area.width(), settings.wave_rows);
        let wave_at = Point::new(0, area.height() - settings.wave_rows - 1);
        let droplets = Droplets::scatter(settings.droplets, area, rng)
            .context("screen too small for droplets")?;

        let hearts = [
            Heart {
                osc: Oscillator::new(settings.heart_a.0, settings.heart_a.1)?,
                dir: (-1, -1),
                at: Point::default(),
                behind: Canvas::new(heart.area(), TRANSPARENT),
            },
            Heart {
                osc: Oscillator::new(settings.heart_b.0, settings.heart_b.1)?,
                dir: (1, 1),
                at: Point::default(),
                behind: Canvas::new(heart.area(), TRANSPARENT),
            },
        ];

        debug!(?area, heart = ?heart.area(), marquee = ?marquee.area(), "scene ready");

        Ok(Self {
            screen,
            heart,
            marquee,
            wave,
            wave_at,
            droplets,
            hearts,
            trig: TrigTable::new(),
            radius: settings.heart_radius,
        })
    }

    #[cfg(test)]
    pub(crate) fn screen(&self) -> &Canvas {
        &self.screen
    }

    /// Droplets, then the wave strip, both stamped into the persistent screen.
    pub(crate) fn advance<R: Rng>(&mut self, rng: &mut R) -> Result<(), CanvasError> {
        self.droplets.step(&mut self.screen, rng)?;
        self.wave.reseed_edge(rng);
        self.wave.diffuse();
        self.screen.put_region(self.wave.canvas(), self.wave_at)
    }

    /// Moves the hearts, saves what lies under them, cuts their shape into the
    /// screen mask and lets the rotated marquee through the holes.
    pub(crate) fn composite(&mut self) -> Result<(), CanvasError> {
        let area = self.screen.area();
        for h in &mut self.hearts {
            h.osc.next();
            h.at = orbit_position(area, self.heart.area(), &self.trig, h.osc.get(), self.radius, h.dir);
        }
        for h in &mut self.hearts {
            h.behind.get_region(&self.screen, h.at)?;
        }
        for h in &self.hearts {
            self.screen.and_mask(&self.heart, h.at)?;
        }
        self.marquee.rotate_left();
        self.screen.or_image(&self.marquee, Point::default())
    }

    pub(crate) fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.screen.show(out)?;
        out.flush()
    }

    /// Undoes `composite`, last heart first.
    pub(crate) fn restore(&mut self) -> Result<(), CanvasError> {
        for h in self.hearts.iter().rev() {
            self.screen.put_region(&h.behind, h.at)?;
        }
        Ok(())
    }

    pub(crate) fn heart_positions(&self) -> [Point; 2] {
        [self.hearts[0].at, self.hearts[1].at]
    }
}

fn stamp_centered(screen: &mut Canvas, text: &str, color: u8, row: Dimension) -> Result<(), CanvasError> {
    let line = Canvas::from_text(text, color, TRANSPARENT)?;
    let x = screen.area().center().x.saturating_sub(line.area().center().x);
    screen.put_region(&line, Point::new(x, row))
}

/// Holds a fixed frame period by sleeping off whatever the frame did not use.
pub(crate) struct FramePacer {
    frame: Duration,
    start: Instant,
}

impl FramePacer {
    pub(crate) fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_millis(1000 / fps.max(1) as u64),
            start: Instant::now(),
        }
    }

    pub(crate) fn begin(&mut self) {
        self.start = Instant::now();
    }

    pub(crate) fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame.saturating_sub(elapsed)
    }

    pub(crate) fn wait(&self) {
        let left = self.remaining(self.start.elapsed());
        if !left.is_zero() {
            std::thread::sleep(left);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;
    use crate::canvas::OPAQUE;
    use crate::geometry::Area;
    use rand::{rngs::StdRng, SeedableRng};

    fn scene(rng: &mut StdRng) -> Scene {
        let settings = Settings::default();
        let screen = assets::screen(Area::new(80, 40), 9).unwrap();
        let heart = assets::heart();
        let marquee = assets::marquee(Area::new(80, 40)).unwrap();
        Scene::new(screen, heart, marquee, &settings, rng).unwrap()
    }

    fn snapshot(c: &Canvas) -> Canvas {
        let mut copy = Canvas::new(c.area(), OPAQUE);
        copy.get_region(c, Point::default()).unwrap();
        copy
    }

    #[test]
    fn greeting_is_stamped_on_top_rows() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = scene(&mut rng);
        let row0 = String::from_utf8_lossy(&s.screen().glyphs()[..80]).into_owned();
        assert!(row0.contains("Happy Heart's Day"));
    }

    #[test]
    fn composite_then_restore_leaves_screen_unchanged() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = scene(&mut rng);
        for _ in 0..40 {
            s.advance(&mut rng).unwrap();
            let before = snapshot(s.screen());
            s.composite().unwrap();
            assert_ne!(s.screen().masks(), before.masks());
            s.restore().unwrap();
            assert_eq!(s.screen(), &before);
        }
    }

    #[test]
    fn marquee_shows_only_inside_hearts() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = scene(&mut rng);
        s.advance(&mut rng).unwrap();
        s.composite().unwrap();

        let w = s.screen().area().width() as usize;
        let heart = assets::heart();
        let hw = heart.area().width() as usize;
        let [a, b] = s.heart_positions();
        let inside = |i: usize| {
            let (x, y) = (i % w, i / w);
            [a, b].iter().any(|p| {
                let (px, py) = (p.x as usize, p.y as usize);
                x >= px
                    && x < px + hw
                    && y >= py
                    && y < py + heart.area().height() as usize
                    && heart.masks()[(y - py) * hw + (x - px)] == OPAQUE
            })
        };
        for (i, &m) in s.screen().masks().iter().enumerate() {
            assert_eq!(m == OPAQUE, inside(i), "cell {i}");
        }
    }

    #[test]
    fn hearts_orbit_in_opposite_directions() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut s = scene(&mut rng);
        s.composite().unwrap();
        let [a, b] = s.heart_positions();
        s.restore().unwrap();
        assert_ne!(a, b);
        let c = s.screen().area().center();
        // first angles are 5° and 1°: one heart left of centre, the other right
        assert!((a.x as i32 + 10) < c.x as i32);
        assert!((b.x as i32 + 10) > c.x as i32);
    }

    #[test]
    fn oversized_heart_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = Settings::default();
        let screen = assets::screen(Area::new(20, 20), 1).unwrap();
        let marquee = assets::marquee(Area::new(20, 20)).unwrap();
        let heart = Canvas::new(Area::new(21, 3), OPAQUE);
        assert!(Scene::new(screen, heart, marquee, &settings, &mut rng).is_err());
    }

    #[test]
    fn pacer_saturates() {
        let p = FramePacer::new(15);
        assert_eq!(p.remaining(Duration::from_millis(10)), Duration::from_millis(56));
        assert_eq!(p.remaining(Duration::from_millis(500)), Duration::ZERO);
    }
}
