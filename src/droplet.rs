use crate::canvas::{Canvas, CanvasError, TRANSPARENT};
use crate::geometry::{Area, Dimension, Point};
use rand::Rng;

const FRAMES: [&[u8; 5]; 3] = [b" ...@", b" ..@ ", b" .@  "];
const COLOR: u8 = 4;
const TOP_ROW: Dimension = 2;
// rows kept clear between the lowest droplet and the bottom edge
const FLOOR_MARGIN: Dimension = 10;

pub(crate) const MIN_SCREEN_HEIGHT: Dimension = FLOOR_MARGIN + 4;

#[derive(Clone, Debug)]
pub(crate) struct Droplet {
    pub(crate) point: Point,
    pub(crate) frame: usize,
    pub(crate) frame_step: i8,
    pub(crate) stepper: u8,
    pub(crate) stepper_max: u8,
}

impl Droplet {
    /// Bounces the animation frame 0↔2, holding each end frame for an extra
    /// tick, and moves down one row every `stepper_max` ticks.
    fn tick(&mut self) {
        let next = self.frame as i8 + self.frame_step;
        let last = FRAMES.len() as i8 - 1;
        if next > last || next < 0 {
            self.frame_step = -self.frame_step;
        }
        self.frame = next.clamp(0, last) as usize;

        self.stepper += 1;
        if self.stepper >= self.stepper_max {
            self.stepper = 0;
            self.point.y += 1;
        }
    }
}

pub(crate) struct DropletSprites {
    frames: [Canvas; 3],
}

impl DropletSprites {
    pub(crate) fn new() -> Self {
        Self {
            frames: FRAMES.map(|art| {
                let mut c = Canvas::new(Area::new(1, art.len() as Dimension), TRANSPARENT);
                c.glyphs_mut().copy_from_slice(art);
                c.colors_mut().fill(COLOR);
                c
            }),
        }
    }

    pub(crate) fn frame(&self, ix: usize) -> &Canvas {
        &self.frames[ix]
    }
}

pub(crate) struct Droplets {
    sprites: DropletSprites,
    drops: Vec<Droplet>,
    lowest: Dimension,
    width: Dimension,
}

impl Droplets {
    pub(crate) fn scatter<R: Rng>(
        count: usize,
        screen: Area,
        rng: &mut R,
    ) -> Result<Self, CanvasError> {
        let sprites = DropletSprites::new();
        let sprite = sprites.frame(0).area();
        if screen.height() < MIN_SCREEN_HEIGHT || screen.width() == 0 {
            return Err(CanvasError::ScreenTooShort {
                height: screen.height(),
                min: MIN_SCREEN_HEIGHT,
            });
        }
        let lowest = screen.height() - FLOOR_MARGIN;
        debug_assert!(lowest + sprite.height() <= screen.height());

        let drops = (0..count)
            .map(|_| Droplet {
                point: Point::new(
                    rng.gen_range(0..screen.width()),
                    TOP_ROW + rng.gen_range(0..lowest),
                ),
                frame: rng.gen_range(0..FRAMES.len()),
                frame_step: 1,
                stepper: 0,
                stepper_max: rng.gen_range(1..=10),
            })
            .collect();

        Ok(Self {
            sprites,
            drops,
            lowest,
            width: screen.width(),
        })
    }

    #[cfg(test)]
    pub(crate) fn drops(&self) -> &[Droplet] {
        &self.drops
    }

    pub(crate) fn step<R: Rng>(&mut self, screen: &mut Canvas, rng: &mut R) -> Result<(), CanvasError> {
        for drop in &mut self.drops {
            drop.tick();
            if drop.point.y > self.lowest {
                drop.point = Point::new(rng.gen_range(0..self.width), TOP_ROW);
                drop.stepper_max = rng.gen_range(1..=5);
            }
            screen.put_region(self.sprites.frame(drop.frame), drop.point)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn frames_bounce_without_leaving_range() {
        let mut d = Droplet {
            point: Point::new(0, 0),
            frame: 0,
            frame_step: 1,
            stepper: 0,
            stepper_max: 100,
        };
        let seen: Vec<usize> = (0..8)
            .map(|_| {
                d.tick();
                d.frame
            })
            .collect();
        assert_eq!(seen, vec![1, 2, 2, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn descends_every_stepper_max_ticks() {
        let mut d = Droplet {
            point: Point::new(3, 2),
            frame: 1,
            frame_step: 1,
            stepper: 0,
            stepper_max: 3,
        };
        for _ in 0..9 {
            d.tick();
        }
        assert_eq!(d.point.y, 5);
    }

    #[test]
    fn sprites_are_one_column_tall() {
        let sprites = DropletSprites::new();
        assert_eq!(sprites.frame(0).area(), Area::new(1, 5));
        assert_eq!(sprites.frame(2).glyphs(), b" .@  ");
        assert!(sprites.frame(1).colors().iter().all(|&c| c == COLOR));
    }

    #[test]
    fn droplets_stay_on_screen() {
        let area = Area::new(30, 20);
        let mut screen = Canvas::new(area, TRANSPARENT);
        let mut rng = StdRng::seed_from_u64(14);
        let mut drops = Droplets::scatter(25, area, &mut rng).unwrap();
        for _ in 0..500 {
            drops.step(&mut screen, &mut rng).unwrap();
            for d in drops.drops() {
                assert!(d.point.x < 30);
                assert!((TOP_ROW..=20 - FLOOR_MARGIN).contains(&d.point.y));
            }
        }
        assert!(screen.glyphs().contains(&b'@'));
    }

    #[test]
    fn short_screen_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            Droplets::scatter(3, Area::new(10, 13), &mut rng),
            Err(CanvasError::ScreenTooShort { height: 13, min: 14 })
        ));
    }
}
