use crate::canvas::{Canvas, Color, Glyph, TRANSPARENT};
use crate::geometry::{Area, Dimension};
use rand::Rng;

/// Level → (palette color, glyph). Low levels are blank, high levels dense.
pub(crate) struct Ramp;

impl Ramp {
    pub(crate) const LEN: usize = 15;
    const PALETTE: [Color; Self::LEN] = [0, 0, 0, 0, 0, 4, 4, 4, 5, 5, 6, 6, 6, 6, 6];
    const GLYPHS: [Glyph; Self::LEN] = *b"     ..^^*#####";

    pub(crate) fn color(level: u8) -> Color {
        Self::PALETTE[level as usize]
    }

    pub(crate) fn glyph(level: u8) -> Glyph {
        Self::GLYPHS[level as usize]
    }
}

/// Lowest level the bottom edge is reseeded with. Anything in
/// `RESEED_FLOOR..Ramp::LEN` keeps diffused levels inside the ramp.
pub(crate) const RESEED_FLOOR: u8 = 11;

// Slightly above 4 so the average loses a little on every row.
const DECAY_DIVISOR: f64 = 4.00625;

pub(crate) struct WaveStrip {
    canvas: Canvas,
    levels: Vec<u8>,
}

impl WaveStrip {
    pub(crate) fn new(width: Dimension, rows: Dimension) -> Self {
        let canvas = Canvas::new(Area::new(width, rows), TRANSPARENT);
        let levels = vec![0; canvas.area().size()];
        Self { canvas, levels }
    }

    pub(crate) fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[cfg(test)]
    pub(crate) fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub(crate) fn reseed_edge<R: Rng>(&mut self, rng: &mut R) {
        let w = self.canvas.area().width() as usize;
        let size = self.levels.len();
        for i in size.saturating_sub(w)..size {
            let level = rng.gen_range(RESEED_FLOOR..Ramp::LEN as u8);
            self.set_level(i, level);
        }
    }

    /// One upward blur step. Reads below the written row, so a single buffer
    /// serves as both previous and current tick.
    pub(crate) fn diffuse(&mut self) {
        let w = self.canvas.area().width() as usize;
        let size = self.levels.len();
        if size <= w {
            return;
        }
        for i in 0..size - w {
            let down = i + w;
            let sum = self.levels[down % size] as u32
                + self.levels[(down + size - 1) % size] as u32
                + self.levels[(down + 1) % size] as u32
                + self.levels[(down + w) % size] as u32;
            let level = (sum as f64 / DECAY_DIVISOR) as u8;
            debug_assert!((level as usize) < Ramp::LEN);
            self.set_level(i, level);
        }
    }

    fn set_level(&mut self, i: usize, level: u8) {
        self.levels[i] = level;
        self.canvas.glyphs_mut()[i] = Ramp::glyph(level);
        self.canvas.colors_mut()[i] = Ramp::color(level);
    }

    #[cfg(test)]
    fn fill_levels(&mut self, level: u8) {
        for i in 0..self.levels.len() {
            self.set_level(i, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn reseed_touches_only_bottom_row_with_high_levels() {
        let mut wave = WaveStrip::new(12, 4);
        let mut rng = StdRng::seed_from_u64(7);
        wave.reseed_edge(&mut rng);

        let (above, bottom) = wave.levels().split_at(36);
        assert!(above.iter().all(|&l| l == 0));
        assert!(bottom.iter().all(|&l| (RESEED_FLOOR..15).contains(&l)));
        for (i, &l) in bottom.iter().enumerate() {
            assert_eq!(wave.canvas().glyphs()[36 + i], Ramp::glyph(l));
            assert_eq!(wave.canvas().colors()[36 + i], Ramp::color(l));
        }
    }

    #[test]
    fn uniform_strip_decays_by_divisor() {
        for level in [4u8, 9, 14] {
            let mut wave = WaveStrip::new(6, 5);
            wave.fill_levels(level);
            wave.diffuse();
            let expected = (4.0 * level as f64 / DECAY_DIVISOR) as u8;
            assert!(expected < level);
            assert!(wave.levels()[..24].iter().all(|&l| l == expected));
            assert!(wave.levels()[24..].iter().all(|&l| l == level));
        }
    }

    #[test]
    fn levels_stay_inside_ramp() {
        let mut wave = WaveStrip::new(40, 15);
        let mut rng = StdRng::seed_from_u64(2022);
        for _ in 0..200 {
            wave.reseed_edge(&mut rng);
            wave.diffuse();
            assert!(wave.levels().iter().all(|&l| (l as usize) < Ramp::LEN));
        }
        // the wet edge has climbed at least one row
        assert!(wave.levels()[13 * 40..14 * 40].iter().any(|&l| l > 0));
    }

    #[test]
    fn single_row_strip_does_not_diffuse() {
        let mut wave = WaveStrip::new(5, 1);
        wave.fill_levels(3);
        wave.diffuse();
        assert!(wave.levels().iter().all(|&l| l == 3));
    }

    #[test]
    fn ramp_runs_sparse_to_dense() {
        assert_eq!(Ramp::glyph(0), b' ');
        assert_eq!(Ramp::glyph(14), b'#');
        assert_eq!(Ramp::color(9), 5);
    }
}
