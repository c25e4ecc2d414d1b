use crate::geometry::{Area, Point};
use std::f32::consts::PI;
use thiserror::Error;

pub(crate) const GRANULARITY: usize = 360;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MotionError {
    #[error("oscillator bounds must satisfy 0 < min < max (got min={min}, max={max})")]
    InvalidBounds { min: u16, max: u16 },
}

/// One-degree sine/cosine samples, built once and shared by reference.
pub(crate) struct TrigTable {
    sin: [f32; GRANULARITY],
    cos: [f32; GRANULARITY],
}

impl TrigTable {
    pub(crate) fn new() -> Self {
        let mut sin = [0.0; GRANULARITY];
        let mut cos = [0.0; GRANULARITY];
        for i in 0..GRANULARITY {
            let rad = i as f32 * 2.0 * PI / GRANULARITY as f32;
            sin[i] = rad.sin();
            cos[i] = rad.cos();
        }
        Self { sin, cos }
    }

    pub(crate) fn sin(&self, ix: u16) -> f32 {
        self.sin[ix as usize % GRANULARITY]
    }

    pub(crate) fn cos(&self, ix: u16) -> f32 {
        self.cos[ix as usize % GRANULARITY]
    }
}

/// Angular stepper whose step size ramps min→max→min, giving ease-in/ease-out
/// motion when fed through a [`TrigTable`].
#[derive(Clone, Debug)]
pub(crate) struct Oscillator {
    min: u16,
    max: u16,
    cur: u16,
    inc: i8,
    ix: u16,
}

impl Oscillator {
    pub(crate) fn new(min: u16, max: u16) -> Result<Self, MotionError> {
        if min == 0 || min >= max {
            return Err(MotionError::InvalidBounds { min, max });
        }
        Ok(Self {
            min,
            max,
            cur: min,
            inc: 1,
            ix: 0,
        })
    }

    pub(crate) fn next(&mut self) -> u16 {
        self.ix = ((self.ix as usize + self.cur as usize) % GRANULARITY) as u16;
        self.cur = self.cur.saturating_add_signed(self.inc as i16);
        if self.cur == self.min || self.cur == self.max {
            self.inc = -self.inc;
        }
        self.ix
    }

    pub(crate) fn get(&self) -> u16 {
        self.ix
    }

    #[cfg(test)]
    pub(crate) fn step(&self) -> u16 {
        self.cur
    }
}

/// Top-left for `sprite` orbiting the centre of `screen`.
///
/// `dir` flips each axis independently. The result is clamped so the sprite
/// always lies inside the screen.
pub(crate) fn orbit_position(
    screen: Area,
    sprite: Area,
    table: &TrigTable,
    angle: u16,
    radius: f32,
    dir: (i8, i8),
) -> Point {
    let sc = screen.center();
    let hc = sprite.center();
    let x = sc.x as f32 - hc.x as f32 + radius * table.cos(angle) * dir.0 as f32;
    let y = sc.y as f32 - hc.y as f32 + radius * table.sin(angle) * dir.1 as f32;
    let max_x = screen.width().saturating_sub(sprite.width()) as f32;
    let max_y = screen.height().saturating_sub(sprite.height()) as f32;
    Point::new(x.clamp(0.0, max_x) as u16, y.clamp(0.0, max_y) as u16)
}
