use crate::geometry::{Area, Dimension, Point};
use crossterm::{
    cursor, queue,
    style::{Print, ResetColor},
    terminal::{Clear, ClearType},
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};
use thiserror::Error;

pub(crate) type Color = u8;
pub(crate) type Glyph = u8;
pub(crate) type Mask = u8;

pub(crate) const OPAQUE: Mask = 0x00;
pub(crate) const TRANSPARENT: Mask = 0xff;

const FG: [&str; 8] = [
    "\x1b[30m", "\x1b[31m", "\x1b[32m", "\x1b[33m", "\x1b[34m", "\x1b[35m", "\x1b[36m", "\x1b[37m",
];

#[derive(Debug, Error)]
pub(crate) enum CanvasError {
    #[error("canvas i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("canvas is already loaded ({width}x{height})")]
    AlreadyLoaded { width: Dimension, height: Dimension },
    #[error("region {inner:?} at {at:?} does not fit inside {outer:?}")]
    OutOfBounds { at: Point, inner: Area, outer: Area },
    #[error("screen is {height} rows tall, at least {min} are needed")]
    ScreenTooShort { height: Dimension, min: Dimension },
    #[error("text must not be empty")]
    EmptyText,
    #[error("text of {0} bytes does not fit in one canvas row")]
    TextTooLong(usize),
}

/// Grid of (color, glyph, mask) cells stored as three parallel row-major arrays.
///
/// A mask of `0x00` means the cell is opaque; anything else lets the cell
/// underneath show through.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Canvas {
    area: Area,
    color: Vec<Color>,
    glyph: Vec<Glyph>,
    mask: Vec<Mask>,
}

impl Canvas {
    pub(crate) fn empty() -> Self {
        Self::new(Area::default(), OPAQUE)
    }

    pub(crate) fn new(area: Area, mask: Mask) -> Self {
        Self {
            area,
            color: vec![0; area.size()],
            glyph: vec![b' '; area.size()],
            mask: vec![mask; area.size()],
        }
    }

    /// One-row canvas holding `text`, every cell in `color`.
    pub(crate) fn from_text(text: &str, color: Color, mask: Mask) -> Result<Self, CanvasError> {
        if text.is_empty() {
            return Err(CanvasError::EmptyText);
        }
        let width = Dimension::try_from(text.len()).map_err(|_| CanvasError::TextTooLong(text.len()))?;
        let mut canvas = Self::new(Area::new(width, 1), mask);
        canvas.color.fill(color);
        canvas.glyph.copy_from_slice(text.as_bytes());
        Ok(canvas)
    }

    pub(crate) fn open(path: &Path) -> Result<Self, CanvasError> {
        let mut canvas = Self::empty();
        canvas.load(path)?;
        Ok(canvas)
    }

    pub(crate) fn area(&self) -> Area {
        self.area
    }

    pub(crate) fn colors(&self) -> &[Color] {
        &self.color
    }

    pub(crate) fn glyphs(&self) -> &[Glyph] {
        &self.glyph
    }

    pub(crate) fn masks(&self) -> &[Mask] {
        &self.mask
    }

    pub(crate) fn colors_mut(&mut self) -> &mut [Color] {
        &mut self.color
    }

    pub(crate) fn glyphs_mut(&mut self) -> &mut [Glyph] {
        &mut self.glyph
    }

    pub(crate) fn masks_mut(&mut self) -> &mut [Mask] {
        &mut self.mask
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), CanvasError> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_to(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub(crate) fn write_to<W: Write>(&self, out: &mut W) -> Result<(), CanvasError> {
        out.write_all(&self.area.width().to_le_bytes())?;
        out.write_all(&self.area.height().to_le_bytes())?;
        out.write_all(&self.color)?;
        out.write_all(&self.glyph)?;
        out.write_all(&self.mask)?;
        Ok(())
    }

    /// Only valid on an empty canvas. On failure the canvas is left untouched.
    pub(crate) fn load(&mut self, path: &Path) -> Result<(), CanvasError> {
        self.ensure_empty()?;
        let mut file = BufReader::new(File::open(path)?);
        self.read_from(&mut file)
    }

    pub(crate) fn read_from<R: Read>(&mut self, input: &mut R) -> Result<(), CanvasError> {
        self.ensure_empty()?;

        let mut dim = [0u8; 2];
        input.read_exact(&mut dim)?;
        let w = Dimension::from_le_bytes(dim);
        input.read_exact(&mut dim)?;
        let h = Dimension::from_le_bytes(dim);

        let mut area = Area::default();
        area.set_width(w);
        area.set_height(h);
        let color = read_plane(input, area.size())?;
        let glyph = read_plane(input, area.size())?;
        let mask = read_plane(input, area.size())?;

        *self = Self {
            area,
            color,
            glyph,
            mask,
        };
        Ok(())
    }

    fn ensure_empty(&self) -> Result<(), CanvasError> {
        if self.area.size() != 0 {
            return Err(CanvasError::AlreadyLoaded {
                width: self.area.width(),
                height: self.area.height(),
            });
        }
        Ok(())
    }

    /// Cycles `text` across every cell and paints them all `color`.
    pub(crate) fn fill_with_text(&mut self, text: &str, color: Color) -> Result<(), CanvasError> {
        if text.is_empty() {
            return Err(CanvasError::EmptyText);
        }
        self.color.fill(color);
        for (dst, src) in self.glyph.iter_mut().zip(text.bytes().cycle()) {
            *dst = src;
        }
        Ok(())
    }

    /// Copies the rectangle of `source` at `at`, sized to this canvas, into this canvas.
    pub(crate) fn get_region(&mut self, source: &Canvas, at: Point) -> Result<(), CanvasError> {
        check_fits(source.area, at, self.area)?;
        walk(self.area, source.area.width(), at, |i, ci| {
            self.color[i] = source.color[ci];
            self.glyph[i] = source.glyph[ci];
            self.mask[i] = source.mask[ci];
        });
        Ok(())
    }

    pub(crate) fn and_mask(&mut self, source: &Canvas, at: Point) -> Result<(), CanvasError> {
        check_fits(self.area, at, source.area)?;
        walk(source.area, self.area.width(), at, |i, ci| {
            self.mask[ci] &= source.mask[i];
        });
        Ok(())
    }

    /// ORs the masks together and copies color/glyph wherever the result is opaque.
    pub(crate) fn or_image(&mut self, source: &Canvas, at: Point) -> Result<(), CanvasError> {
        check_fits(self.area, at, source.area)?;
        walk(source.area, self.area.width(), at, |i, ci| {
            self.mask[ci] |= source.mask[i];
            if self.mask[ci] == OPAQUE {
                self.color[ci] = source.color[i];
                self.glyph[ci] = source.glyph[i];
            }
        });
        Ok(())
    }

    pub(crate) fn put_region(&mut self, source: &Canvas, at: Point) -> Result<(), CanvasError> {
        check_fits(self.area, at, source.area)?;
        walk(source.area, self.area.width(), at, |i, ci| {
            self.color[ci] = source.color[i];
            self.glyph[ci] = source.glyph[i];
            self.mask[ci] = source.mask[i];
        });
        Ok(())
    }

    /// Moves cell 0 to the end of the flat cell sequence, ignoring row boundaries.
    pub(crate) fn rotate_left(&mut self) {
        if self.area.size() == 0 {
            return;
        }
        self.color.rotate_left(1);
        self.glyph.rotate_left(1);
        self.mask.rotate_left(1);
    }

    pub(crate) fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        let w = self.area.width() as usize;
        for (i, (&c, &g)) in self.colors().iter().zip(self.glyphs()).enumerate() {
            if i % w == 0 {
                queue!(out, Print("\r\n"))?;
            }
            queue!(out, Print(FG[(c & 7) as usize]))?;
            out.write_all(&[g])?;
        }
        queue!(out, ResetColor)?;
        Ok(())
    }

    /// Mask grid (`0` opaque, `1` transparent) followed by the glyph grid.
    pub(crate) fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let w = self.area.width() as usize;
        writeln!(out, "\nmask:")?;
        for row in self.masks().chunks(w.max(1)) {
            let line: String = row
                .iter()
                .map(|&m| if m == OPAQUE { '0' } else { '1' })
                .collect();
            writeln!(out, "{line}")?;
        }
        writeln!(out, "\n\ntext:")?;
        for row in self.glyphs().chunks(w.max(1)) {
            let line: String = row.iter().map(|&g| g as char).collect();
            writeln!(out, "{line}")?;
        }
        writeln!(out, "\n")?;
        Ok(())
    }
}

// Grows with the data actually present, so a corrupt header cannot force a
// huge allocation up front.
fn read_plane<R: Read>(input: &mut R, size: usize) -> Result<Vec<u8>, CanvasError> {
    let mut plane = Vec::new();
    input.by_ref().take(size as u64).read_to_end(&mut plane)?;
    if plane.len() != size {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(plane)
}

fn check_fits(outer: Area, at: Point, inner: Area) -> Result<(), CanvasError> {
    if outer.contains(at, inner) {
        Ok(())
    } else {
        Err(CanvasError::OutOfBounds { at, inner, outer })
    }
}

// Single linear pass over `inner`, stepping the outer offset down a row each
// time the inner index wraps.
fn walk(inner: Area, outer_width: Dimension, at: Point, mut f: impl FnMut(usize, usize)) {
    let inner_w = inner.width() as usize;
    let skip = outer_width as usize - inner_w;
    let mut start = at.y as usize * outer_width as usize + at.x as usize;
    for i in 0..inner.size() {
        f(i, start + i);
        if (i + 1) % inner_w == 0 {
            start += skip;
        }
    }
}
