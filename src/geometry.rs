pub(crate) type Dimension = u16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Point {
    pub(crate) x: Dimension,
    pub(crate) y: Dimension,
}

impl Point {
    pub(crate) fn new(x: Dimension, y: Dimension) -> Self {
        Self { x, y }
    }
}

/// Width × height with a cached cell count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Area {
    w: Dimension,
    h: Dimension,
    size: usize,
}

impl Area {
    pub(crate) fn new(w: Dimension, h: Dimension) -> Self {
        Self {
            w,
            h,
            size: w as usize * h as usize,
        }
    }

    pub(crate) fn set(&mut self, w: Dimension, h: Dimension) {
        *self = Self::new(w, h);
    }

    pub(crate) fn set_width(&mut self, w: Dimension) {
        self.set(w, self.h);
    }

    pub(crate) fn set_height(&mut self, h: Dimension) {
        self.set(self.w, h);
    }

    pub(crate) fn width(&self) -> Dimension {
        self.w
    }

    pub(crate) fn height(&self) -> Dimension {
        self.h
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn center(&self) -> Point {
        Point::new(self.w / 2, self.h / 2)
    }

    /// True when a rectangle of `inner` placed at `at` lies fully inside `self`.
    pub(crate) fn contains(&self, at: Point, inner: Area) -> bool {
        at.x as usize + inner.w as usize <= self.w as usize
            && at.y as usize + inner.h as usize <= self.h as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_recomputes_size() {
        let mut a = Area::new(4, 3);
        assert_eq!(a.size(), 12);
        a.set(10, 3);
        assert_eq!(a.size(), 30);
        a.set_width(2);
        assert_eq!(a.size(), 6);
        a.set_height(9);
        assert_eq!(a.size(), 18);
        assert_eq!((a.width(), a.height()), (2, 9));
        a.set(0, 7);
        assert_eq!(a.size(), 0);
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(Area::new(5, 4).center(), Point::new(2, 2));
    }

    #[test]
    fn contains_checks_both_edges() {
        let outer = Area::new(10, 5);
        assert!(outer.contains(Point::new(0, 0), Area::new(10, 5)));
        assert!(outer.contains(Point::new(7, 2), Area::new(3, 3)));
        assert!(!outer.contains(Point::new(8, 2), Area::new(3, 3)));
        assert!(!outer.contains(Point::new(0, 3), Area::new(1, 3)));
        // no overflow near the dimension limit
        assert!(!outer.contains(Point::new(u16::MAX, u16::MAX), Area::new(u16::MAX, 1)));
    }
}
