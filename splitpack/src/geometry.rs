use std::fmt;

/// An axis-aligned rectangle in pixel coordinates, with its origin in the
/// top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// The exclusive bottom-right corner.
    #[inline]
    pub fn max(&self) -> (u32, u32) {
        (self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the two regions share any area. Regions that only touch along
    /// an edge do not intersect.
    pub fn intersects(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let (self_max_x, self_max_y) = self.max();
        let (other_max_x, other_max_y) = other.max();

        self.x < other_max_x
            && other.x < self_max_x
            && self.y < other_max_y
            && other.y < self_max_y
    }

    pub fn contains(&self, other: &Region) -> bool {
        let (self_max_x, self_max_y) = self.max();
        let (other_max_x, other_max_y) = other.max();

        other.x >= self.x
            && other.y >= self.y
            && other_max_x <= self_max_x
            && other_max_y <= self_max_y
    }

    /// Shrinks the region by `amount` on every side. Regions too small to
    /// shrink collapse to zero size at their center.
    pub fn inset(&self, amount: u32) -> Region {
        let inset_x = amount.min(self.width / 2);
        let inset_y = amount.min(self.height / 2);

        Region {
            x: self.x + inset_x,
            y: self.y + inset_y,
            width: self.width.saturating_sub(amount * 2),
            height: self.height.saturating_sub(amount * 2),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Region::new(0, 0, 50, 50);
        let b = Region::new(50, 0, 50, 50);
        let c = Region::new(0, 50, 50, 50);

        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn overlap() {
        let a = Region::new(0, 0, 50, 50);
        let b = Region::new(49, 49, 10, 10);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn empty_never_intersects() {
        let a = Region::new(0, 0, 50, 50);
        let b = Region::new(10, 10, 0, 20);

        assert!(!a.intersects(&b));
    }

    #[test]
    fn containment() {
        let outer = Region::new(0, 0, 100, 100);

        assert!(outer.contains(&Region::new(0, 0, 100, 100)));
        assert!(outer.contains(&Region::new(60, 60, 40, 40)));
        assert!(!outer.contains(&Region::new(60, 60, 41, 40)));
    }

    #[test]
    fn inset_strips_padding() {
        let padded = Region::new(10, 20, 34, 18);

        assert_eq!(padded.inset(2), Region::new(12, 22, 30, 14));
        assert_eq!(padded.inset(0), padded);
        assert!(Region::new(0, 0, 3, 3).inset(2).is_empty());
    }
}
