use serde::{Deserialize, Serialize};

/// An axis-aligned pixel rectangle, stored on disk as `[x, y, width, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, widened so boxes read from disk cannot overflow
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Check if this rectangle fully contains another
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Check if this rectangle lies entirely inside a `width` x `height` canvas
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }

    /// Grow the rectangle by `amount` pixels on every side, saturating at zero
    pub fn inflate(&self, amount: u32) -> Rect {
        Rect {
            x: self.x.saturating_sub(amount),
            y: self.y.saturating_sub(amount),
            width: self.width.saturating_add(amount.saturating_mul(2)),
            height: self.height.saturating_add(amount.saturating_mul(2)),
        }
    }
}

#[cfg(test)]
impl Rect {
    /// Check if this rectangle intersects with another
    pub(crate) fn intersects(&self, other: &Rect) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.bottom()
            && self.bottom() > u64::from(other.y)
    }
}

impl From<[u32; 4]> for Rect {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Rect::new(x, y, width, height)
    }
}

impl From<Rect> for [u32; 4] {
    fn from(rect: Rect) -> Self {
        [rect.x, rect.y, rect.width, rect.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(20, 20, 10, 10);
        let touching = Rect::new(10, 0, 10, 10);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(0, 0, 20, 20);
        let inner = Rect::new(5, 5, 5, 5);
        let partial = Rect::new(15, 15, 10, 10);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&partial));
    }

    #[test]
    fn test_fits_within_does_not_overflow() {
        let huge = Rect::new(u32::MAX, u32::MAX, u32::MAX, 1);
        assert!(!huge.fits_within(100, 100));
        assert!(Rect::new(90, 90, 10, 10).fits_within(100, 100));
        assert!(!Rect::new(91, 90, 10, 10).fits_within(100, 100));
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(20, 20, 100, 80).inflate(1);
        assert_eq!(r, Rect::new(19, 19, 102, 82));
        assert_eq!(Rect::new(0, 0, 4, 4).inflate(2), Rect::new(0, 0, 8, 8));
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Rect::new(260, 20, 200, 150)).unwrap();
        assert_eq!(json, "[260,20,200,150]");
        let back: Rect = serde_json::from_str("[1,2,3,4]").unwrap();
        assert_eq!(back, Rect::new(1, 2, 3, 4));
        assert!(serde_json::from_str::<Rect>("[1,2,3]").is_err());
    }
}
