use serde::{Deserialize, Serialize};

/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Largest per-axis distance between two sizes.
    pub fn max_delta(&self, other: Size) -> u16 {
        self.width
            .abs_diff(other.width)
            .max(self.height.abs_diff(other.height))
    }
}

/// Rectangle area anchored within the surface grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shrink the rectangle by `amount` on every side.
    pub fn inset(&self, amount: u16) -> Rect {
        let twice = amount.saturating_mul(2);
        Rect::new(
            self.x.saturating_add(amount),
            self.y.saturating_add(amount),
            self.width.saturating_sub(twice),
            self.height.saturating_sub(twice),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_delta_uses_largest_axis() {
        let a = Size::new(80, 24);
        assert_eq!(a.max_delta(Size::new(82, 23)), 2);
        assert_eq!(a.max_delta(a), 0);
    }

    #[test]
    fn inset_saturates_on_small_rects() {
        let rect = Rect::new(2, 2, 1, 5);
        let inner = rect.inset(1);
        assert_eq!(inner, Rect::new(3, 3, 0, 3));
        assert!(inner.is_empty());
    }
}
