//! Page geometry: rectangles, transformation matrices, and column assignment.
//!
//! All rectangles use a top-left origin with y growing downward, in PDF
//! points. The content-stream reader converts from PDF user space while
//! building page layouts, so everything downstream can compare `y0`/`y1`
//! the way a reader scans a page.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a new rectangle from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing all the given points, if any.
    pub fn bounding(points: impl IntoIterator<Item = (f32, f32)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut rect = Rect::new(x, y, x, y);
        for (x, y) in iter {
            rect.x0 = rect.x0.min(x);
            rect.y0 = rect.y0.min(y);
            rect.x1 = rect.x1.max(x);
            rect.y1 = rect.y1.max(y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// A rectangle is empty when it has no interior.
    pub fn is_empty(&self) -> bool {
        !(self.x1 > self.x0 && self.y1 > self.y0)
    }

    /// Whether the interiors of two rectangles overlap.
    ///
    /// Empty rectangles never intersect anything, so a zero-width rule line
    /// does not count as touching a region.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }
}

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Vertical scale factor, used to turn a font size into an effective size.
    pub fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Horizontal scale factor.
    pub fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

/// One of the two page columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    /// Both columns in reading order.
    pub const ALL: [Column; 2] = [Column::Left, Column::Right];

    /// Assign a block to a column from its left edge.
    ///
    /// A block starting exactly on the midpoint belongs to the right column.
    pub fn classify(x0: f32, mid_x: f32) -> Column {
        if x0 < mid_x {
            Column::Left
        } else {
            Column::Right
        }
    }

    /// Numeric index used in identifiers and file names (0 = left).
    pub fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Right => 1,
        }
    }

    /// Horizontal extent of this column on a page.
    pub fn span(self, page_width: f32) -> (f32, f32) {
        let mid = page_width / 2.0;
        match self {
            Column::Left => (0.0, mid),
            Column::Right => (mid, page_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_column() {
        assert_eq!(Column::classify(10.0, 300.0), Column::Left);
        assert_eq!(Column::classify(299.9, 300.0), Column::Left);
        assert_eq!(Column::classify(300.0, 300.0), Column::Right);
        assert_eq!(Column::classify(450.0, 300.0), Column::Right);
    }

    #[test]
    fn test_classify_is_total() {
        // Every position lands in exactly one column, including odd values.
        for x in [-50.0, 0.0, f32::MIN_POSITIVE, 299.0, 300.0, 1e6] {
            let col = Column::classify(x, 300.0);
            assert!(col == Column::Left || col == Column::Right);
        }
    }

    #[test]
    fn test_column_span() {
        assert_eq!(Column::Left.span(600.0), (0.0, 300.0));
        assert_eq!(Column::Right.span(600.0), (300.0, 600.0));
        assert_eq!(Column::Right.index(), 1);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(a.intersects(&Rect::new(50.0, 50.0, 150.0, 150.0)));
        assert!(!a.intersects(&Rect::new(100.0, 0.0, 200.0, 100.0)));
        assert!(!a.intersects(&Rect::new(0.0, 200.0, 100.0, 300.0)));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let vertical_rule = Rect::new(50.0, 0.0, 50.0, 100.0);
        assert!(vertical_rule.is_empty());
        assert!(!region.intersects(&vertical_rule));
        assert!(!vertical_rule.intersects(&region));
    }

    #[test]
    fn test_bounding() {
        let rect = Rect::bounding([(10.0, 5.0), (2.0, 8.0), (6.0, 1.0)]).unwrap();
        assert_eq!(rect, Rect::new(2.0, 1.0, 10.0, 8.0));
        assert!(Rect::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn test_matrix_then() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 20.0);
        // Scale first, then shift.
        assert_eq!(scale.then(&shift).apply(1.0, 1.0), (12.0, 22.0));
        // Shift first, then scale.
        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (22.0, 42.0));
        assert_eq!(Matrix::IDENTITY.then(&shift), shift);
    }
}
