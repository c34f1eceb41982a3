use crate::geometry::geo_traits::{BufferedCollidesWith, CollidesWith, ContainsWithin};
use crate::geometry::primitives::Point;
use anyhow::Result;
use anyhow::ensure;

///Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Rect {
    pub fn try_new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Result<Self> {
        ensure!(
            x_min < x_max && y_min < y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Rectangle with its top-left corner at `(x, y)`, spanning `width` along x and `height` along y.
    /// No validation is performed, use [`Rect::try_new`] for untrusted input.
    #[inline(always)]
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x_min: x,
            y_min: y,
            x_max: x + width,
            y_max: y + height,
        }
    }

    /// The corner closest to the origin, i.e. the position at which the rectangle is anchored
    pub fn origin(&self) -> Point {
        Point(self.x_min, self.y_min)
    }

    /// Returns the same rectangle with its origin moved to `p`
    pub fn with_origin(&self, p: Point) -> Rect {
        Rect::from_origin(p.0, p.1, self.width(), self.height())
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f32 {
        (self.x_max - self.x_min) * (self.y_max - self.y_min)
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect) -> bool {
        self.collides_with_buffer(other, 0.0)
    }
}

impl BufferedCollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with_buffer(&self, other: &Rect, buffer: f32) -> bool {
        debug_assert!(buffer >= 0.0, "negative buffer: {buffer}");
        // separating axis test, written so that swapping `self` and `other` yields the same terms
        let separated = self.x_max + buffer <= other.x_min
            || other.x_max + buffer <= self.x_min
            || self.y_max + buffer <= other.y_min
            || other.y_max + buffer <= self.y_min;
        !separated
    }
}

impl ContainsWithin<Rect> for Rect {
    #[inline(always)]
    fn contains_within(&self, other: &Rect, margin: f32) -> bool {
        other.x_min >= self.x_min - margin
            && other.y_min >= self.y_min - margin
            && other.x_max <= self.x_max + margin
            && other.y_max <= self.y_max + margin
    }
}
