//! 2D vector arithmetic.
//!
//! The value type is `ultraviolet::Vec2`: `+`, `-`, `* k`, `/ k`, unary `-`,
//! `mag()` and `dot()` are all provided there and return new values.
//! The only thing added here is a normalization that refuses the zero vector
//! instead of silently producing NaNs.

pub use ultraviolet::Vec2 as Vector2;

/// Guarded helpers on top of [`Vector2`].
pub trait VectorExt: Sized {
    /// Unit vector in the same direction, or `None` when the magnitude is
    /// zero or not finite.
    fn try_normalized(&self) -> Option<Self>;

    /// Both components are finite.
    fn is_finite(&self) -> bool;
}

impl VectorExt for Vector2 {
    #[inline]
    fn try_normalized(&self) -> Option<Self> {
        let mag = self.mag();
        if mag == 0.0 || !mag.is_finite() {
            return None;
        }
        Some(*self / mag)
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
