/// Trait for types that can detect collisions between `Self` and `T`.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Trait for types that can detect collisions between `Self` and `T` while enforcing a minimum spacing.
///
/// Two objects closer to each other than `buffer` are considered colliding.
/// A separation of exactly `buffer` is not a collision.
/// With a zero buffer, touching objects do not collide.
pub trait BufferedCollidesWith<T> {
    fn collides_with_buffer(&self, other: &T, buffer: f32) -> bool;
}

/// Trait for types that can determine whether `T` lies within `Self`, allowing `T` to protrude by at most `margin`.
pub trait ContainsWithin<T> {
    fn contains_within(&self, other: &T, margin: f32) -> bool;
}
