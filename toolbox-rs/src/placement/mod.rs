//! Read-only decisions about where an item may be placed.
//! Nothing in here mutates a [`Container`](crate::entities::Container).

mod search;
mod square_ring_iterator;
mod validator;

#[doc(inline)]
pub use search::find_nearby;
#[doc(inline)]
pub use square_ring_iterator::SquareRingIterator;
#[doc(inline)]
pub use validator::check;
#[doc(inline)]
pub use validator::validate;
