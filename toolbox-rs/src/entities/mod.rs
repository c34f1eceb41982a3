mod catalog;
mod container;
mod item;
mod placement;
mod session;
mod toolbox;

#[doc(inline)]
pub use catalog::ARCHETYPES;
#[doc(inline)]
pub use catalog::Archetype;
#[doc(inline)]
pub use catalog::Catalog;
#[doc(inline)]
pub use catalog::CatalogConfig;

#[doc(inline)]
pub use container::Container;
#[doc(inline)]
pub use container::ContainerKey;
#[doc(inline)]
pub use container::ContainerKind;

#[doc(inline)]
pub use item::ItemDefinition;
#[doc(inline)]
pub use item::ItemId;

#[doc(inline)]
pub use placement::InstanceId;
#[doc(inline)]
pub use placement::Placement;

#[doc(inline)]
pub use session::PlacementOutcome;
#[doc(inline)]
pub use session::Session;

#[doc(inline)]
pub use toolbox::Toolbox;
