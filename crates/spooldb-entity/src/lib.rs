//! # spooldb-entity
//!
//! Data model for the SpoolDB filament catalog. Each level of the directory
//! hierarchy has three shapes:
//!
//! - a **document**: exactly what is persisted in the level's marker file,
//! - an **aggregated view**: the document plus its children, as held in the
//!   cached [`FilamentDatabase`],
//! - an **input** record: validated data arriving from the HTTP or CLI layer,
//!   converted into a document by `into_document`.

pub mod brand;
pub mod common;
pub mod database;
pub mod filament;
pub mod material;
pub mod store;
pub mod variant;

pub use brand::{Brand, BrandDocument, BrandInput};
pub use common::{LogoUpload, OneOrMany};
pub use database::{CatalogStats, FilamentDatabase};
pub use filament::{Filament, FilamentDocument, FilamentInput};
pub use material::{
    GenericSlicerSettings, Material, MaterialDocument, MaterialInput, SlicerProfile,
    SlicerSettings,
};
pub use store::{Store, StoreDocument, StoreInput};
pub use variant::{
    Color, PurchaseLink, PurchaseLinkInput, Size, SizeInput, Variant, VariantDocument,
    VariantInput,
};
