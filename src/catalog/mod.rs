//! Pictogram catalog: static built-ins plus user-created entries.
//!
//! * [`Pictogram`] / [`Category`]: the data model.
//! * [`builtin_pictograms`]: the board's shipped vocabulary.
//! * [`PictogramCatalog`]: create / delete / list over both sets.

pub mod builtin;
pub mod pictogram;
pub mod registry;

pub use builtin::builtin_pictograms;
pub use pictogram::{is_custom_id, Category, Pictogram, CUSTOM_ID_PREFIX, CUSTOM_STYLE_TAG};
pub use registry::{CatalogError, PictogramCatalog};
