pub mod extraction;
pub mod property;
pub mod stats;

pub use extraction::{DuplicateCheckRequest, ExtractRequest, ExtractionResult};
pub use property::{
    normalize_tags, Furnishing, NewProperty, PropertyDocument, PropertyFields, PropertyFilter,
    PropertyPatch, PropertyRecord, PropertyType, PropertyUpdate, TransactionType,
};
pub use stats::PropertyStats;
