pub mod defs;

pub use defs::{ContentItem, InterestProfile, ItemSink, SourceDescriptor, SourceFilters, SourceKind};
