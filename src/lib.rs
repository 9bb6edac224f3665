pub mod corpus;
pub mod discovery;
pub mod matcher;
pub mod reader;
pub mod sources;

// Re-export main types for convenient access
pub use matcher::{
    AbbrevMatcher, AbbreviationIndex, MatcherConfig,
    Resolution
};

// Re-export collection processing for the CLI and benchmarks
pub use corpus::{
    extract_from_collection, extract_from_file, replace_in_file,
    CollectionReport, DocumentStats, MatchScope
};

pub use sources::{
    normalize_sections, DocumentSource, ParagraphSections, Section,
    SectionExtractor, TextDirSource, WholeDocument
};
