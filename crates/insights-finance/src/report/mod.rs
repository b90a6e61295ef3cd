//! Report sections, prompt construction and response chunking

pub mod chunk;
pub mod generator;
pub mod section;

pub use chunk::{CHUNK_SIZE, chunk_response};
pub use generator::{ReportGenerator, SectionReport};
pub use section::Section;
