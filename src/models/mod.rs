pub mod chunk;
pub mod document;
pub mod language;
pub mod loaders;

pub use chunk::{Chunk, ProcessedContent, HTML_MIME_TYPE};
pub use document::{ContentDocument, DocumentFormat};
pub use language::Lang;
pub use loaders::{load_all_toml_files, load_toml_to_document};
