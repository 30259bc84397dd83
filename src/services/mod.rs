pub mod block_walker;
pub mod fallback_extractor;
pub mod language_fragment;
pub mod marker_extractor;
pub mod output_writer;
pub mod script_classifier;
pub mod segment_marker;
pub mod table_rewriter;

pub use fallback_extractor::{extract_chinese_sections, extract_japanese_sections};
pub use language_fragment::LanguageFragment;
pub use marker_extractor::{extract_marked_sections, extract_marked_sections_from_html, MarkerExtraction};
pub use output_writer::{OutputWriter, ReaderPayload};
pub use script_classifier::{classify, contains_chinese_script, contains_japanese_script, detect_language, ClassificationResult};
pub use segment_marker::{annotate_zhtw_paragraphs, annotate_zhtw_paragraphs_with_lang};
pub use table_rewriter::{rewrite_tables, rewrite_tables_to_html, split_rows_by_label};
