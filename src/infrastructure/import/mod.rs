// ============================================================
// CLIENT IMPORT ENGINE
// ============================================================
// Tokenize spreadsheet text, detect headers, guess a column mapping and
// build candidate client records

pub mod decode;
pub mod heuristics;
pub mod normalizer;
pub mod tokenizer;

pub use decode::decode_text;
pub use heuristics::{guess_column_mapping, looks_like_header_row};
pub use normalizer::build_candidates;
pub use tokenizer::tokenize;
