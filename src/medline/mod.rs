//! MEDLINE record model, flat-file parsing and citation export

pub mod export;
pub mod parser;
pub mod record;
pub mod records;

pub use export::ExportFormat;
pub use parser::parse_medline;
pub use record::{FieldValue, MedlineRecord};
pub use records::RecordSet;

/// Greedy word wrap with separate first-line and continuation indents
pub(crate) fn fill(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = initial_indent.to_string();
    let mut current_empty = true;

    for word in text.split_whitespace() {
        let candidate_len = current.len() + if current_empty { 0 } else { 1 } + word.len();
        if !current_empty && candidate_len > width {
            lines.push(current);
            current = subsequent_indent.to_string();
            current_empty = true;
        }
        if !current_empty {
            current.push(' ');
        }
        current.push_str(word);
        current_empty = false;
    }
    lines.push(current);
    lines.join("\n")
}
