//! Text edits produced by the edit synthesizer.

use sharpen_syntax::{FileId, TextRange};
use thiserror::Error;

/// Replaces `range` of `file` with `replacement`; an empty range inserts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub file: FileId,
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(file: FileId, offset: usize, text: impl Into<String>) -> Self {
        Self::replace(file, TextRange::empty(offset), text)
    }

    pub fn replace(file: FileId, range: TextRange, text: impl Into<String>) -> Self {
        Self {
            file,
            range,
            replacement: text.into(),
        }
    }

    pub fn delete(file: FileId, range: TextRange) -> Self {
        Self::replace(file, range, String::new())
    }

    fn position(&self) -> (&FileId, usize, usize) {
        (&self.file, self.range.start, self.range.end)
    }
}

/// Edits of one refactoring, possibly spanning several documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
    pub edits: Vec<TextEdit>,
}

impl WorkspaceEdit {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    /// Orders the edits by document and position, ready for
    /// [`apply_text_edits`].
    ///
    /// Inserts recorded at one offset are concatenated in recording order and
    /// an identical replacement recorded twice is kept once. Any other pair
    /// sharing text is an error.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        // Stable: inserts at one offset stay in recording order.
        self.edits.sort_by(|a, b| a.position().cmp(&b.position()));

        let mut folded: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in std::mem::take(&mut self.edits) {
            if edit.range.start > edit.range.end {
                return Err(EditError::InvalidRange {
                    file: edit.file,
                    range: edit.range,
                });
            }
            let Some(last) = folded.last_mut().filter(|last| last.file == edit.file) else {
                folded.push(edit);
                continue;
            };
            if last.range == edit.range && last.range.is_empty() {
                last.replacement.push_str(&edit.replacement);
            } else if last.range == edit.range && last.replacement == edit.replacement {
                continue;
            } else if edit.range.start < last.range.end || last.range == edit.range {
                return Err(EditError::OverlappingEdits {
                    file: edit.file,
                    first: last.range,
                    second: edit.range,
                });
            } else {
                folded.push(edit);
            }
        }
        self.edits = folded;
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit range {range:?} in {file} ends before it starts")]
    InvalidRange { file: FileId, range: TextRange },
    #[error("edits {first:?} and {second:?} in {file} overlap")]
    OverlappingEdits {
        file: FileId,
        first: TextRange,
        second: TextRange,
    },
    #[error("edit range {range:?} does not fit {file} ({len} bytes)")]
    OutOfBounds {
        file: FileId,
        range: TextRange,
        len: usize,
    },
}

/// Applies normalized `edits` of one document to its `original` text.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut out = String::with_capacity(original.len());
    let mut copied = 0;
    for edit in edits {
        let (start, end) = (edit.range.start, edit.range.end);
        let fits = copied <= start
            && end <= original.len()
            && original.is_char_boundary(start)
            && original.is_char_boundary(end);
        if !fits {
            return Err(EditError::OutOfBounds {
                file: edit.file.clone(),
                range: edit.range,
                len: original.len(),
            });
        }
        out.push_str(&original[copied..start]);
        out.push_str(&edit.replacement);
        copied = end;
    }
    out.push_str(&original[copied..]);
    Ok(out)
}
