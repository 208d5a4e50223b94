use std::collections::BTreeMap;

use sharpen_semantic::SemanticModel;
use sharpen_syntax::{Document, FileId, TextRange};

const START: &str = "/*start*/";
const END: &str = "/*end*/";
const CARET: &str = "/*caret*/";

/// Extracts a byte range selection from a fixture containing `/*start*/` and
/// `/*end*/` markers.
///
/// Returns the fixture with markers removed and the selection `TextRange`
/// pointing at the extracted region.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start = fixture
        .find(START)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + START.len();
    let end = fixture.find(END).expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + END.len()..]);

    // The start stays put; the end shrinks by the start marker.
    (text, TextRange::new(start, end - START.len()))
}

/// Extracts a caret offset from a fixture containing a `/*caret*/` marker.
pub fn extract_caret(fixture: &str) -> (String, usize) {
    let caret = fixture
        .find(CARET)
        .expect("fixture missing /*caret*/ marker");
    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..caret]);
    text.push_str(&fixture[caret + CARET.len()..]);
    (text, caret)
}

/// Strips whichever selection markers `text` carries.
fn extract_selection(text: &str) -> (String, Option<TextRange>) {
    if text.contains(START) {
        let (text, range) = extract_range(text);
        (text, Some(range))
    } else if text.contains(CARET) {
        let (text, caret) = extract_caret(text);
        (text, Some(TextRange::empty(caret)))
    } else {
        (text.to_string(), None)
    }
}

/// A parsed multi-file program with an optional selection.
///
/// Files are introduced by `//- /path` header lines; a fixture without headers
/// is a single file named `/Main.cs`. At most one file may carry selection
/// markers (`/*start*/ /*end*/` or `/*caret*/`).
pub struct Fixture {
    pub model: SemanticModel,
    texts: BTreeMap<FileId, String>,
    selection: Option<(FileId, TextRange)>,
}

impl Fixture {
    #[must_use]
    pub fn parse(fixture: &str) -> Self {
        let mut files: Vec<(String, String)> = Vec::new();
        let mut current: Option<(String, String)> = None;
        for line in fixture.lines() {
            if let Some(path) = line.strip_prefix("//-") {
                if let Some(done) = current.take() {
                    files.push(done);
                }
                current = Some((path.trim().to_string(), String::new()));
                continue;
            }
            match &mut current {
                Some((_, text)) => {
                    text.push_str(line);
                    text.push('\n');
                }
                None if line.trim().is_empty() => {}
                None => {
                    current = Some(("/Main.cs".to_string(), format!("{line}\n")));
                }
            }
        }
        if let Some(done) = current.take() {
            files.push(done);
        }

        let mut texts = BTreeMap::new();
        let mut documents = Vec::new();
        let mut selection = None;
        for (path, text) in files {
            let file = FileId::new(path);
            let (text, range) = extract_selection(&text);
            if let Some(range) = range {
                assert!(selection.is_none(), "fixture has more than one selection");
                selection = Some((file.clone(), range));
            }
            let doc = Document::new(file.clone(), text.clone());
            assert!(
                !doc.has_errors(),
                "fixture file {file} has parse errors: {:?}",
                doc.errors()
            );
            texts.insert(file, text);
            documents.push(doc);
        }
        tracing::debug!(files = texts.len(), "parsed fixture");

        Fixture {
            model: SemanticModel::new(documents),
            texts,
            selection,
        }
    }

    /// Id of the file at `path`.
    pub fn file(&self, path: &str) -> FileId {
        let file = FileId::new(path);
        assert!(self.texts.contains_key(&file), "no fixture file {path}");
        file
    }

    /// The only file of a single-file fixture.
    pub fn main_file(&self) -> FileId {
        self.texts
            .keys()
            .next()
            .cloned()
            .expect("fixture has no files")
    }

    pub fn text(&self, file: &FileId) -> &str {
        self.texts
            .get(file)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("no fixture file {file}"))
    }

    /// The marked selection: a range for `/*start*/ /*end*/`, an empty range
    /// for `/*caret*/`.
    pub fn selection(&self) -> (FileId, TextRange) {
        self.selection
            .clone()
            .expect("fixture has no selection markers")
    }
}
