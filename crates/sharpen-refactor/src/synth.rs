//! Turns a rewritten tree back into text.
//!
//! The new tree is compared with the document's tree list by list (items,
//! type members, statements of method bodies and nested blocks), matching
//! elements by [`NodeId`]. Untouched elements keep their original text;
//! deleted elements lose their lines; changed and inserted elements are
//! printed in canonical layout and recorded in the reformat set. When a list
//! cannot be matched (reordered or duplicated ids) its whole container is
//! reprinted instead.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use sharpen_syntax::printer::{print_item, print_member, print_stmt, print_unit};
use sharpen_syntax::*;
use similar::TextDiff;

use crate::edit::{apply_text_edits, TextEdit, WorkspaceEdit};
use crate::error::RefactorError;

const INDENT: &str = "    ";

/// The result of a refactoring for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatedDocument {
    pub file: FileId,
    pub original: String,
    /// The rewritten tree.
    pub unit: CompilationUnit,
    pub text: String,
    /// Normalized edits that turn `original` into `text`.
    pub edits: Vec<TextEdit>,
    /// Nodes whose text was produced by the printer rather than kept from
    /// the original; a formatter should lay these out.
    pub reformat: BTreeSet<NodeId>,
}

/// All documents changed by one refactoring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changes {
    documents: BTreeMap<FileId, UpdatedDocument>,
}

impl Changes {
    pub(crate) fn insert(&mut self, doc: UpdatedDocument) {
        self.documents.insert(doc.file.clone(), doc);
    }

    pub fn documents(&self) -> impl Iterator<Item = &UpdatedDocument> {
        self.documents.values()
    }

    pub fn document(&self, file: &FileId) -> Option<&UpdatedDocument> {
        self.documents.get(file)
    }

    /// New text of `file`, if the refactoring touched it.
    pub fn text(&self, file: &FileId) -> Option<&str> {
        self.documents.get(file).map(|doc| doc.text.as_str())
    }

    pub fn workspace_edit(&self) -> WorkspaceEdit {
        WorkspaceEdit::new(
            self.documents
                .values()
                .flat_map(|doc| doc.edits.iter().cloned())
                .collect(),
        )
    }

    /// Unified diff of every changed document.
    pub fn preview(&self) -> String {
        let mut out = String::new();
        for doc in self.documents.values() {
            if doc.original == doc.text {
                continue;
            }
            let diff = TextDiff::from_lines(doc.original.as_str(), doc.text.as_str());
            out.push_str(
                &diff
                    .unified_diff()
                    .context_radius(3)
                    .header(&format!("a{}", doc.file), &format!("b{}", doc.file))
                    .to_string(),
            );
        }
        out
    }
}

/// Computes the text of `unit`, the rewritten form of `doc`'s tree.
pub(crate) fn synthesize(
    doc: &Document,
    unit: CompilationUnit,
) -> Result<UpdatedDocument, RefactorError> {
    let mut synth = Synth {
        doc,
        text: doc.text(),
        edits: Vec::new(),
        reformat: BTreeSet::new(),
    };
    synth.unit(doc.unit(), &unit);

    let mut edit = WorkspaceEdit::new(synth.edits);
    edit.normalize()?;
    let text = apply_text_edits(doc.text(), &edit.edits)?;
    tracing::trace!(
        file = %doc.file,
        edits = edit.edits.len(),
        reformat = synth.reformat.len(),
        "synthesized document"
    );
    Ok(UpdatedDocument {
        file: doc.file.clone(),
        original: doc.text().to_string(),
        unit,
        text,
        edits: edit.edits,
        reformat: synth.reformat,
    })
}

/// A list element the synthesizer can match by id.
trait Element: PartialEq {
    fn node_id(&self) -> NodeId;

    fn print(&self, level: usize) -> String;

    /// Whether a blank line separates `self` from a following `next`.
    fn spaced(&self, next: &Self) -> bool;
}

impl Element for Item {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn print(&self, level: usize) -> String {
        print_item(self, level)
    }

    fn spaced(&self, _next: &Self) -> bool {
        true
    }
}

impl Element for Member {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn print(&self, level: usize) -> String {
        print_member(self, level)
    }

    fn spaced(&self, next: &Self) -> bool {
        !(matches!(self, Member::Field(_)) && matches!(next, Member::Field(_)))
    }
}

impl Element for Stmt {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn print(&self, level: usize) -> String {
        print_stmt(self, level)
    }

    fn spaced(&self, _next: &Self) -> bool {
        false
    }
}

/// Where the elements of a list live in the original text.
#[derive(Clone, Copy, Debug)]
struct Container {
    /// Just after the opening brace (or after the last using directive).
    open: usize,
    /// The closing brace (or the end of the text).
    close: usize,
    /// Indentation level of the elements.
    level: usize,
    braced: bool,
}

type Refine<'a, T> = fn(&mut Synth<'a>, &T, &T, usize) -> bool;

struct Synth<'a> {
    doc: &'a Document,
    text: &'a str,
    edits: Vec<TextEdit>,
    reformat: BTreeSet<NodeId>,
}

impl<'a> Synth<'a> {
    fn unit(&mut self, old: &CompilationUnit, new: &CompilationUnit) {
        if old == new {
            return;
        }
        let open = old
            .usings
            .last()
            .and_then(|using| self.doc.range(using.id))
            .map_or(0, |range| range.end);
        let container = Container {
            open,
            close: self.text.len(),
            level: 0,
            braced: false,
        };
        if old.usings != new.usings || !self.list(&old.items, &new.items, container, Self::refine_item) {
            self.replace(TextRange::new(0, self.text.len()), print_unit(new));
            self.reformat.insert(new.id);
        }
    }

    fn replace(&mut self, range: TextRange, text: String) {
        self.edits
            .push(TextEdit::replace(self.doc.file.clone(), range, text));
    }

    fn insert(&mut self, offset: usize, text: String) {
        self.edits
            .push(TextEdit::insert(self.doc.file.clone(), offset, text));
    }

    /// Matches `new` against `old`. Returns `false`, without recording any
    /// edit, when the lists cannot be matched element by element.
    fn list<T: Element>(
        &mut self,
        old: &[T],
        new: &[T],
        container: Container,
        refine: Refine<'a, T>,
    ) -> bool {
        let old_index: HashMap<NodeId, usize> = old
            .iter()
            .enumerate()
            .map(|(idx, element)| (element.node_id(), idx))
            .collect();
        if old_index.len() != old.len()
            || old.iter().any(|element| self.doc.range(element.node_id()).is_none())
        {
            return false;
        }
        let mut seen = HashSet::new();
        let mut last_kept: Option<usize> = None;
        for element in new {
            if !seen.insert(element.node_id()) {
                return false;
            }
            if let Some(&idx) = old_index.get(&element.node_id()) {
                if last_kept.is_some_and(|last| idx <= last) {
                    return false;
                }
                last_kept = Some(idx);
            }
        }
        if old == new {
            return true;
        }
        if last_kept.is_none() {
            return self.replace_contents(new, container);
        }

        for element in old {
            if !seen.contains(&element.node_id()) {
                self.delete(element);
            }
        }

        let mut anchor: Option<&T> = None;
        let mut pending: Vec<&T> = Vec::new();
        for element in new {
            let Some(&idx) = old_index.get(&element.node_id()) else {
                pending.push(element);
                continue;
            };
            let original = &old[idx];
            if !pending.is_empty() {
                self.insert_run(&pending, anchor, Some(original), container.level);
                pending.clear();
            }
            if original != element && !refine(self, original, element, container.level) {
                self.reprint(original, element, container.level);
            }
            anchor = Some(original);
        }
        if !pending.is_empty() {
            self.insert_run(&pending, anchor, None, container.level);
        }
        true
    }

    /// Replaces everything between the container's delimiters.
    fn replace_contents<T: Element>(&mut self, new: &[T], container: Container) -> bool {
        let mut text = String::new();
        let mut prev: Option<&T> = None;
        for element in new {
            if let Some(prev) = prev {
                text.push('\n');
                if prev.spaced(element) {
                    text.push('\n');
                }
            }
            text.push_str(&indent(container.level));
            text.push_str(&element.print(container.level));
            self.reformat.insert(element.node_id());
            prev = Some(element);
        }
        if container.braced {
            let mut out = String::from("\n");
            if !text.is_empty() {
                out.push_str(&text);
                out.push('\n');
            }
            out.push_str(&indent(container.level.saturating_sub(1)));
            self.replace(TextRange::new(container.open, container.close), out);
        } else {
            let lead = if container.open > 0 { "\n\n" } else { "" };
            let out = if text.is_empty() {
                "\n".to_string()
            } else {
                format!("{lead}{text}\n")
            };
            self.replace(TextRange::new(container.open, container.close), out);
        }
        true
    }

    /// Inserts `run` after `after` or, when `after` is `None`, before `before`.
    fn insert_run<T: Element>(&mut self, run: &[&T], after: Option<&T>, before: Option<&T>, level: usize) {
        for element in run {
            self.reformat.insert(element.node_id());
        }
        if let Some(after) = after {
            let Some(range) = self.doc.range(after.node_id()) else {
                return;
            };
            let mut text = String::new();
            let mut prev: &T = after;
            for element in run {
                text.push('\n');
                if prev.spaced(element) {
                    text.push('\n');
                }
                text.push_str(&indent(level));
                text.push_str(&element.print(level));
                prev = element;
            }
            self.insert(range.end, text);
        } else if let Some(before) = before {
            let Some(range) = self.doc.range(before.node_id()) else {
                return;
            };
            let start = self.line_start(range.start);
            let at_line_start = self.text[start..range.start].trim().is_empty();
            let mut text = String::new();
            for (idx, element) in run.iter().enumerate() {
                if idx == 0 && !at_line_start {
                    text.push('\n');
                }
                text.push_str(&indent(level));
                text.push_str(&element.print(level));
                text.push('\n');
                let next: &T = run.get(idx + 1).copied().unwrap_or(before);
                if element.spaced(next) {
                    text.push('\n');
                }
            }
            if at_line_start {
                self.insert(start, text);
            } else {
                text.push_str(&indent(level));
                self.insert(range.start, text);
            }
        }
    }

    fn reprint<T: Element>(&mut self, old: &T, new: &T, level: usize) {
        if let Some(range) = self.doc.range(old.node_id()) {
            self.replace(range, new.print(level));
            self.reformat.insert(new.node_id());
        }
    }

    fn delete<T: Element>(&mut self, element: &T) {
        if let Some(range) = self.doc.range(element.node_id()) {
            let range = self.line_extent(range);
            self.edits
                .push(TextEdit::delete(self.doc.file.clone(), range));
        }
    }

    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |idx| idx + 1)
    }

    /// `range` grown to whole lines when nothing else shares them, plus one
    /// adjacent blank line when the removal would leave two in a row (or one
    /// before a closing brace).
    fn line_extent(&self, range: TextRange) -> TextRange {
        let text = self.text;
        let line_start = self.line_start(range.start);
        if !text[line_start..range.start].trim().is_empty() {
            return range;
        }
        let line_end = text[range.end..]
            .find('\n')
            .map_or(text.len(), |idx| range.end + idx + 1);
        if !text[range.end..line_end].trim().is_empty() {
            return range;
        }
        let mut start = line_start;
        if start > 0 {
            let prev_start = self.line_start(start - 1);
            let prev_blank = text[prev_start..start].trim().is_empty();
            let next_line = text[line_end..].lines().next().unwrap_or("").trim();
            if prev_blank && (next_line.is_empty() || next_line.starts_with('}')) {
                start = prev_start;
            }
        }
        TextRange::new(start, line_end)
    }

    /// Offset just after the first `{` at or after `from`, skipping comments.
    fn after_open_brace(&self, from: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut idx = from;
        while idx < bytes.len() {
            match bytes[idx] {
                b'{' => return Some(idx + 1),
                b'/' if bytes.get(idx + 1) == Some(&b'/') => {
                    idx = self.text[idx..].find('\n').map_or(bytes.len(), |nl| idx + nl);
                }
                b'"' | b'\'' => {
                    let quote = bytes[idx];
                    idx += 1;
                    while idx < bytes.len() && bytes[idx] != quote {
                        if bytes[idx] == b'\\' {
                            idx += 1;
                        }
                        idx += 1;
                    }
                    idx += 1;
                }
                _ => idx += 1,
            }
        }
        None
    }

    fn braced(&self, id: NodeId, header_end: usize, level: usize) -> Option<Container> {
        let range = self.doc.range(id)?;
        let open = self.after_open_brace(header_end)?;
        let close = range.end.checked_sub(1)?;
        (open <= close && self.text.as_bytes().get(close) == Some(&b'}')).then_some(Container {
            open,
            close,
            level,
            braced: true,
        })
    }

    // ---- refinement ----------------------------------------------------

    fn refine_item(&mut self, old: &Item, new: &Item, level: usize) -> bool {
        match (old, new) {
            (Item::Type(old), Item::Type(new)) => self.type_body(old, new, level),
            (Item::Namespace(old), Item::Namespace(new))
                if old.name == new.name && old.usings == new.usings =>
            {
                let Some(range) = self.doc.range(old.id) else {
                    return false;
                };
                let Some(mut container) = self.braced(old.id, range.start, level + 1) else {
                    return false;
                };
                if let Some(last) = old.usings.last().and_then(|using| self.doc.range(using.id)) {
                    container.open = last.end;
                }
                self.list(&old.items, &new.items, container, Self::refine_item)
            }
            _ => false,
        }
    }

    /// Diffs the members of two type declarations with equal headers.
    fn type_body(&mut self, old: &TypeDecl, new: &TypeDecl, level: usize) -> bool {
        let same_header = old.trivia == new.trivia
            && old.modifiers == new.modifiers
            && old.kind == new.kind
            && old.name == new.name
            && old.type_params == new.type_params
            && old.bases == new.bases
            && old.constraints == new.constraints;
        if !same_header {
            return false;
        }
        let Some(name) = self.doc.range(old.name.id) else {
            return false;
        };
        let Some(container) = self.braced(old.id, name.end, level + 1) else {
            return false;
        };
        self.list(&old.members, &new.members, container, Self::refine_member)
    }

    fn refine_member(&mut self, old: &Member, new: &Member, level: usize) -> bool {
        match (old, new) {
            (Member::Type(old), Member::Type(new)) => self.type_body(old, new, level),
            (Member::Method(old), Member::Method(new)) => {
                let same_header = MethodDecl {
                    body: None,
                    ..old.clone()
                } == MethodDecl {
                    body: None,
                    ..new.clone()
                };
                match (&old.body, &new.body) {
                    (Some(old), Some(new)) if same_header => self.block(old, new, level + 1),
                    _ => false,
                }
            }
            (Member::Constructor(old), Member::Constructor(new)) => {
                let same_header = ConstructorDecl {
                    body: None,
                    ..old.clone()
                } == ConstructorDecl {
                    body: None,
                    ..new.clone()
                };
                match (&old.body, &new.body) {
                    (Some(old), Some(new)) if same_header => self.block(old, new, level + 1),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn refine_stmt(&mut self, old: &Stmt, new: &Stmt, level: usize) -> bool {
        match (&old.kind, &new.kind) {
            (StmtKind::Block(old_block), StmtKind::Block(new_block)) if old.trivia == new.trivia => {
                self.block(old_block, new_block, level + 1)
            }
            _ => false,
        }
    }

    /// Diffs the statements of two blocks; `level` is the statements' level.
    fn block(&mut self, old: &Block, new: &Block, level: usize) -> bool {
        let Some(range) = self.doc.range(old.id) else {
            return false;
        };
        let Some(container) = self.braced(old.id, range.start, level) else {
            return false;
        };
        self.list(&old.stmts, &new.stmts, container, Self::refine_stmt)
    }
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}
