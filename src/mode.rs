//! Input-handling modes and the status-line buffer.
//!
//! A mode owns a set of (key sequence, action) bindings which compete for
//! each incoming key. Modes form a tree through their abort parent; esc
//! walks up it. The dispatch itself lives on `Editor::handle_key`, which
//! is where the binding list and the rest of the editor state can both be
//! borrowed.

use std::ops::{Index, IndexMut};

use unicode_segmentation::UnicodeSegmentation;

use crate::editor::Editor;
use crate::keyseq::{KeySeq, Parse};

/// What a completed binding runs.
pub type Action = fn(&mut Editor, Parse);

#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum ModeId {
	Normal,
	Insert,
	ExCmd,
	Search,
	BackSearch,
}

/// Where the cursor visually lives while the mode is active.
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum Focus {
	Buffer,
	Sline,
}

pub struct Binding {
	pub seq: KeySeq,
	pub action: Action,
}

/// The mode determines everything about how the editor reacts to input.
/// Esc always exits a mode, restoring its abort parent; the normal mode
/// is its own parent.
pub struct Mode {
	pub label: &'static str,
	pub abort: ModeId,
	pub focus: Focus,
	pub insert: bool,
	pub(crate) bindings: Vec<Binding>,
	/// Keys consumed since the last reset; nonzero means a parse is in
	/// flight and esc cancels it instead of aborting the mode
	pub(crate) pending: usize,
}

impl Mode {
	pub fn new(abort: ModeId) -> Self {
		Self {
			label: "",
			abort,
			focus: Focus::Buffer,
			insert: false,
			bindings: vec![],
			pending: 0,
		}
	}

	pub fn with_label(mut self, label: &'static str) -> Self {
		self.label = label;
		self
	}

	pub fn with_focus(mut self, focus: Focus) -> Self {
		self.focus = focus;
		self
	}

	pub fn with_insert(mut self) -> Self {
		self.insert = true;
		self
	}

	pub fn bind(&mut self, seq: KeySeq, action: Action) {
		self.bindings.push(Binding { seq, action });
	}
}

/// The full mode graph, indexed by `ModeId`.
pub struct ModeSet {
	modes: [Mode; 5],
}

impl ModeSet {
	pub fn new(normal: Mode, insert: Mode, excmd: Mode, search: Mode, backsearch: Mode) -> Self {
		Self { modes: [normal, insert, excmd, search, backsearch] }
	}
}

impl Index<ModeId> for ModeSet {
	type Output = Mode;
	fn index(&self, id: ModeId) -> &Mode {
		&self.modes[id as usize]
	}
}

impl IndexMut<ModeId> for ModeSet {
	fn index_mut(&mut self, id: ModeId) -> &mut Mode {
		&mut self.modes[id as usize]
	}
}

/// A buffer for the contents of the status line, when the status line is
/// showing primary content (i.e. in command-line mode).
///
/// The first byte is the mode prefix (`:`, `/` or `?`); `pos` is the byte
/// position of the cursor within `buf` and never rests on the prefix.
#[derive(Default,Debug,Clone,PartialEq,Eq)]
pub struct StatusLineBuf {
	pub buf: String,
	pub pos: usize,
}

impl StatusLineBuf {
	pub fn seed(&mut self, prefix: char) {
		self.buf.clear();
		self.buf.push(prefix);
		self.pos = self.buf.len();
	}

	pub fn clear(&mut self) {
		self.buf.clear();
		self.pos = 0;
	}

	/// Everything after the mode prefix.
	pub fn body(&self) -> &str {
		let first = self.buf.chars().next().map(char::len_utf8).unwrap_or(0);
		&self.buf[first..]
	}

	fn prev_boundary(&self, at: usize) -> usize {
		self.buf[..at]
			.graphemes(true)
			.next_back()
			.map(|g| at - g.len())
			.unwrap_or(0)
	}

	fn next_boundary(&self, at: usize) -> usize {
		self.buf[at..]
			.graphemes(true)
			.next()
			.map(|g| at + g.len())
			.unwrap_or(at)
	}

	pub fn insert(&mut self, text: &str) {
		self.buf.insert_str(self.pos, text);
		self.pos += text.len();
	}

	/// Remove the grapheme left of the cursor. Returns true when the
	/// whole line (prefix included) is gone, which aborts the mode.
	pub fn backspace(&mut self) -> bool {
		if self.pos == 0 {
			return self.buf.is_empty()
		}
		let at = self.prev_boundary(self.pos);
		self.buf.replace_range(at..self.pos, "");
		self.pos = at;
		if self.pos == 0 {
			self.buf.clear();
			return true
		}
		false
	}

	/// Remove the grapheme under the cursor.
	pub fn delete(&mut self) {
		if self.pos < self.buf.len() {
			let end = self.next_boundary(self.pos);
			self.buf.replace_range(self.pos..end, "");
		}
	}

	pub fn left(&mut self) {
		let first = self.buf.chars().next().map(char::len_utf8).unwrap_or(0);
		if self.pos > first {
			self.pos = self.prev_boundary(self.pos);
		}
	}

	pub fn right(&mut self) {
		if self.pos < self.buf.len() {
			self.pos = self.next_boundary(self.pos);
		}
	}
}
