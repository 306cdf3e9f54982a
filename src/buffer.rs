//! The text buffer and its motion algebra.
//!
//! A `Buffer` stores a filesworth of text as a list of lines, maintains a
//! cursor, and hands out `Motion` values over that text. Motions are plain
//! data; the buffer executes them, deletes through them, or yields their
//! text. Every mutation keeps the region store consistent.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use regex::Regex;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::filetype::{self, FileType};
use crate::region::{self, Region, RegionOwner};

#[derive(Debug,Error)]
pub enum EditorError {
	#[error("No File Name")]
	NoFileName,
	#[error("Permission denied")]
	PermissionDenied,
	#[error("No Such File or Directory")]
	NotFound,
	#[error("{0}")]
	Io(io::Error),
	#[error("Invalid pattern: {0}")]
	BadPattern(#[from] regex::Error),
}

impl From<io::Error> for EditorError {
	fn from(err: io::Error) -> Self {
		match err.kind() {
			io::ErrorKind::NotFound => Self::NotFound,
			io::ErrorKind::PermissionDenied => Self::PermissionDenied,
			_ => Self::Io(err),
		}
	}
}

/// A position in the buffer: a row index and a byte column within that
/// row's UTF-8 text. Ordering is lexicographic.
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Debug,Default,Hash)]
pub struct Pos {
	pub row: usize,
	pub col: usize,
}

impl Pos {
	pub fn new(row: usize, col: usize) -> Self {
		Self { row, col }
	}
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
enum MotionShape {
	Char,
	/// Column-agnostic span; the field is the row the cursor lands on
	Line(usize),
	Null,
}

/// A movement of the cursor over a region of text, and much more than
/// that: the same value addresses the text for deletion or extraction.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct Motion {
	pub start: Pos,
	pub end: Pos,
	shape: MotionShape,
}

impl Motion {
	pub fn new(start: Pos, end: Pos) -> Self {
		Self { start, end, shape: MotionShape::Char }
	}

	/// A motion from one line to another, agnostic of column. The span
	/// covers whole lines including their trailing newlines.
	pub fn line(start_row: usize, end_row: usize) -> Self {
		let (start, end) = if end_row >= start_row {
			(Pos::new(start_row, 0), Pos::new(end_row + 1, 0))
		} else {
			(Pos::new(start_row + 1, 0), Pos::new(end_row, 0))
		};
		Self { start, end, shape: MotionShape::Line(end_row) }
	}

	/// The motion a failed search produces. Executing or deleting it does
	/// nothing.
	pub fn null() -> Self {
		Self { start: Pos::default(), end: Pos::default(), shape: MotionShape::Null }
	}

	pub fn is_null(&self) -> bool {
		self.shape == MotionShape::Null
	}

	pub fn ordered_coords(&self) -> (Pos, Pos) {
		if self.start <= self.end {
			(self.start, self.end)
		} else {
			(self.end, self.start)
		}
	}
}

struct SearchState {
	expr: Regex,
	backward: bool,
}

/// A filesworth of text, a cursor, and the machinery to move the one over
/// the other.
pub struct Buffer {
	pub lines: Vec<String>,
	pub row: usize,
	pub col: usize,
	pub col_want: usize,
	pub dirty: bool,
	pub path: Option<PathBuf>,
	markers: HashMap<char, Pos>,
	regions: Vec<Region>,
	search: Option<SearchState>,
	file_type: &'static dyn FileType,
	insert_mode: bool,
}

impl Default for Buffer {
	fn default() -> Self {
		Self::new()
	}
}

impl Buffer {
	pub fn new() -> Self {
		Self {
			lines: vec![String::new()],
			row: 0,
			col: 0,
			col_want: 0,
			dirty: false,
			path: None,
			markers: HashMap::new(),
			regions: vec![],
			search: None,
			file_type: filetype::plain_text(),
			insert_mode: false,
		}
	}

	pub fn with_text(mut self, text: &str) -> Self {
		let text = text.strip_suffix('\n').unwrap_or(text);
		self.lines = text.split('\n').map(str::to_string).collect();
		self
	}

	pub fn cursor(&self) -> Pos {
		Pos::new(self.row, self.col)
	}

	pub fn set_insert_mode(&mut self, on: bool) {
		self.insert_mode = on;
	}

	pub fn insert_mode(&self) -> bool {
		self.insert_mode
	}

	fn cur_line(&self) -> &str {
		&self.lines[self.row]
	}

	/* Column arithmetic. Columns are byte offsets, but the cursor only
	 * ever rests on grapheme boundaries, so all stepping goes through
	 * these helpers. */

	fn next_col(line: &str, col: usize) -> usize {
		line[col..].graphemes(true).next().map(|g| col + g.len()).unwrap_or(col)
	}

	fn prev_col(line: &str, col: usize) -> usize {
		line[..col].graphemes(true).next_back().map(|g| col - g.len()).unwrap_or(0)
	}

	fn col_forward(line: &str, col: usize, count: usize) -> usize {
		let mut col = col;
		for _ in 0..count {
			let next = Self::next_col(line, col);
			if next == col {
				break
			}
			col = next;
		}
		col
	}

	fn col_back(line: &str, col: usize, count: usize) -> usize {
		let mut col = col;
		for _ in 0..count {
			let prev = Self::prev_col(line, col);
			if prev == col {
				break
			}
			col = prev;
		}
		col
	}

	/// Byte offset of the last grapheme in the line, 0 when empty.
	fn last_col(line: &str) -> usize {
		Self::prev_col(line, line.len())
	}

	/// Round a column down to a grapheme boundary, clamping to line length.
	fn snap_col(line: &str, col: usize) -> usize {
		if col >= line.len() {
			return line.len()
		}
		let mut snapped = 0;
		for (at, _) in line.grapheme_indices(true) {
			if at > col {
				break
			}
			snapped = at;
		}
		snapped
	}

	/// Move the cursor, enforcing the mode-appropriate bounds. A column
	/// past the end of the line is remembered in `col_want` before being
	/// clamped, so vertical motions can drift back out.
	pub fn move_to(&mut self, row: usize, col: usize) {
		let row = row.min(self.lines.len() - 1);
		let line = &self.lines[row];
		let max_col = if self.insert_mode {
			line.len()
		} else {
			Self::last_col(line)
		};

		let col = if col > max_col {
			self.col_want = col;
			max_col
		} else {
			Self::snap_col(line, col)
		};

		self.row = row;
		self.col = col;
	}

	/// Notify this buffer of a mode change. The cursor may have a
	/// different set of legal columns now, so this is its opportunity to
	/// correct.
	pub fn mode_changed(&mut self) {
		if self.insert_mode {
			return
		}
		let line = &self.lines[self.row];
		if self.col >= line.len() && self.col > 0 {
			self.col = Self::last_col(line);
		}
	}

	/* Motion constructors */

	pub fn left_motion(&self, count: usize) -> Motion {
		let end = Self::col_back(self.cur_line(), self.col, count);
		Motion::new(self.cursor(), Pos::new(self.row, end))
	}

	pub fn right_motion(&self, count: usize) -> Motion {
		let end = Self::col_forward(self.cur_line(), self.col, count);
		Motion::new(self.cursor(), Pos::new(self.row, end))
	}

	pub fn up_motion(&self, count: usize) -> Motion {
		Motion::line(self.row, self.row.saturating_sub(count))
	}

	pub fn down_motion(&self, count: usize) -> Motion {
		Motion::line(self.row, (self.row + count).min(self.lines.len() - 1))
	}

	pub fn line_begin_motion(&self) -> Motion {
		Motion::new(self.cursor(), Pos::new(self.row, 0))
	}

	/// Character motion that treats the newline between lines as costing
	/// one column.
	pub fn forward_motion(&self, count: usize) -> Motion {
		let mut row = self.row;
		let mut col = self.col;
		let mut left = count;

		loop {
			let line = &self.lines[row];
			// Columns remaining strictly after the cursor on this line
			let rest = line[col.min(line.len())..].graphemes(true).count().saturating_sub(1);
			if left <= rest || row + 1 >= self.lines.len() {
				col = Self::col_forward(line, col, left);
				break
			}
			left -= rest + 1;
			row += 1;
			col = 0;
			if left == 0 {
				break
			}
		}

		Motion::new(self.cursor(), Pos::new(row, col))
	}

	pub fn backward_motion(&self, count: usize) -> Motion {
		let mut row = self.row;
		let mut col = self.col;
		let mut left = count;

		loop {
			let line = &self.lines[row];
			let avail = line[..col.min(line.len())].graphemes(true).count();
			if left <= avail || row == 0 {
				col = Self::col_back(line, col, left);
				break
			}
			left -= avail + 1;
			row -= 1;
			col = Self::last_col(&self.lines[row]);
			if left == 0 {
				break
			}
		}

		Motion::new(self.cursor(), Pos::new(row, col))
	}

	/* Motion consumers */

	/// Move the cursor to the motion's end.
	pub fn exec_motion(&mut self, motion: Motion) {
		match motion.shape {
			MotionShape::Null => {}
			MotionShape::Line(target) => {
				let want = self.col_want;
				self.move_to(target, want);
			}
			MotionShape::Char => {
				self.move_to(motion.end.row, motion.end.col);
				self.col_want = motion.end.col;
			}
		}
	}

	/// Remove the half-open range the motion covers. The cursor lands at
	/// the low end of the range.
	pub fn delete_motion(&mut self, motion: Motion) {
		if motion.is_null() {
			return
		}
		let (lo, hi) = motion.ordered_coords();
		self.delete_range(lo, hi);
	}

	fn delete_range(&mut self, lo: Pos, hi: Pos) {
		let mut lo = lo;
		lo.row = lo.row.min(self.lines.len() - 1);
		lo.col = Self::snap_col(&self.lines[lo.row], lo.col);

		let mut hi = hi;
		if hi <= lo {
			return
		}

		if hi.row >= self.lines.len() {
			// The span runs past the final line, so the tail of the
			// buffer goes away wholesale
			let keep = self.lines[lo.row][..lo.col].to_string();
			self.lines.truncate(lo.row);
			if lo.col > 0 || self.lines.is_empty() {
				self.lines.push(keep);
			}
		} else {
			hi.col = Self::snap_col(&self.lines[hi.row], hi.col);
			if lo.row == hi.row {
				self.lines[lo.row].replace_range(lo.col..hi.col, "");
			} else {
				let tail = self.lines[hi.row][hi.col..].to_string();
				let line = &mut self.lines[lo.row];
				line.truncate(lo.col);
				line.push_str(&tail);
				self.lines.drain(lo.row + 1..=hi.row);
			}
		}

		self.dirty = true;
		region::collapse(&mut self.regions, lo, hi);
		self.move_to(lo.row, lo.col);
		self.col_want = self.col;
	}

	/// The textual contents of the motion's range, with `\n` between line
	/// spans.
	pub fn motion_text(&self, motion: Motion) -> String {
		if motion.is_null() {
			return String::new()
		}
		let (lo, hi) = motion.ordered_coords();
		self.text_between(lo, hi)
	}

	pub fn text_between(&self, lo: Pos, hi: Pos) -> String {
		let mut row = lo.row.min(self.lines.len() - 1);
		let mut col = Self::snap_col(&self.lines[row], lo.col);

		let (last_row, last_col) = if hi.row >= self.lines.len() {
			let last = self.lines.len() - 1;
			(last, self.lines[last].len())
		} else {
			(hi.row, Self::snap_col(&self.lines[hi.row], hi.col))
		};

		let mut out = String::new();
		while row < last_row {
			out.push_str(&self.lines[row][col..]);
			out.push('\n');
			row += 1;
			col = 0;
		}
		if col <= last_col {
			out.push_str(&self.lines[row][col..last_col]);
		}
		out
	}

	/// Insert text at the given position (default: the cursor). The first
	/// line fragment goes inline; later fragments become new lines, and
	/// the split-off rest of the line reattaches after the last one.
	/// Returns the motion spanning the insertion.
	pub fn insert(&mut self, text: &str) -> Motion {
		self.insert_at(text, self.row, self.col)
	}

	pub fn insert_at(&mut self, text: &str, row: usize, col: usize) -> Motion {
		let row = row.min(self.lines.len() - 1);
		let col = Self::snap_col(&self.lines[row], col);

		let mut parts = text.split('\n');
		let first = parts.next().unwrap_or_default();
		let postfix = self.lines[row].split_off(col);
		self.lines[row].push_str(first);

		let mut end_row = row;
		for part in parts {
			end_row += 1;
			self.lines.insert(end_row, part.to_string());
		}

		let end_col = self.lines[end_row].len();
		self.lines[end_row].push_str(&postfix);

		self.dirty = true;
		let start = Pos::new(row, col);
		let end = Pos::new(end_row, end_col);
		region::expand(&mut self.regions, start, end);
		Motion::new(start, end)
	}

	/* Markers */

	/// Store a mark which can be returned to, named by a single character.
	pub fn mark(&mut self, name: char) {
		self.markers.insert(name, self.cursor());
	}

	pub fn marker(&self, name: char) -> Option<Pos> {
		self.markers.get(&name).copied()
	}

	/// Jump to a stored mark. The unnamed mark `'` records where the jump
	/// came from.
	pub fn restore_mark(&mut self, name: char) -> bool {
		let Some(&target) = self.markers.get(&name) else {
			return false
		};
		self.mark('\'');
		self.move_to(target.row, target.col);
		true
	}

	/* Search */

	/// Compile and store a search pattern for later `n`/`N` repetition.
	pub fn search(&mut self, pattern: &str, backward: bool) -> Result<(), EditorError> {
		let expr = Regex::new(pattern)?;
		self.search = Some(SearchState { expr, backward });
		Ok(())
	}

	pub fn has_search(&self) -> bool {
		self.search.is_some()
	}

	pub fn search_pattern(&self) -> Option<&str> {
		self.search.as_ref().map(|s| s.expr.as_str())
	}

	fn line_match(expr: &Regex, line: &str, min_start: Option<usize>) -> Option<usize> {
		expr.find_iter(line)
			.filter(|m| m.start() < m.end())
			.find(|m| min_start.is_none_or(|min| m.start() >= min))
			.map(|m| m.start())
	}

	fn line_rmatch(expr: &Regex, line: &str, limit: Option<usize>) -> Option<usize> {
		expr.find_iter(line)
			.filter(|m| m.start() < m.end())
			.take_while(|m| limit.is_none_or(|lim| m.start() < lim))
			.last()
			.map(|m| m.start())
	}

	/// The next match strictly after `from`, scanning forward line by line
	/// and wrapping at end of buffer. Zero-width matches are skipped.
	pub fn forward_search(&self, from: Pos) -> Option<Pos> {
		let state = self.search.as_ref()?;
		let line = &self.lines[from.row.min(self.lines.len() - 1)];
		let after = Self::next_col(line, from.col.min(line.len()));

		if let Some(col) = Self::line_match(&state.expr, line, Some(after)) {
			return Some(Pos::new(from.row, col))
		}
		for row in from.row + 1..self.lines.len() {
			if let Some(col) = Self::line_match(&state.expr, &self.lines[row], None) {
				return Some(Pos::new(row, col))
			}
		}
		for row in 0..=from.row.min(self.lines.len() - 1) {
			if let Some(col) = Self::line_match(&state.expr, &self.lines[row], None) {
				return Some(Pos::new(row, col))
			}
		}
		None
	}

	/// The nearest match strictly before `from`, scanning backward and
	/// wrapping at the top of the buffer.
	pub fn backward_search(&self, from: Pos) -> Option<Pos> {
		let state = self.search.as_ref()?;
		let row = from.row.min(self.lines.len() - 1);

		if let Some(col) = Self::line_rmatch(&state.expr, &self.lines[row], Some(from.col)) {
			return Some(Pos::new(row, col))
		}
		for row in (0..row).rev() {
			if let Some(col) = Self::line_rmatch(&state.expr, &self.lines[row], None) {
				return Some(Pos::new(row, col))
			}
		}
		for row in (from.row..self.lines.len()).rev() {
			if let Some(col) = Self::line_rmatch(&state.expr, &self.lines[row], None) {
				return Some(Pos::new(row, col))
			}
		}
		None
	}

	/// The next match in the stored direction.
	pub fn next_search(&self) -> Option<Pos> {
		let state = self.search.as_ref()?;
		if state.backward {
			self.backward_search(self.cursor())
		} else {
			self.forward_search(self.cursor())
		}
	}

	/// The next match against the stored direction.
	pub fn prev_search(&self) -> Option<Pos> {
		let state = self.search.as_ref()?;
		if state.backward {
			self.forward_search(self.cursor())
		} else {
			self.backward_search(self.cursor())
		}
	}

	/* Regions */

	pub fn add_region(&mut self, region: Region) {
		region::insert_sorted(&mut self.regions, region);
	}

	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	pub fn clear_regions(&mut self, owner: RegionOwner) {
		self.regions.retain(|r| r.owner != owner);
	}

	/// The regions touching a row, merged with live matches of the active
	/// search pattern tagged `search`, sorted by start. Search regions are
	/// never stored; they are computed on demand.
	pub fn regions_for_line(&self, row: usize) -> Vec<Region> {
		let mut out: Vec<Region> = self.regions.iter()
			.filter(|r| r.contains_row(row))
			.cloned()
			.collect();
		if let Some(state) = &self.search {
			for m in state.expr.find_iter(&self.lines[row]) {
				if m.start() == m.end() {
					continue
				}
				out.push(Region::new(
					RegionOwner::Search,
					"search",
					Pos::new(row, m.start()),
					Pos::new(row, m.end()),
				));
			}
		}
		out.sort_by(|a, b| a.start.cmp(&b.start));
		out
	}

	/* File I/O */

	/// Replace the contents of this buffer with the contents of the file
	/// at the given path. A trailing newline is dropped rather than kept
	/// as an empty final line.
	pub fn load_file(&mut self, path: &Path) -> Result<(), EditorError> {
		let mut text = fs::read_to_string(path)?;
		if text.ends_with('\n') {
			text.pop();
		}
		self.lines = text.split('\n').map(str::to_string).collect();
		self.path = Some(path.to_path_buf());
		self.row = 0;
		self.col = 0;
		self.col_want = 0;
		self.markers.clear();
		self.regions.clear();
		self.file_type = filetype::for_mime(filetype::detect_mime(path));
		let ft = self.file_type;
		ft.load(self);
		self.dirty = false;
		info!("loaded {} ({} lines)", path.display(), self.lines.len());
		Ok(())
	}

	/// Write the buffer out, newline-terminated. Writing to the buffer's
	/// own file clears the dirty flag; a pathless buffer adopts the first
	/// path it is written to.
	pub fn write_file(&mut self, path: Option<&Path>) -> Result<(), EditorError> {
		let target: PathBuf = match path {
			Some(p) => p.to_path_buf(),
			None => self.path.clone().ok_or(EditorError::NoFileName)?,
		};
		let mut text = self.lines.join("\n");
		text.push('\n');
		fs::write(&target, text)?;

		match &self.path {
			Some(own) => {
				if same_file(own, &target) {
					self.dirty = false;
				}
			}
			None => {
				self.path = Some(target.clone());
				self.dirty = false;
			}
		}
		info!("wrote {}", target.display());
		Ok(())
	}
}

fn same_file(a: &Path, b: &Path) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}
