//! File type detection and syntax region population.
//!
//! A file type gets one shot at a freshly loaded buffer to lay down
//! syntax regions. Detection is by MIME name, guessed from the file
//! extension; unknown types fall back to plain text, which highlights
//! nothing.

use std::path::Path;

use regex::Regex;

use crate::buffer::{Buffer, Pos};
use crate::region::{Region, RegionOwner};

pub trait FileType: Sync {
	/// Rebuild syntax regions for a freshly loaded buffer.
	fn load(&self, buf: &mut Buffer);
}

struct PlainText;

impl FileType for PlainText {
	fn load(&self, _buf: &mut Buffer) {}
}

struct RustSource;

impl FileType for RustSource {
	fn load(&self, buf: &mut Buffer) {
		let keywords = Regex::new(
			r"\b(?:as|break|const|continue|dyn|else|enum|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|static|struct|trait|type|unsafe|use|where|while)\b",
		).unwrap();

		let mut found = vec![];
		for (row, line) in buf.lines.iter().enumerate() {
			let code_end = line.find("//").unwrap_or(line.len());
			if code_end < line.len() {
				found.push(Region::new(
					RegionOwner::Syntax,
					"comment",
					Pos::new(row, code_end),
					Pos::new(row, line.len()),
				));
			}
			for m in keywords.find_iter(&line[..code_end]) {
				found.push(Region::new(
					RegionOwner::Syntax,
					"keyword",
					Pos::new(row, m.start()),
					Pos::new(row, m.end()),
				));
			}
		}
		for region in found {
			buf.add_region(region);
		}
	}
}

static PLAIN_TEXT: PlainText = PlainText;
static RUST_SOURCE: RustSource = RustSource;

pub fn plain_text() -> &'static dyn FileType {
	&PLAIN_TEXT
}

pub fn detect_mime(path: &Path) -> &'static str {
	match path.extension().and_then(|ext| ext.to_str()) {
		Some("rs") => "text/x-rust",
		_ => "text/plain",
	}
}

pub fn for_mime(mime: &str) -> &'static dyn FileType {
	match mime {
		"text/x-rust" => &RUST_SOURCE,
		_ => &PLAIN_TEXT,
	}
}
