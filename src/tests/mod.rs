use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::Buffer;
use crate::editor::Editor;
use crate::notated_bytes;
use crate::reader::{KeyReader, RawReader};
use crate::ui::Ui;

pub mod keyseq;
pub mod modes;

/// Captures everything the core asks of its UI so tests can assert on it.
#[derive(Default,Debug)]
pub struct UiState {
	pub notifications: Vec<(String, bool)>,
	pub redraws: usize,
	pub quit: bool,
}

impl UiState {
	pub fn errors(&self) -> Vec<&str> {
		self.notifications.iter()
			.filter(|(_, error)| *error)
			.map(|(msg, _)| msg.as_str())
			.collect()
	}
}

pub struct RecordingUi {
	state: Rc<RefCell<UiState>>,
}

impl Ui for RecordingUi {
	fn quit(&mut self) {
		self.state.borrow_mut().quit = true;
	}
	fn notify(&mut self, message: &str, error: bool) {
		self.state.borrow_mut().notifications.push((message.to_string(), error));
	}
	fn redraw(&mut self) {
		self.state.borrow_mut().redraws += 1;
	}
}

pub fn editor() -> (Editor, Rc<RefCell<UiState>>) {
	let state = Rc::new(RefCell::new(UiState::default()));
	let ui = RecordingUi { state: Rc::clone(&state) };
	(Editor::new(Box::new(ui)).unwrap(), state)
}

pub fn editor_with(text: &str) -> (Editor, Rc<RefCell<UiState>>) {
	let (mut ed, state) = editor();
	ed.buf = Buffer::new().with_text(text);
	(ed, state)
}

/// Feed a key script through the same byte decoding the binary uses.
/// Special keys are written in vi notation: `<esc>`, `<CR>`, `<BS>`,
/// `<tab>`, `<del>`, `<left>` and friends.
pub fn press(ed: &mut Editor, input: &str) {
	let mut reader = RawReader::new().with_initial(&notated_bytes(input));
	while let Some(key) = reader.read_key() {
		ed.handle_key(key);
	}
}

pub fn lines(ed: &Editor) -> Vec<&str> {
	ed.buf.lines.iter().map(String::as_str).collect()
}
