//! The `Editor` is the central container for state in the program.
//!
//! Everything that moves through the editor passes through this struct at
//! some point: the buffer, the status line, the mode graph, the ex-command
//! table and the UI handle all live here, and key dispatch threads them
//! together.

use log::{debug, trace};

use crate::buffer::Buffer;
use crate::color::ColorMap;
use crate::excmd::ExCmdTable;
use crate::keys::{KeyCode, KeyEvent};
use crate::keyseq::KeyExprError;
use crate::mode::{Focus, ModeId, ModeSet, StatusLineBuf};
use crate::modes;
use crate::ui::Ui;

pub struct Editor {
	pub buf: Buffer,
	pub sline: StatusLineBuf,
	pub excmds: ExCmdTable,
	pub colors: ColorMap,
	pub ui: Box<dyn Ui>,
	mode: ModeId,
	modes: ModeSet,
}

impl Editor {
	/// Build an editor with the default keymap and ex-command set.
	///
	/// Fails only if a default key expression does not parse, which is a
	/// startup-fatal condition.
	pub fn new(ui: Box<dyn Ui>) -> Result<Self, KeyExprError> {
		Ok(Self {
			buf: Buffer::new(),
			sline: StatusLineBuf::default(),
			excmds: ExCmdTable::with_builtins(),
			colors: ColorMap::new(),
			ui,
			mode: ModeId::Normal,
			modes: modes::default_modes()?,
		})
	}

	pub fn mode(&self) -> ModeId {
		self.mode
	}

	pub fn mode_label(&self) -> &'static str {
		self.modes[self.mode].label
	}

	pub fn focus(&self) -> Focus {
		self.modes[self.mode].focus
	}

	/// Switch modes and give the buffer a chance to re-clamp its cursor.
	pub fn set_mode(&mut self, id: ModeId) {
		let old = self.mode;
		self.mode = id;
		self.buf.set_insert_mode(self.modes[id].insert);
		self.buf.mode_changed();
		if old != id {
			debug!("mode {old:?} -> {id:?}");
		}
	}

	/// Exit the current mode, returning to its abort parent. Leaving a
	/// status-line mode discards the status line contents.
	pub fn abort_mode(&mut self) {
		let cur = self.mode;
		if self.modes[cur].focus == Focus::Sline {
			self.sline.clear();
		}
		let parent = self.modes[cur].abort;
		self.set_mode(parent);
	}

	/// Handle one keypress in the current mode.
	///
	/// Esc cancels an in-flight parse if there is one, otherwise aborts
	/// the mode. Any other key is offered to every binding that can still
	/// consume input; the first binding to complete wins and its action
	/// runs with the parsed value. When nothing can continue, all
	/// bindings reset.
	pub fn handle_key(&mut self, key: KeyEvent) {
		trace!("key: {key}");
		let id = self.mode;

		if key.0 == KeyCode::Esc && key.1.is_empty() {
			if self.modes[id].pending > 0 {
				self.reset_bindings(id);
			} else {
				self.abort_mode();
			}
			return
		}

		// The binding list is detached while we drive it so the action
		// can borrow the whole editor afterwards
		let mut bindings = std::mem::take(&mut self.modes[id].bindings);
		let mut fired = None;
		let mut try_again = false;

		for binding in bindings.iter_mut() {
			if !binding.seq.ready() {
				continue
			}
			binding.seq.offer(&key);
			if binding.seq.is_complete() {
				fired = Some((binding.action, binding.seq.get_parse()));
				try_again = false;
				break
			}
			if binding.seq.ready() {
				try_again = true;
			}
		}

		self.modes[id].bindings = bindings;

		if let Some((action, parse)) = fired {
			trace!("dispatch: {parse:?}");
			self.reset_bindings(id);
			action(self, parse);
		} else if try_again {
			self.modes[id].pending += 1;
		} else {
			self.reset_bindings(id);
		}
	}

	fn reset_bindings(&mut self, id: ModeId) {
		let mode = &mut self.modes[id];
		for binding in mode.bindings.iter_mut() {
			binding.seq.reset();
		}
		mode.pending = 0;
	}
}
