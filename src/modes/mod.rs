//! The default binding sets for each mode.
//!
//! Bindings are key expressions compiled into live `KeySeq` parsers and
//! paired with the action the completed parse runs. This module builds
//! the whole mode graph; the per-mode files hold their bindings and
//! actions.

use crate::editor::Editor;
use crate::keyseq::{KeyExprError, KeyMacros, Parse};
use crate::mode::{Focus, Mode, ModeId, ModeSet};

pub mod normal;
pub mod insert;
pub mod ex;
pub mod search;

/// Construct the default mode graph. The normal mode is its own abort
/// parent; everything else aborts back to normal.
pub fn default_modes() -> Result<ModeSet, KeyExprError> {
	let mut macros = KeyMacros::new();

	let mut normal = Mode::new(ModeId::Normal);
	normal::install(&mut normal, &mut macros)?;

	let mut insert = Mode::new(ModeId::Normal)
		.with_label("-- INSERT --")
		.with_insert();
	insert::install(&mut insert, &mut macros)?;

	let mut excmd = Mode::new(ModeId::Normal).with_focus(Focus::Sline);
	ex::install(&mut excmd, &mut macros)?;

	// Forward and backward search share one binding set; the submit
	// action reads the active mode for its direction
	let mut search_fwd = Mode::new(ModeId::Normal).with_focus(Focus::Sline);
	search::install(&mut search_fwd, &mut macros)?;
	let mut search_back = Mode::new(ModeId::Normal).with_focus(Focus::Sline);
	search::install(&mut search_back, &mut macros)?;

	Ok(ModeSet::new(normal, insert, excmd, search_fwd, search_back))
}

/* Status-line editing, shared by the ex and search modes. */

pub(super) fn sline_insert(ed: &mut Editor, parse: Parse) {
	let Some(text) = parse.as_key().and_then(|k| k.text()) else {
		return
	};
	ed.sline.insert(&text);
	ed.ui.redraw();
}

pub(super) fn sline_backspace(ed: &mut Editor, _: Parse) {
	if ed.sline.backspace() {
		ed.abort_mode();
	}
	ed.ui.redraw();
}

pub(super) fn sline_delete(ed: &mut Editor, _: Parse) {
	ed.sline.delete();
	ed.ui.redraw();
}

pub(super) fn sline_left(ed: &mut Editor, _: Parse) {
	ed.sline.left();
	ed.ui.redraw();
}

pub(super) fn sline_right(ed: &mut Editor, _: Parse) {
	ed.sline.right();
	ed.ui.redraw();
}
