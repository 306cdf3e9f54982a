//! Search modes. The pattern collects on the status line; enter compiles
//! it, records the jump point, and moves to the first match in the
//! mode's direction.

use crate::buffer::Motion;
use crate::editor::Editor;
use crate::keyseq::{KeyExprError, KeyMacros, Parse, parse_key_expr};
use crate::mode::{Mode, ModeId};

use super::{sline_backspace, sline_delete, sline_insert, sline_left, sline_right};

pub fn install(mode: &mut Mode, macros: &mut KeyMacros) -> Result<(), KeyExprError> {
	mode.bind(parse_key_expr("<enter>", macros)?, do_submit);
	mode.bind(parse_key_expr("@", macros)?, sline_insert);
	mode.bind(parse_key_expr("<backspace>", macros)?, sline_backspace);
	mode.bind(parse_key_expr("<delete>", macros)?, sline_delete);
	mode.bind(parse_key_expr("<left>", macros)?, sline_left);
	mode.bind(parse_key_expr("<right>", macros)?, sline_right);
	Ok(())
}

fn do_submit(ed: &mut Editor, _: Parse) {
	let backward = ed.mode() == ModeId::BackSearch;
	let pattern = ed.sline.body().to_string();
	ed.abort_mode();

	if pattern.is_empty() {
		return
	}

	// The unnamed mark records where the jump came from
	ed.buf.mark('\'');

	if let Err(e) = ed.buf.search(&pattern, backward) {
		ed.ui.notify(&e.to_string(), true);
		return
	}

	let found = if backward {
		ed.buf.backward_search(ed.buf.cursor())
	} else {
		ed.buf.forward_search(ed.buf.cursor())
	};
	let motion = match found {
		Some(pos) => Motion::new(ed.buf.cursor(), pos),
		None => Motion::null(),
	};
	if motion.is_null() {
		ed.ui.notify(&format!("Pattern not found: {pattern}"), true);
	} else {
		ed.buf.exec_motion(motion);
	}
	ed.ui.redraw();
}
