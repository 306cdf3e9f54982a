//! Insert-mode bindings. One choice catches everything: printable keys
//! insert, the rest edit or move.

use crate::editor::Editor;
use crate::keys::KeyCode;
use crate::keyseq::{KeyExprError, KeyMacros, Parse, parse_key_expr};
use crate::mode::Mode;

pub fn install(mode: &mut Mode, macros: &mut KeyMacros) -> Result<(), KeyExprError> {
	mode.bind(
		parse_key_expr("@|<backspace>|<delete>|<enter>|<left>|<right>|<up>|<down>", macros)?,
		do_insert_key,
	);
	Ok(())
}

fn do_insert_key(ed: &mut Editor, parse: Parse) {
	let Some(key) = parse.as_key() else { return };
	match &key.0 {
		KeyCode::Backspace => {
			let motion = ed.buf.left_motion(1);
			ed.buf.delete_motion(motion);
		}
		KeyCode::Delete => {
			let motion = ed.buf.right_motion(1);
			ed.buf.delete_motion(motion);
		}
		KeyCode::Enter => {
			let motion = ed.buf.insert("\n");
			ed.buf.exec_motion(motion);
		}
		KeyCode::Left => {
			let motion = ed.buf.left_motion(1);
			ed.buf.exec_motion(motion);
		}
		KeyCode::Right => {
			let motion = ed.buf.right_motion(1);
			ed.buf.exec_motion(motion);
		}
		KeyCode::Up => {
			let motion = ed.buf.up_motion(1);
			ed.buf.exec_motion(motion);
		}
		KeyCode::Down => {
			let motion = ed.buf.down_motion(1);
			ed.buf.exec_motion(motion);
		}
		_ => {
			let Some(text) = key.text() else { return };
			ed.buf.insert(&text);
			let motion = ed.buf.right_motion(1);
			ed.buf.exec_motion(motion);
		}
	}
	ed.ui.redraw();
}
