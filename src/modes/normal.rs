//! Normal-mode bindings: motions, counts, deletes, marks, and the
//! entries into every other mode.

use crate::buffer::Motion;
use crate::editor::Editor;
use crate::keys::KeyCode;
use crate::keyseq::{KeyExprError, KeyMacros, Parse, parse_key_expr};
use crate::mode::{Mode, ModeId};

/// Characters a mark may be named with. Backtick aliases the unnamed
/// jump mark.
const MARK_NAMES: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ'`0123456789";

pub fn install(mode: &mut Mode, macros: &mut KeyMacros) -> Result<(), KeyExprError> {
	// The motion group is a macro so operators like `d` can reuse it.
	// `0` lives outside the counted alternative: a zero never starts a
	// count, which leaves it free to mean line-start.
	macros.group("motion", Some(normalize_motion));
	macros.add_alternative("motion", "#?(h|j|k|l|<enter>| |<backspace>)", None)?;
	macros.add_alternative("motion", "0", None)?;

	mode.bind(parse_key_expr("`motion`", macros)?, do_motion);
	mode.bind(parse_key_expr("#?(n|N)", macros)?, do_search_repeat);
	mode.bind(parse_key_expr("#?d(d|`motion`)", macros)?, do_delete);
	mode.bind(parse_key_expr("#?x", macros)?, do_delete_char);
	mode.bind(parse_key_expr("m@", macros)?, do_mark);
	mode.bind(parse_key_expr("('|<`>)@", macros)?, do_goto_mark);
	mode.bind(parse_key_expr("/", macros)?, do_search_fwd);
	mode.bind(parse_key_expr("<?>", macros)?, do_search_back);
	mode.bind(parse_key_expr(":", macros)?, do_excmd_mode);
	mode.bind(parse_key_expr("i|a|A", macros)?, do_insert);
	Ok(())
}

/// Normalize every motion alternative to `[count, key]` so consumers
/// see one shape.
fn normalize_motion(parse: Parse) -> Parse {
	match parse {
		list @ Parse::List(_) => list,
		key @ Parse::Key(_) => Parse::List(vec![Parse::None, key]),
		other => other,
	}
}

/// Turn a normalized motion parse into a buffer motion. The explicit
/// count on the motion wins over one inherited from an operator.
fn motion_from_parse(ed: &Editor, parse: &Parse, outer: Option<usize>) -> Option<Motion> {
	let items = parse.as_list()?;
	let count = items.first()?.as_num().or(outer).unwrap_or(1);
	let key = items.get(1)?.as_key()?;

	let buf = &ed.buf;
	let motion = match &key.0 {
		KeyCode::Char('h') => buf.left_motion(count),
		KeyCode::Char('l') => buf.right_motion(count),
		KeyCode::Char('k') => buf.up_motion(count),
		KeyCode::Char('j') | KeyCode::Enter => buf.down_motion(count),
		KeyCode::Char(' ') => buf.forward_motion(count),
		KeyCode::Backspace => buf.backward_motion(count),
		KeyCode::Char('0') => buf.line_begin_motion(),
		_ => return None,
	};
	Some(motion)
}

fn do_motion(ed: &mut Editor, parse: Parse) {
	let Some(motion) = motion_from_parse(ed, &parse, None) else {
		return
	};
	ed.buf.exec_motion(motion);
	ed.ui.redraw();
}

fn do_search_repeat(ed: &mut Editor, parse: Parse) {
	let Some(items) = parse.as_list() else { return };
	let count = items[0].as_num().unwrap_or(1);
	let reverse = items[1].char() == Some('N');

	if !ed.buf.has_search() {
		ed.ui.notify("No previous search", true);
		return
	}
	for _ in 0..count {
		let found = if reverse {
			ed.buf.prev_search()
		} else {
			ed.buf.next_search()
		};
		let motion = match found {
			Some(pos) => Motion::new(ed.buf.cursor(), pos),
			None => Motion::null(),
		};
		if motion.is_null() {
			let msg = format!(
				"Pattern not found: {}",
				ed.buf.search_pattern().unwrap_or_default(),
			);
			ed.ui.notify(&msg, true);
			return
		}
		ed.buf.exec_motion(motion);
	}
	ed.ui.redraw();
}

fn do_delete(ed: &mut Editor, parse: Parse) {
	let Some(items) = parse.as_list() else { return };
	let outer = items[0].as_num();

	let motion = match &items[2] {
		// `dd` deletes whole lines, count included
		Parse::Key(key) if key.is_char('d') => {
			ed.buf.down_motion(outer.unwrap_or(1) - 1)
		}
		sub => match motion_from_parse(ed, sub, outer) {
			Some(motion) => motion,
			None => return,
		},
	};
	ed.buf.delete_motion(motion);
	ed.ui.redraw();
}

fn do_delete_char(ed: &mut Editor, parse: Parse) {
	let Some(items) = parse.as_list() else { return };
	let count = items[0].as_num().unwrap_or(1);
	let motion = ed.buf.right_motion(count);
	ed.buf.delete_motion(motion);
	ed.ui.redraw();
}

fn do_mark(ed: &mut Editor, parse: Parse) {
	let Some(items) = parse.as_list() else { return };
	let Some(mut name) = items[1].char() else { return };
	if !MARK_NAMES.contains(name) {
		return
	}
	if name == '`' {
		name = '\'';
	}
	ed.buf.mark(name);
}

fn do_goto_mark(ed: &mut Editor, parse: Parse) {
	let Some(items) = parse.as_list() else { return };
	let Some(mut name) = items[1].char() else { return };
	if name == '`' {
		name = '\'';
	}
	if ed.buf.restore_mark(name) {
		ed.ui.redraw();
	}
}

fn do_search_fwd(ed: &mut Editor, _: Parse) {
	ed.sline.seed('/');
	ed.set_mode(ModeId::Search);
	ed.ui.redraw();
}

fn do_search_back(ed: &mut Editor, _: Parse) {
	ed.sline.seed('?');
	ed.set_mode(ModeId::BackSearch);
	ed.ui.redraw();
}

fn do_excmd_mode(ed: &mut Editor, _: Parse) {
	ed.sline.seed(':');
	ed.set_mode(ModeId::ExCmd);
	ed.ui.redraw();
}

fn do_insert(ed: &mut Editor, parse: Parse) {
	let Some(which) = parse.char() else { return };
	ed.set_mode(ModeId::Insert);
	match which {
		'a' => {
			let motion = ed.buf.right_motion(1);
			ed.buf.exec_motion(motion);
		}
		'A' => {
			let end = ed.buf.lines[ed.buf.row].len();
			ed.buf.move_to(ed.buf.row, end);
		}
		_ => {}
	}
	ed.ui.redraw();
}
