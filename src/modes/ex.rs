//! Ex (command-line) mode: the status line collects a command which
//! enter submits and tab completes.

use crate::editor::Editor;
use crate::excmd::{self, common_prefix};
use crate::keyseq::{KeyExprError, KeyMacros, Parse, parse_key_expr};
use crate::mode::Mode;

use super::{sline_backspace, sline_delete, sline_insert, sline_left, sline_right};

pub fn install(mode: &mut Mode, macros: &mut KeyMacros) -> Result<(), KeyExprError> {
	mode.bind(parse_key_expr("<enter>", macros)?, do_submit);
	mode.bind(parse_key_expr("<tab>", macros)?, do_complete);
	mode.bind(parse_key_expr("@", macros)?, sline_insert);
	mode.bind(parse_key_expr("<backspace>", macros)?, sline_backspace);
	mode.bind(parse_key_expr("<delete>", macros)?, sline_delete);
	mode.bind(parse_key_expr("<left>", macros)?, sline_left);
	mode.bind(parse_key_expr("<right>", macros)?, sline_right);
	Ok(())
}

fn do_submit(ed: &mut Editor, _: Parse) {
	let line = ed.sline.body().to_string();
	ed.abort_mode();
	excmd::do_excmd(ed, &line);
	ed.ui.redraw();
}

/// Complete the command name before the first space, or hand the
/// argument to the command's completer after it. Either way the input
/// extends to the longest common prefix of the candidates.
fn do_complete(ed: &mut Editor, _: Parse) {
	let body = ed.sline.body().to_string();

	let completed = match body.split_once(char::is_whitespace) {
		None => {
			let cands: Vec<String> = ed.excmds.names()
				.filter(|name| name.starts_with(&body))
				.map(str::to_string)
				.collect();
			common_prefix(&cands).filter(|ext| ext.len() > body.len())
		}
		Some((name, partial)) => {
			let partial = partial.trim_start();
			let completer = ed.excmds.lookup(name).and_then(|cmd| cmd.complete);
			let Some(complete) = completer else {
				return
			};
			let cands = complete(ed, partial);
			common_prefix(&cands)
				.filter(|ext| ext.len() > partial.len())
				.map(|ext| format!("{name} {ext}"))
		}
	};

	if let Some(new_body) = completed {
		let prefix = ed.sline.buf.chars().next().unwrap_or(':');
		ed.sline.buf = format!("{prefix}{new_body}");
		ed.sline.pos = ed.sline.buf.len();
		ed.ui.redraw();
	}
}
