use pretty_assertions::assert_eq;

use crate::buffer::Pos;
use crate::mode::ModeId;

use super::{editor_with, lines, press};

#[test]
fn motions_move_the_cursor() {
	let (mut ed, _) = editor_with("abc\ndef\nghi");
	press(&mut ed, "jl");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 1));
	press(&mut ed, "k");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 1));
	press(&mut ed, "h");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
}

#[test]
fn counts_multiply_motions() {
	let (mut ed, _) = editor_with("hello world\nsecond line\nthird line");
	press(&mut ed, "3l");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 3));
	press(&mut ed, "2j");
	assert_eq!(ed.buf.cursor(), Pos::new(2, 3));
	press(&mut ed, "2h");
	assert_eq!(ed.buf.cursor(), Pos::new(2, 1));
}

#[test]
fn enter_and_space_are_motions_too() {
	let (mut ed, _) = editor_with("ab\ncd");
	press(&mut ed, "<CR>");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 0));
	let (mut ed, _) = editor_with("ab\ncd");
	press(&mut ed, "2 ");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 0));
	press(&mut ed, "<BS>");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 1));
}

#[test]
fn zero_moves_to_line_start_instead_of_counting() {
	let (mut ed, _) = editor_with("hello world");
	press(&mut ed, "5l");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 5));
	press(&mut ed, "0");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
	// But an interior zero still builds the count
	press(&mut ed, "10l");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 10));
}

#[test]
fn dd_deletes_lines_with_count() {
	let (mut ed, _) = editor_with("one\ntwo\nthree\nfour");
	press(&mut ed, "dd");
	assert_eq!(lines(&ed), vec!["two", "three", "four"]);
	press(&mut ed, "2dd");
	assert_eq!(lines(&ed), vec!["four"]);
	assert!(ed.buf.dirty);
}

#[test]
fn delete_composes_with_motions() {
	let (mut ed, _) = editor_with("one\ntwo\nthree");
	press(&mut ed, "dj");
	assert_eq!(lines(&ed), vec!["three"]);

	let (mut ed, _) = editor_with("hello world");
	press(&mut ed, "d3l");
	assert_eq!(lines(&ed), vec!["lo world"]);

	let (mut ed, _) = editor_with("hello");
	press(&mut ed, "3ld0");
	assert_eq!(lines(&ed), vec!["lo"]);
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
}

#[test]
fn outer_count_reaches_the_motion() {
	let (mut ed, _) = editor_with("abcdefgh");
	press(&mut ed, "2dl");
	assert_eq!(lines(&ed), vec!["cdefgh"]);
}

#[test]
fn x_deletes_characters() {
	let (mut ed, _) = editor_with("abcdef");
	press(&mut ed, "x");
	assert_eq!(lines(&ed), vec!["bcdef"]);
	press(&mut ed, "3x");
	assert_eq!(lines(&ed), vec!["ef"]);
}

#[test]
fn marks_set_and_restore() {
	let (mut ed, _) = editor_with("abc\ndef\nghi");
	press(&mut ed, "jlma");
	assert_eq!(ed.buf.marker('a'), Some(Pos::new(1, 1)));
	press(&mut ed, "k0");
	press(&mut ed, "'a");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 1));
	// The jump set the unnamed mark to where we came from
	assert_eq!(ed.buf.marker('\''), Some(Pos::new(0, 0)));
	press(&mut ed, "`'");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
}

#[test]
fn backtick_mark_names_alias_the_quote() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, "lm`");
	assert_eq!(ed.buf.marker('\''), Some(Pos::new(0, 1)));
}

#[test]
fn insert_mode_inserts_printables() {
	let (mut ed, _) = editor_with("world");
	press(&mut ed, "i");
	assert_eq!(ed.mode(), ModeId::Insert);
	assert!(ed.buf.insert_mode());
	press(&mut ed, "hello <esc>");
	assert_eq!(lines(&ed), vec!["hello world"]);
	assert_eq!(ed.mode(), ModeId::Normal);
	assert!(!ed.buf.insert_mode());
	assert_eq!(ed.buf.cursor(), Pos::new(0, 6));
}

#[test]
fn append_enters_insert_after_cursor() {
	let (mut ed, _) = editor_with("ac");
	press(&mut ed, "ab<esc>");
	assert_eq!(lines(&ed), vec!["abc"]);
}

#[test]
fn append_at_end_of_line() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, "A!<esc>");
	assert_eq!(lines(&ed), vec!["abc!"]);
	assert_eq!(ed.buf.cursor(), Pos::new(0, 3));
}

#[test]
fn insert_mode_enter_splits_the_line() {
	let (mut ed, _) = editor_with("abdef");
	press(&mut ed, "llic<CR><esc>");
	assert_eq!(lines(&ed), vec!["abc", "def"]);
	assert_eq!(ed.buf.cursor(), Pos::new(1, 0));
}

#[test]
fn insert_mode_backspace_and_delete() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, "Ax<BS><BS><esc>");
	assert_eq!(lines(&ed), vec!["ab"]);

	let (mut ed, _) = editor_with("abc");
	press(&mut ed, "i<del><esc>");
	assert_eq!(lines(&ed), vec!["bc"]);
}

#[test]
fn insert_mode_arrows_move() {
	let (mut ed, _) = editor_with("abc\ndef");
	press(&mut ed, "i<down><right>x<esc>");
	assert_eq!(lines(&ed), vec!["abc", "dxef"]);
}

#[test]
fn esc_cancels_a_pending_parse_before_aborting() {
	let (mut ed, _) = editor_with("abc\ndef");
	// d is mid-parse; esc throws it away and stays in normal mode
	press(&mut ed, "d<esc>d");
	assert_eq!(lines(&ed), vec!["abc", "def"]);
	assert_eq!(ed.mode(), ModeId::Normal);
	// The stray d then combines with the next d
	press(&mut ed, "d");
	assert_eq!(lines(&ed), vec!["def"]);
}

#[test]
fn colon_enters_ex_mode_with_seeded_sline() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, ":");
	assert_eq!(ed.mode(), ModeId::ExCmd);
	assert_eq!(ed.sline.buf, ":");
	assert_eq!(ed.sline.pos, 1);
}

#[test]
fn ex_mode_edits_the_status_line() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, ":abc<left><left>x<del>");
	assert_eq!(ed.sline.buf, ":axc");
	press(&mut ed, "<BS><right>y");
	assert_eq!(ed.sline.buf, ":acy");
}

#[test]
fn ex_mode_backspace_to_empty_aborts() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, ":w<BS><BS>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert_eq!(ed.sline.buf, "");
}

#[test]
fn ex_mode_esc_aborts() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, ":wq<esc>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert_eq!(ed.sline.buf, "");
}

#[test]
fn empty_ex_command_aborts_silently() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, ":<CR>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert_eq!(ed.sline.buf, "");
	assert!(state.borrow().notifications.is_empty());
}

#[test]
fn unknown_ex_command_notifies() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, ":zzz<CR>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert_eq!(ed.sline.buf, "");
	assert_eq!(state.borrow().errors(), vec!["Not an editor command: zzz"]);
}

#[test]
fn quit_with_arguments_is_an_error() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, ":q now<CR>");
	assert_eq!(state.borrow().errors(), vec!["Trailing characters"]);
	assert!(!state.borrow().quit);
}

#[test]
fn quit_sets_the_quit_flag() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, ":q<CR>");
	assert!(state.borrow().quit);
}

#[test]
fn tab_completes_command_names() {
	let (mut ed, _) = editor_with("abc");
	press(&mut ed, ":e<tab>");
	assert_eq!(ed.sline.buf, ":edit");
	press(&mut ed, "<esc>:w<tab>");
	assert_eq!(ed.sline.buf, ":write");
}

#[test]
fn tab_completes_path_arguments() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("notes.txt"), "hi\n").unwrap();
	std::fs::write(dir.path().join("notes.md"), "hi\n").unwrap();

	let (mut ed, _) = editor_with("abc");
	let partial = format!(":e {}/no<tab>", dir.path().display());
	press(&mut ed, &partial);
	assert_eq!(ed.sline.buf, format!(":e {}/notes.", dir.path().display()));
}

#[test]
fn search_jumps_and_wraps() {
	let (mut ed, _) = editor_with("foo\nbar\nfoo");
	ed.buf.move_to(2, 0);
	press(&mut ed, "/foo<CR>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
	assert_eq!(ed.buf.marker('\''), Some(Pos::new(2, 0)));
}

#[test]
fn n_and_shift_n_repeat_the_search() {
	let (mut ed, _) = editor_with("foo x\nfoo y\nfoo z");
	press(&mut ed, "/foo<CR>");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 0));
	press(&mut ed, "n");
	assert_eq!(ed.buf.cursor(), Pos::new(2, 0));
	press(&mut ed, "N");
	assert_eq!(ed.buf.cursor(), Pos::new(1, 0));
	press(&mut ed, "2n");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
}

#[test]
fn backward_search_mode_reverses_direction() {
	let (mut ed, _) = editor_with("foo\nbar\nfoo");
	ed.buf.move_to(1, 0);
	press(&mut ed, "?foo<CR>");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
	// n keeps going backward, wrapping to the bottom
	press(&mut ed, "n");
	assert_eq!(ed.buf.cursor(), Pos::new(2, 0));
}

#[test]
fn failed_search_notifies_and_stays_put() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, "/zebra<CR>");
	assert_eq!(ed.buf.cursor(), Pos::new(0, 0));
	assert_eq!(state.borrow().errors(), vec!["Pattern not found: zebra"]);
}

#[test]
fn bad_search_pattern_surfaces_the_regex_error() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, "/[<CR>");
	assert_eq!(ed.mode(), ModeId::Normal);
	assert!(!state.borrow().errors().is_empty());
}

#[test]
fn repeat_without_a_search_is_an_error() {
	let (mut ed, state) = editor_with("abc");
	press(&mut ed, "n");
	assert_eq!(state.borrow().errors(), vec!["No previous search"]);
}
