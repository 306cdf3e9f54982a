use pretty_assertions::assert_eq;

use crate::keys::{KeyCode, KeyEvent, ModKeys};
use crate::keyseq::{KeyExprError, KeyMacros, Parse, parse_key_expr};

fn key(ch: char) -> KeyEvent {
	KeyEvent(KeyCode::Char(ch), ModKeys::NONE)
}

fn parse(expr: &str) -> crate::keyseq::KeySeq {
	parse_key_expr(expr, &KeyMacros::new()).unwrap()
}

/// Drive a parser with plain character keys, returning whether it ended
/// complete.
fn drive(seq: &mut crate::keyseq::KeySeq, input: &str) -> bool {
	for ch in input.chars() {
		if !seq.ready() {
			return false
		}
		seq.offer(&key(ch));
	}
	seq.is_complete()
}

#[test]
fn unit_matches_single_key() {
	let mut seq = parse("h");
	assert!(seq.offer(&key('h')));
	assert!(seq.is_complete());
	assert!(!seq.ready());
	assert_eq!(seq.get_parse(), Parse::Key(key('h')));
}

#[test]
fn unit_rejects_other_keys() {
	let mut seq = parse("h");
	assert!(!seq.offer(&key('j')));
	assert!(!seq.is_complete());
	assert!(!seq.ready());
	assert_eq!(seq.get_parse(), Parse::None);
}

#[test]
fn printable_takes_any_single_char() {
	let mut seq = parse("@");
	seq.offer(&key('Z'));
	assert!(seq.is_complete());
	assert_eq!(seq.get_parse().char(), Some('Z'));
}

#[test]
fn printable_rejects_named_keys() {
	let mut seq = parse("@");
	seq.offer(&KeyEvent(KeyCode::Enter, ModKeys::NONE));
	assert!(!seq.is_complete());
}

#[test]
fn number_accumulates_digits() {
	let mut seq = parse("#");
	seq.offer(&key('1'));
	seq.offer(&key('2'));
	seq.offer(&key('0'));
	assert!(seq.is_complete());
	assert_eq!(seq.get_parse(), Parse::Num(120));
}

#[test]
fn number_rejects_leading_zero() {
	let mut seq = parse("#");
	seq.offer(&key('0'));
	assert!(!seq.is_complete());
	assert!(!seq.ready());
}

#[test]
fn sequence_walks_children_in_order() {
	let mut seq = parse("ab");
	seq.offer(&key('a'));
	assert!(seq.ready());
	assert!(!seq.is_complete());
	seq.offer(&key('b'));
	assert!(seq.is_complete());
	assert_eq!(
		seq.get_parse(),
		Parse::List(vec![Parse::Key(key('a')), Parse::Key(key('b'))]),
	);
}

#[test]
fn sequence_reoffers_key_that_ended_a_count() {
	// The non-digit that ends an optional count must still match the
	// next child
	let mut seq = parse("#?x");
	assert!(drive(&mut seq, "3x"));
	assert_eq!(
		seq.get_parse(),
		Parse::List(vec![Parse::Num(3), Parse::Key(key('x'))]),
	);

	seq.reset();
	assert!(drive(&mut seq, "x"));
	assert_eq!(
		seq.get_parse(),
		Parse::List(vec![Parse::None, Parse::Key(key('x'))]),
	);
}

#[test]
fn choice_reports_first_complete_child() {
	let mut seq = parse("h|j|k|l");
	seq.offer(&key('k'));
	assert!(seq.is_complete());
	assert_eq!(seq.get_parse(), Parse::Key(key('k')));
}

#[test]
fn choice_stays_ready_while_any_branch_lives() {
	let mut seq = parse("ab|ac");
	seq.offer(&key('a'));
	assert!(seq.ready());
	seq.offer(&key('c'));
	assert!(seq.is_complete());
	assert_eq!(
		seq.get_parse(),
		Parse::List(vec![Parse::Key(key('a')), Parse::Key(key('c'))]),
	);
}

#[test]
fn choice_dies_when_no_branch_matches() {
	let mut seq = parse("h|j");
	seq.offer(&key('z'));
	assert!(!seq.ready());
	assert!(!seq.is_complete());
}

#[test]
fn optional_passes_through_without_consuming() {
	let mut seq = parse("d?x");
	assert!(drive(&mut seq, "x"));
	seq.reset();
	assert!(drive(&mut seq, "dx"));
}

#[test]
fn reset_then_replay_is_idempotent() {
	let mut seq = parse("#?(h|j)");
	drive(&mut seq, "12j");
	let first = seq.get_parse();
	seq.reset();
	drive(&mut seq, "12j");
	assert_eq!(first, seq.get_parse());
	assert_eq!(first, Parse::List(vec![Parse::Num(12), Parse::Key(key('j'))]));
}

#[test]
fn clones_are_independent() {
	let mut original = parse("ab");
	let mut copy = original.clone();
	original.offer(&key('a'));
	assert!(original.ready());
	assert!(copy.ready());
	assert!(!copy.is_complete());
	// Driving the copy does not disturb the original's progress
	copy.offer(&key('z'));
	assert!(!copy.ready());
	assert!(original.ready());
	original.offer(&key('b'));
	assert!(original.is_complete());
}

#[test]
fn named_keys_parse_inside_brackets() {
	let mut seq = parse("<enter>");
	seq.offer(&KeyEvent(KeyCode::Enter, ModKeys::NONE));
	assert!(seq.is_complete());
}

#[test]
fn bracketed_meta_chars_are_literal() {
	let mut seq = parse("<?>");
	seq.offer(&key('?'));
	assert!(seq.is_complete());

	let mut seq = parse("<`>@");
	assert!(drive(&mut seq, "`a"));
}

#[test]
fn display_round_trips_expressions() {
	for expr in ["h", "#?x", "#?(h|j|k|l)", "m@", "ab|ac", "<enter>"] {
		assert_eq!(parse(expr).to_string(), expr);
	}
}

#[test]
fn grouping_flattens_nested_choices() {
	assert_eq!(parse("a|(b|c)").to_string(), "a|b|c");
}

#[test]
fn macros_are_cloned_at_reference_sites() {
	let mut macros = KeyMacros::new();
	macros.define("count", "#", None).unwrap();
	let mut a = parse_key_expr("`count`x", &macros).unwrap();
	let mut b = parse_key_expr("`count`x", &macros).unwrap();
	assert!(drive(&mut a, "42x"));
	// b saw nothing of a's input
	assert!(b.ready());
	assert!(drive(&mut b, "7x"));
	assert_eq!(a.get_parse(), Parse::List(vec![Parse::Num(42), Parse::Key(key('x'))]));
	assert_eq!(b.get_parse(), Parse::List(vec![Parse::Num(7), Parse::Key(key('x'))]));
}

#[test]
fn group_macros_accumulate_alternatives() {
	let mut macros = KeyMacros::new();
	macros.group("motion", None);
	macros.add_alternative("motion", "h", None).unwrap();
	macros.add_alternative("motion", "j", None).unwrap();
	let mut seq = parse_key_expr("`motion`", &macros).unwrap();
	seq.offer(&key('j'));
	assert!(seq.is_complete());
}

#[test]
fn invalid_expressions_are_rejected() {
	let macros = KeyMacros::new();
	assert!(matches!(
		parse_key_expr("a>", &macros),
		Err(KeyExprError::Unmatched { symbol: '>', .. }),
	));
	assert!(matches!(
		parse_key_expr("(ab", &macros),
		Err(KeyExprError::Unmatched { symbol: '(', .. }),
	));
	assert!(matches!(
		parse_key_expr("ab)", &macros),
		Err(KeyExprError::Unmatched { symbol: ')', .. }),
	));
	assert!(matches!(
		parse_key_expr("<enter", &macros),
		Err(KeyExprError::Unmatched { symbol: '<', .. }),
	));
	assert!(matches!(
		parse_key_expr("a|", &macros),
		Err(KeyExprError::EmptyChoice { .. }),
	));
	assert!(matches!(
		parse_key_expr("?a", &macros),
		Err(KeyExprError::BadOptional { .. }),
	));
	assert!(matches!(
		parse_key_expr("`nope`", &macros),
		Err(KeyExprError::NoSuchMacro { .. }),
	));
	assert!(matches!(
		parse_key_expr("<bogus>", &macros),
		Err(KeyExprError::UnknownKeyName { .. }),
	));
}

#[test]
fn filters_rewrite_parses() {
	fn double(parse: Parse) -> Parse {
		match parse {
			Parse::Num(n) => Parse::Num(n * 2),
			other => other,
		}
	}
	let mut macros = KeyMacros::new();
	macros.define("count", "#", Some(double)).unwrap();
	let mut seq = parse_key_expr("`count`x", &macros).unwrap();
	drive(&mut seq, "21x");
	assert_eq!(
		seq.get_parse(),
		Parse::List(vec![Parse::Num(42), Parse::Key(key('x'))]),
	);
}
