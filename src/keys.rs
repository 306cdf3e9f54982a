use std::fmt;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone,PartialEq,Eq,Debug)]
pub struct KeyEvent(pub KeyCode, pub ModKeys);

impl KeyEvent {
	/// Build a KeyEvent from a single grapheme of decoded input.
	///
	/// Control characters are folded into their canonical key (enter,
	/// backspace, tab, esc) or a ctrl-modified letter.
	pub fn new(ch: &str, mods: ModKeys) -> Self {
		use {KeyCode as K, KeyEvent as E, ModKeys as M};

		let mut graphemes = ch.graphemes(true);

		let first = match graphemes.next() {
			Some(g) => g,
			None => return E(K::Null, mods),
		};

		// More than one grapheme is not a single key event
		if graphemes.next().is_some() {
			return E(K::Null, mods);
		}

		let mut chars = first.chars();
		let single_char = chars.next();
		let is_single_char = chars.next().is_none();

		match single_char {
			Some(c) if is_single_char && c.is_control() => {
				match c {
					'\x08' | '\x7f' => E(K::Backspace, mods),
					'\x09' => E(K::Tab, mods),
					'\x0a' | '\x0d' => E(K::Enter, mods),
					'\x1b' => E(K::Esc, mods),
					c @ '\x00'..='\x1a' => {
						let letter = (c as u8 + b'@') as char;
						E(K::Char(letter), mods | M::CTRL)
					}
					_ => E(K::Null, mods),
				}
			}
			Some(c) if is_single_char => E(K::Char(c), mods),
			_ => {
				// multi-char grapheme (emoji, accented, etc)
				E(K::Grapheme(Arc::from(first)), mods)
			}
		}
	}

	/// Build a KeyEvent from a key name as written in a key expression,
	/// e.g. `enter` from `<enter>`. Single characters name themselves.
	pub fn from_name(name: &str) -> Option<Self> {
		use {KeyCode as K, KeyEvent as E, ModKeys as M};

		let mut chars = name.chars();
		if let Some(c) = chars.next() && chars.next().is_none() {
			return Some(E(K::Char(c), M::NONE))
		}

		let code = match name {
			"enter" => K::Enter,
			"tab" => K::Tab,
			"esc" => K::Esc,
			"space" => K::Char(' '),
			"backspace" => K::Backspace,
			"delete" => K::Delete,
			"left" => K::Left,
			"right" => K::Right,
			"up" => K::Up,
			"down" => K::Down,
			"home" => K::Home,
			"end" => K::End,
			"pageup" => K::PageUp,
			"pagedown" => K::PageDown,
			_ => return None,
		};
		Some(E(code, M::NONE))
	}

	/// A key is printable when it carries exactly one visible grapheme
	/// and no ctrl/alt modifier.
	pub fn is_printable(&self) -> bool {
		if self.1.intersects(ModKeys::CTRL | ModKeys::ALT) {
			return false
		}
		match &self.0 {
			KeyCode::Char(c) => !c.is_control(),
			KeyCode::Grapheme(_) => true,
			_ => false,
		}
	}

	/// The text a printable key inserts.
	pub fn text(&self) -> Option<String> {
		if !self.is_printable() {
			return None
		}
		match &self.0 {
			KeyCode::Char(c) => Some(c.to_string()),
			KeyCode::Grapheme(g) => Some(g.to_string()),
			_ => None,
		}
	}

	pub fn digit(&self) -> Option<usize> {
		match self.0 {
			KeyCode::Char(c) if self.1.is_empty() => c.to_digit(10).map(|d| d as usize),
			_ => None,
		}
	}

	pub fn is_char(&self, ch: char) -> bool {
		self.0 == KeyCode::Char(ch) && self.1.is_empty()
	}
}

impl fmt::Display for KeyEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		use KeyCode as K;
		if self.1.contains(ModKeys::CTRL) {
			write!(f, "ctrl ")?;
		}
		if self.1.contains(ModKeys::ALT) {
			write!(f, "alt ")?;
		}
		match &self.0 {
			K::Char(c) => write!(f, "{c}"),
			K::Grapheme(g) => write!(f, "{g}"),
			K::Backspace => write!(f, "backspace"),
			K::Delete => write!(f, "delete"),
			K::Down => write!(f, "down"),
			K::End => write!(f, "end"),
			K::Enter => write!(f, "enter"),
			K::Esc => write!(f, "esc"),
			K::Home => write!(f, "home"),
			K::Left => write!(f, "left"),
			K::Null => write!(f, "null"),
			K::PageDown => write!(f, "pagedown"),
			K::PageUp => write!(f, "pageup"),
			K::Right => write!(f, "right"),
			K::Tab => write!(f, "tab"),
			K::Up => write!(f, "up"),
		}
	}
}

#[derive(Clone,PartialEq,Eq,Debug)]
pub enum KeyCode {
	Backspace,
	Char(char),
	Grapheme(Arc<str>),
	Delete,
	Down,
	End,
	Enter,
	Esc,
	Home,
	Left,
	Null,
	PageDown,
	PageUp,
	Right,
	Tab,
	Up,
}

bitflags::bitflags! {
	#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
	pub struct ModKeys: u8 {
		/// Control modifier
		const CTRL  = 1<<2;
		/// Escape or Alt modifier
		const ALT  = 1<<1;
		/// Shift modifier
		const SHIFT = 1<<0;

		/// No modifier
		const NONE = 0;
	}
}
