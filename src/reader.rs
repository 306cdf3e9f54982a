use std::collections::VecDeque;

use crate::keys::{KeyCode, KeyEvent, ModKeys};

pub trait KeyReader {
	fn read_key(&mut self) -> Option<KeyEvent>;
}

/// Decodes raw input bytes into KeyEvents.
///
/// Understands UTF-8 text plus the common CSI sequences for arrows and
/// navigation keys. A lone 0x1b is the esc key.
#[derive(Default,Debug)]
pub struct RawReader {
	pub bytes: VecDeque<u8>
}

impl RawReader {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn with_initial(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend(bytes.iter());
		self
	}

	fn parse_esc_seq_from_bytes(&mut self) -> Option<KeyEvent> {
		let b1 = self.bytes.pop_front()?;

		match b1 {
			b'[' => {
				let b2 = self.bytes.pop_front()?;

				match b2 {
					b'A' => Some(KeyEvent(KeyCode::Up, ModKeys::empty())),
					b'B' => Some(KeyEvent(KeyCode::Down, ModKeys::empty())),
					b'C' => Some(KeyEvent(KeyCode::Right, ModKeys::empty())),
					b'D' => Some(KeyEvent(KeyCode::Left, ModKeys::empty())),
					b'H' => Some(KeyEvent(KeyCode::Home, ModKeys::empty())),
					b'F' => Some(KeyEvent(KeyCode::End, ModKeys::empty())),
					b'1'..=b'9' => {
						let mut digits = vec![b2];

						while let Some(&b) = self.bytes.front() {
							self.bytes.pop_front();

							if b == b'~' || b == b';' {
								break;
							} else if b.is_ascii_digit() {
								digits.push(b);
							} else {
								break;
							}
						}

						let key = match digits.as_slice() {
							[b'1'] => KeyCode::Home,
							[b'3'] => KeyCode::Delete,
							[b'4'] => KeyCode::End,
							[b'5'] => KeyCode::PageUp,
							[b'6'] => KeyCode::PageDown,
							[b'7'] => KeyCode::Home, // xterm alternate
							[b'8'] => KeyCode::End,  // xterm alternate
							_ => KeyCode::Esc,
						};

						Some(KeyEvent(key, ModKeys::empty()))
					}
					_ => Some(KeyEvent(KeyCode::Esc, ModKeys::empty())),
				}
			}

			b'O' => {
				let b2 = self.bytes.pop_front()?;

				let key = match b2 {
					b'H' => KeyCode::Home,
					b'F' => KeyCode::End,
					_ => KeyCode::Esc,
				};

				Some(KeyEvent(key, ModKeys::empty()))
			}

			_ => Some(KeyEvent(KeyCode::Esc, ModKeys::empty())),
		}
	}
}

impl KeyReader for RawReader {
	fn read_key(&mut self) -> Option<KeyEvent> {
		use core::str;

		let mut collected = Vec::with_capacity(4);

		loop {
			let byte = self.bytes.pop_front()?;
			collected.push(byte);

			// If it's an escape sequence, delegate
			if collected[0] == 0x1b && collected.len() == 1
				&& let Some(&(b'[' | b'O')) = self.bytes.front() {
					return self.parse_esc_seq_from_bytes()
			}

			// Try parse as valid UTF-8
			if let Ok(s) = str::from_utf8(&collected) {
				return Some(KeyEvent::new(s, ModKeys::empty()));
			}

			if collected.len() >= 4 {
				break;
			}
		}

		None
	}
}
