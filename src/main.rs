#![allow(clippy::while_let_on_iterator)]
//! `vix` is a modal, vi-like editor core driven through an abstract UI
//! surface.
//!
//! The binary wires the core to a stream frontend: key input is decoded
//! from raw bytes on stdin (or a `--keys` argument), dispatched through
//! the mode machine, and the session ends on `:quit` or end of input.
//! A real screen frontend plugs in through the same `Ui` trait.
//!
//! ### High-level structure:
//! 1. Arguments select the file to edit and where keys come from
//! 2. An `Editor` is created with the default keymap and ex commands
//! 3. Keys are dispatched one at a time until the UI is asked to quit

use std::cell::Cell;
use std::fmt::Display;
use std::io::Read;
use std::path::PathBuf;
use std::rc::Rc;

pub mod buffer;
pub mod color;
pub mod editor;
pub mod excmd;
pub mod filetype;
pub mod keys;
pub mod keyseq;
pub mod mode;
pub mod modes;
pub mod reader;
pub mod region;
pub mod ui;
#[cfg(test)]
pub mod tests;

use editor::Editor;
use reader::{KeyReader, RawReader};
use ui::Ui;

/// Print the given error message and exit the program.
///
/// Despite the header, this function does not return anything. It always
/// calls `std::process::exit(1)`. This is done so that the function can be
/// used as an argument to methods such as `unwrap_or_else`.
pub fn complain_and_exit<T>(err: impl Display) -> T {
	let mut err = err.to_string();
	if !err.starts_with("vix: ") {
		err = format!("vix: {err}");
	}
	eprintln!("{err}");
	std::process::exit(1)
}

/// The arguments passed to the program by the user
#[derive(Default,Clone,Debug)]
pub struct Opts {
	file: Option<PathBuf>,
	keys: Option<String>,
	dump: bool,
}

impl Opts {
	/// Parse the user's arguments
	pub fn parse() -> Result<Self, String> {
		let mut new = Self::default();
		let mut args = std::env::args().skip(1);
		while let Some(arg) = args.next() {
			match arg.as_str() {
				"--dump" => {
					new.dump = true;
				}
				"--keys" | "-k" => {
					let Some(next_arg) = args.next() else {
						return Err(format!("Expected a key string after '{arg}'"))
					};
					new.keys = Some(next_arg)
				}
				"--help" | "-h" => {
					print_usage();
					std::process::exit(0)
				}
				_ if arg.starts_with('-') => {
					return Err(format!("Unknown option '{arg}'"))
				}
				_ => {
					if new.file.is_some() {
						return Err("Only one file may be edited at a time".into())
					}
					new.file = Some(PathBuf::from(arg))
				}
			}
		}
		Ok(new)
	}
}

fn print_usage() {
	println!("vix - a modal, vi-like text editor");
	println!();
	println!("USAGE:");
	println!("  vix [OPTIONS] [FILE]");
	println!();
	println!("OPTIONS:");
	println!("  -k, --keys STRING   Take key input from STRING instead of stdin.");
	println!("                      Special keys are written <esc>, <CR>, <BS>,");
	println!("                      <tab>, <del>, <left>, <right>, <up>, <down>.");
	println!("      --dump          Print the final buffer to stdout on exit.");
	println!("  -h, --help          Show this message.");
}

/// Translate vi-style key notation into the raw bytes the reader expects.
pub fn notated_bytes(input: &str) -> Vec<u8> {
	let mut out = vec![];
	let mut rest = input;
	while let Some(ch) = rest.chars().next() {
		if ch == '<' && let Some(end) = rest.find('>') {
			let token: &[u8] = match &rest[1..end] {
				"esc" => b"\x1b",
				"CR" | "enter" => b"\r",
				"BS" | "backspace" => b"\x7f",
				"tab" => b"\t",
				"space" => b" ",
				"del" | "delete" => b"\x1b[3~",
				"up" => b"\x1b[A",
				"down" => b"\x1b[B",
				"right" => b"\x1b[C",
				"left" => b"\x1b[D",
				"lt" => b"<",
				_ => {
					out.push(b'<');
					rest = &rest[1..];
					continue
				}
			};
			out.extend_from_slice(token);
			rest = &rest[end + 1..];
		} else {
			let mut buf = [0u8; 4];
			out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
			rest = &rest[ch.len_utf8()..];
		}
	}
	out
}

/// The stream frontend: notifications go to stderr, repaints are free,
/// and quit latches a flag the main loop watches.
struct StreamUi {
	quit: Rc<Cell<bool>>,
}

impl Ui for StreamUi {
	fn quit(&mut self) {
		self.quit.set(true);
	}
	fn notify(&mut self, message: &str, error: bool) {
		if error {
			eprintln!("vix: {message}");
		} else {
			eprintln!("{message}");
		}
	}
	fn redraw(&mut self) {}
}

fn main() {
	env_logger::init();
	let opts = Opts::parse().unwrap_or_else(complain_and_exit);

	let quit = Rc::new(Cell::new(false));
	let ui = StreamUi { quit: Rc::clone(&quit) };
	let mut editor = Editor::new(Box::new(ui)).unwrap_or_else(complain_and_exit);

	if let Some(path) = &opts.file {
		if let Err(e) = editor.buf.load_file(path) {
			editor.ui.notify(&e.to_string(), true);
		}
	}

	let bytes = match &opts.keys {
		Some(keys) => notated_bytes(keys),
		None => {
			let mut buf = vec![];
			std::io::stdin()
				.read_to_end(&mut buf)
				.unwrap_or_else(complain_and_exit);
			buf
		}
	};

	let mut reader = RawReader::new().with_initial(&bytes);
	while let Some(key) = reader.read_key() {
		editor.handle_key(key);
		if quit.get() {
			break
		}
	}

	if opts.dump {
		for line in &editor.buf.lines {
			println!("{line}");
		}
	}
}
