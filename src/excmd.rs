//! Named ex commands and their prefix-disambiguating registry.
//!
//! Every unambiguous prefix of a registered name resolves to its command,
//! so `:q`, `:qu` and `:quit` all quit until some other `q...` command is
//! registered and steals the short forms.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::editor::Editor;

pub type CmdFn = fn(&mut Editor, Option<&str>);
pub type CompleteFn = fn(&Editor, &str) -> Vec<String>;

#[derive(Clone,Copy)]
pub struct ExCommand {
	pub name: &'static str,
	pub run: CmdFn,
	pub complete: Option<CompleteFn>,
}

pub struct ExCmdTable {
	/// Every disambiguating prefix, plus each full name
	by_prefix: HashMap<String, ExCommand>,
	/// Authoritative map of canonical names
	canonical: BTreeMap<&'static str, ExCommand>,
}

impl Default for ExCmdTable {
	fn default() -> Self {
		Self::new()
	}
}

impl ExCmdTable {
	pub fn new() -> Self {
		Self {
			by_prefix: HashMap::new(),
			canonical: BTreeMap::new(),
		}
	}

	pub fn with_builtins() -> Self {
		let mut table = Self::new();
		table.register(ExCommand { name: "quit", run: quit_cmd, complete: None });
		table.register(ExCommand { name: "edit", run: edit_cmd, complete: Some(path_complete) });
		table.register(ExCommand { name: "write", run: write_cmd, complete: Some(path_complete) });
		table
	}

	/// Register a command, restoring the prefix-disambiguation invariant.
	///
	/// Prefix aliases of existing commands that the new name makes
	/// ambiguous are dropped (full names survive), and the new command's
	/// own shortest prefix advances past any conflict with another name.
	pub fn register(&mut self, cmd: ExCommand) {
		let name = cmd.name;

		self.by_prefix.retain(|key, existing| {
			key == existing.name || !name.starts_with(key.as_str())
		});

		let mut start = 1;
		while start < name.len() {
			let prefix = &name[..start];
			let ambiguous = self.canonical.keys().any(|other| {
				*other != name && other.starts_with(prefix)
			});
			if !ambiguous && !self.by_prefix.contains_key(prefix) {
				break
			}
			start += 1;
		}

		for len in start..=name.len() {
			let prefix = &name[..len];
			if !self.by_prefix.contains_key(prefix) {
				self.by_prefix.insert(prefix.to_string(), cmd);
			}
		}
		self.by_prefix.insert(name.to_string(), cmd);
		self.canonical.insert(name, cmd);
	}

	/// Exact lookup over names and disambiguating prefixes.
	pub fn lookup(&self, name: &str) -> Option<&ExCommand> {
		self.by_prefix.get(name)
	}

	/// Canonical names, sorted.
	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.canonical.keys().copied()
	}
}

/// Parse `name args` out of a submitted command line and dispatch it. An
/// empty line is a silent no-op; an unknown name is reported.
pub fn do_excmd(ed: &mut Editor, line: &str) {
	let line = line.trim();
	if line.is_empty() {
		return
	}
	let (name, args) = match line.split_once(char::is_whitespace) {
		Some((name, rest)) => {
			let rest = rest.trim();
			(name, if rest.is_empty() { None } else { Some(rest) })
		}
		None => (line, None),
	};
	let Some(cmd) = ed.excmds.lookup(name).copied() else {
		ed.ui.notify(&format!("Not an editor command: {name}"), true);
		return
	};
	(cmd.run)(ed, args);
}

/// The longest shared prefix of the candidates, if any.
pub fn common_prefix(cands: &[String]) -> Option<String> {
	let first = cands.first()?;
	let mut len = first.len();
	for cand in &cands[1..] {
		len = first.bytes()
			.zip(cand.bytes())
			.take(len)
			.take_while(|(a, b)| a == b)
			.count();
	}
	while len > 0 && !first.is_char_boundary(len) {
		len -= 1;
	}
	Some(first[..len].to_string())
}

fn quit_cmd(ed: &mut Editor, args: Option<&str>) {
	if args.is_some() {
		ed.ui.notify("Trailing characters", true);
		return
	}
	ed.ui.quit();
}

fn edit_cmd(ed: &mut Editor, args: Option<&str>) {
	let Some(path) = args else {
		ed.ui.notify("No File Name", true);
		return
	};
	if let Err(e) = ed.buf.load_file(Path::new(path)) {
		ed.ui.notify(&e.to_string(), true);
	}
	ed.ui.redraw();
}

fn write_cmd(ed: &mut Editor, args: Option<&str>) {
	if let Err(e) = ed.buf.write_file(args.map(Path::new)) {
		ed.ui.notify(&e.to_string(), true);
	}
}

/// Filesystem completion for path arguments.
fn path_complete(_ed: &Editor, partial: &str) -> Vec<String> {
	let (dir, stem) = match partial.rsplit_once('/') {
		Some(("", stem)) => ("/", stem),
		Some((dir, stem)) => (dir, stem),
		None => (".", partial),
	};
	let Ok(entries) = fs::read_dir(dir) else {
		return vec![]
	};

	let mut out = vec![];
	for entry in entries.flatten() {
		let fname = entry.file_name().to_string_lossy().into_owned();
		if !fname.starts_with(stem) {
			continue
		}
		if partial.contains('/') {
			out.push(format!("{}/{fname}", dir.trim_end_matches('/')));
		} else {
			out.push(fname);
		}
	}
	out.sort();
	out
}
