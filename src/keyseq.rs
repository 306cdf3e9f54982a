//! Incremental recognizers for regular languages over key symbols.
//!
//! A `KeySeq` is offered one key at a time and reports via its `ready` and
//! `complete` flags whether it can still consume input and whether it has
//! matched. Binding tables hold live `KeySeq` instances and reset them
//! between commands, so recognition is fully incremental: no key is ever
//! buffered twice.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::keys::{KeyCode, KeyEvent, ModKeys};

/// The value produced by a completed parse.
///
/// Sequences yield the list of their children's parses, choices yield the
/// winning child's parse, and filters may rewrite any of it on the way up.
#[derive(Clone,Debug,PartialEq,Default)]
pub enum Parse {
	#[default]
	None,
	Key(KeyEvent),
	Num(usize),
	List(Vec<Parse>),
}

impl Parse {
	pub fn as_num(&self) -> Option<usize> {
		match self {
			Parse::Num(n) => Some(*n),
			_ => None,
		}
	}
	pub fn as_key(&self) -> Option<&KeyEvent> {
		match self {
			Parse::Key(key) => Some(key),
			_ => None,
		}
	}
	pub fn as_list(&self) -> Option<&[Parse]> {
		match self {
			Parse::List(items) => Some(items),
			_ => None,
		}
	}
	/// The character of a printable key parse.
	pub fn char(&self) -> Option<char> {
		match self {
			Parse::Key(KeyEvent(KeyCode::Char(c), mods)) if mods.is_empty() => Some(*c),
			_ => None,
		}
	}
}

/// Transforms a raw parse into the value surfaced to the bound action.
pub type Filter = fn(Parse) -> Parse;

#[derive(Clone,Debug)]
enum Node {
	/// Matches exactly one specific key
	Unit(KeyEvent),
	/// Matches any single printable key, remembering which
	Printable(Option<KeyEvent>),
	/// Accumulates a decimal count; a leading zero is rejected
	Number(usize),
	Optional(Box<KeySeq>),
	/// Children matched in order; the cursor is the second field
	Sequence(Vec<KeySeq>, usize),
	Choice(Vec<KeySeq>),
}

/// One node of a key-sequence recognizer.
#[derive(Clone,Debug)]
pub struct KeySeq {
	node: Node,
	filter: Option<Filter>,
	ready: bool,
	complete: bool,
}

impl KeySeq {
	fn new(node: Node) -> Self {
		Self { node, filter: None, ready: true, complete: false }
	}
	pub fn unit(key: KeyEvent) -> Self {
		Self::new(Node::Unit(key))
	}
	pub fn printable() -> Self {
		Self::new(Node::Printable(None))
	}
	pub fn number() -> Self {
		Self::new(Node::Number(0))
	}
	pub fn optional(inner: KeySeq) -> Self {
		Self::new(Node::Optional(Box::new(inner)))
	}
	pub fn sequence(children: Vec<KeySeq>) -> Self {
		Self::new(Node::Sequence(children, 0))
	}
	pub fn choice(children: Vec<KeySeq>) -> Self {
		Self::new(Node::Choice(children))
	}

	/// Still able to consume input.
	pub fn ready(&self) -> bool {
		self.ready
	}
	/// Has matched at least one valid prefix.
	pub fn is_complete(&self) -> bool {
		self.complete
	}

	/// Offer one key to the recognizer.
	///
	/// The return value means "this key advanced the parse". A child that
	/// completes without consuming the key (an exhausted optional, a count
	/// ended by a non-digit) hands the same key to the next child in a
	/// sequence, which is what lets `#?d` see the `d` that ended the count.
	pub fn offer(&mut self, key: &KeyEvent) -> bool {
		if !self.ready {
			return false
		}
		match &mut self.node {
			Node::Unit(k) => {
				self.ready = false;
				self.complete = k == key;
				self.complete
			}
			Node::Printable(slot) => {
				self.ready = false;
				if key.is_printable() {
					self.complete = true;
					*slot = Some(key.clone());
				}
				self.complete
			}
			Node::Number(n) => {
				if !self.complete && key.is_char('0') {
					self.ready = false;
				} else if let Some(d) = key.digit() {
					self.complete = true;
					*n = *n * 10 + d;
				} else {
					self.ready = false;
				}
				self.ready
			}
			Node::Optional(inner) => {
				let ret = inner.offer(key);
				self.ready = inner.ready;
				self.complete = inner.complete || !self.ready;
				ret
			}
			Node::Sequence(children, loc) => {
				let mut ret = false;
				while !ret {
					let child = &mut children[*loc];
					ret = child.offer(key);

					if child.ready {
						return true
					}
					if !child.complete {
						self.ready = false;
						return false
					}

					*loc += 1;

					if *loc >= children.len() {
						self.complete = true;
						self.ready = false;
						return true
					}
				}
				true
			}
			Node::Choice(children) => {
				let mut ret = false;
				self.ready = false;
				self.complete = false;
				for child in children.iter_mut() {
					ret = child.offer(key) || ret;
					self.ready = self.ready || child.ready;
					self.complete = self.complete || child.complete;
				}
				self.ready = self.ready && !self.complete;
				ret
			}
		}
	}

	/// The parsed value, with filters applied. `Parse::None` while
	/// incomplete.
	pub fn get_parse(&self) -> Parse {
		let raw = match &self.node {
			Node::Unit(k) => {
				if !self.complete {
					return Parse::None
				}
				Parse::Key(k.clone())
			}
			Node::Printable(slot) => {
				if !self.complete {
					return Parse::None
				}
				match slot {
					Some(key) => Parse::Key(key.clone()),
					None => return Parse::None,
				}
			}
			Node::Number(n) => {
				if !self.complete {
					return Parse::None
				}
				Parse::Num(*n)
			}
			// An optional surfaces its filter even when nothing matched
			Node::Optional(inner) => inner.get_parse(),
			Node::Sequence(children, _) => {
				if !self.complete {
					return Parse::None
				}
				Parse::List(children.iter().map(KeySeq::get_parse).collect())
			}
			Node::Choice(children) => {
				if !self.complete {
					return Parse::None
				}
				match children.iter().find(|c| c.complete) {
					Some(winner) => winner.get_parse(),
					None => return Parse::None,
				}
			}
		};
		match self.filter {
			Some(f) => f(raw),
			None => raw,
		}
	}

	pub fn reset(&mut self) {
		self.ready = true;
		self.complete = false;
		match &mut self.node {
			Node::Unit(_) => {}
			Node::Printable(slot) => *slot = None,
			Node::Number(n) => *n = 0,
			Node::Optional(inner) => inner.reset(),
			Node::Sequence(children, loc) => {
				*loc = 0;
				for child in children.iter_mut() {
					child.reset();
				}
			}
			Node::Choice(children) => {
				for child in children.iter_mut() {
					child.reset();
				}
			}
		}
	}

	fn expr_str(&self) -> String {
		match &self.node {
			Node::Unit(key) => match &key.0 {
				KeyCode::Char(c) if key.1.is_empty() && !"<>#@?|()".contains(*c) => c.to_string(),
				_ => format!("<{key}>"),
			},
			Node::Printable(_) => "@".into(),
			Node::Number(_) => "#".into(),
			Node::Optional(inner) => format!("{}?", inner.deep_nest()),
			Node::Sequence(children, _) => children.iter().map(KeySeq::nest).collect(),
			Node::Choice(children) => {
				children.iter().map(KeySeq::nest).collect::<Vec<_>>().join("|")
			}
		}
	}

	fn nest(&self) -> String {
		match self.node {
			Node::Choice(_) => format!("({})", self.expr_str()),
			_ => self.expr_str(),
		}
	}

	fn deep_nest(&self) -> String {
		match self.node {
			Node::Sequence(..) => format!("({})", self.expr_str()),
			_ => self.nest(),
		}
	}
}

impl fmt::Display for KeySeq {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.expr_str())
	}
}

#[derive(Debug,Error,Clone,PartialEq,Eq)]
pub enum KeyExprError {
	#[error("Unmatched '{symbol}' in key expression '{expr}'")]
	Unmatched { symbol: char, expr: String },
	#[error("Empty choice in key expression '{expr}'")]
	EmptyChoice { expr: String },
	#[error("Unexpected '?' in key expression '{expr}'")]
	BadOptional { expr: String },
	#[error("Unknown key name '<{name}>' in key expression '{expr}'")]
	UnknownKeyName { name: String, expr: String },
	#[error("No such macro `{name}`")]
	NoSuchMacro { name: String },
}

impl KeyExprError {
	fn unmatched(symbol: char, expr: &str) -> Self {
		Self::Unmatched { symbol, expr: expr.into() }
	}
}

/// Registry of named parsers referenced from key expressions as `` `name` ``.
///
/// Reference sites receive a deep clone, so every binding drives its own
/// instance.
#[derive(Default,Debug)]
pub struct KeyMacros {
	macros: HashMap<String, KeySeq>,
}

impl KeyMacros {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&KeySeq> {
		self.macros.get(name)
	}

	/// Install a single parser under a name.
	pub fn define(&mut self, name: &str, expr: &str, filter: Option<Filter>) -> Result<(), KeyExprError> {
		let mut seq = parse_key_expr(expr, self)?;
		seq.filter = filter;
		self.macros.insert(name.into(), seq);
		Ok(())
	}

	/// Create an append-only choice group under a name.
	pub fn group(&mut self, name: &str, filter: Option<Filter>) {
		let mut seq = KeySeq::choice(vec![]);
		seq.filter = filter;
		self.macros.insert(name.into(), seq);
	}

	/// Append one alternative to a group created with `group`.
	pub fn add_alternative(&mut self, name: &str, expr: &str, filter: Option<Filter>) -> Result<(), KeyExprError> {
		let mut alt = parse_key_expr(expr, self)?;
		if let Some(f) = filter {
			alt.filter = Some(f);
		}
		match self.macros.get_mut(name) {
			Some(KeySeq { node: Node::Choice(children), .. }) => {
				children.push(alt);
				Ok(())
			}
			_ => Err(KeyExprError::NoSuchMacro { name: name.into() }),
		}
	}
}

enum StackItem {
	Open,
	Alt,
	Name(String),
	Node(KeySeq),
}

/// Collapse the top of the stack (down to the nearest `(` marker) into a
/// single parser: a choice of sequences, with singletons flattened and
/// bare nested choices absorbed into their parent.
fn quiesce(stack: &mut Vec<StackItem>, expr: &str) -> Result<KeySeq, KeyExprError> {
	let mut sequence: Vec<KeySeq> = vec![];
	let mut choose: Vec<KeySeq> = vec![];

	fn finish_branch(
		sequence: &mut Vec<KeySeq>,
		choose: &mut Vec<KeySeq>,
		expr: &str,
	) -> Result<(), KeyExprError> {
		if sequence.is_empty() {
			return Err(KeyExprError::EmptyChoice { expr: expr.into() })
		}
		sequence.reverse();
		if sequence.len() == 1 {
			let single = sequence.pop().unwrap();
			match single {
				// A grouped choice with no filter of its own contributes
				// its alternatives directly
				KeySeq { node: Node::Choice(mut children), filter: None, .. } => {
					children.reverse();
					choose.append(&mut children);
				}
				other => choose.push(other),
			}
		} else {
			choose.push(KeySeq::sequence(std::mem::take(sequence)));
		}
		sequence.clear();
		Ok(())
	}

	while let Some(item) = stack.last() {
		if matches!(item, StackItem::Open) {
			break
		}
		match stack.pop().unwrap() {
			StackItem::Alt => finish_branch(&mut sequence, &mut choose, expr)?,
			StackItem::Node(seq) => sequence.push(seq),
			StackItem::Name(_) | StackItem::Open => unreachable!(),
		}
	}
	finish_branch(&mut sequence, &mut choose, expr)?;
	choose.reverse();

	if choose.len() == 1 {
		Ok(choose.pop().unwrap())
	} else {
		Ok(KeySeq::choice(choose))
	}
}

/// Parse a key expression identifying sequences of keys that might trigger
/// an action.
///
/// The grammar: literal keys, `<name>` named keys, `@` any printable, `#`
/// a count, `X?` optional, juxtaposition for sequence, `|` for choice,
/// `(...)` grouping, and `` `name` `` macro references.
pub fn parse_key_expr(expr: &str, macros: &KeyMacros) -> Result<KeySeq, KeyExprError> {
	let mut stack: Vec<StackItem> = vec![];
	let mut escaped = false;
	let mut macroed = false;

	for k in expr.chars() {
		if k == '>' && !escaped {
			return Err(KeyExprError::unmatched('>', expr));
		}

		let name_pending = matches!(stack.last(), Some(StackItem::Name(n)) if !n.is_empty());

		if k == '>' && name_pending {
			escaped = false;
			let Some(StackItem::Name(name)) = stack.pop() else { unreachable!() };
			let key = KeyEvent::from_name(&name)
				.ok_or_else(|| KeyExprError::UnknownKeyName { name, expr: expr.into() })?;
			stack.push(StackItem::Node(KeySeq::unit(key)));
		} else if macroed && k == '`' {
			macroed = false;
			let Some(StackItem::Name(name)) = stack.pop() else { unreachable!() };
			let Some(body) = macros.get(&name) else {
				return Err(KeyExprError::NoSuchMacro { name });
			};
			stack.push(StackItem::Node(body.clone()));
		} else if escaped || macroed {
			let Some(StackItem::Name(name)) = stack.last_mut() else { unreachable!() };
			name.push(k);
		} else if k == '<' {
			escaped = true;
			stack.push(StackItem::Name(String::new()));
		} else if k == '`' {
			macroed = true;
			stack.push(StackItem::Name(String::new()));
		} else if k == '#' {
			stack.push(StackItem::Node(KeySeq::number()));
		} else if k == '@' {
			stack.push(StackItem::Node(KeySeq::printable()));
		} else if k == '?' {
			match stack.pop() {
				Some(StackItem::Node(inner)) => {
					stack.push(StackItem::Node(KeySeq::optional(inner)));
				}
				_ => return Err(KeyExprError::BadOptional { expr: expr.into() }),
			}
		} else if k == '|' {
			stack.push(StackItem::Alt);
		} else if k == '(' {
			stack.push(StackItem::Open);
		} else if k == ')' {
			let res = quiesce(&mut stack, expr)?;
			match stack.last_mut() {
				Some(slot @ StackItem::Open) => *slot = StackItem::Node(res),
				_ => return Err(KeyExprError::unmatched(')', expr)),
			}
		} else {
			let key = KeyEvent(KeyCode::Char(k), ModKeys::NONE);
			stack.push(StackItem::Node(KeySeq::unit(key)));
		}
	}

	if escaped {
		return Err(KeyExprError::unmatched('<', expr));
	}
	if macroed {
		return Err(KeyExprError::unmatched('`', expr));
	}

	let ret = quiesce(&mut stack, expr)?;

	if stack.is_empty() {
		Ok(ret)
	} else {
		Err(KeyExprError::unmatched('(', expr))
	}
}
