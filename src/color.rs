//! Text-color tag canonicalization.
//!
//! Region tags resolve to strings of the form `#hhh` or `#hhh|hhh`, one
//! hex digit per red/green/blue value, the second cluster being the
//! background. Either cluster may be `x` for the default color. Anything
//! else resolves through the alias map, or falls back to `#x|x`.

use std::collections::HashMap;

use regex::Regex;

pub const DEFAULT_COLOR: &str = "#x|x";

pub struct ColorMap {
	map: HashMap<String, String>,
	fmt: Regex,
}

impl Default for ColorMap {
	fn default() -> Self {
		Self::new()
	}
}

impl ColorMap {
	pub fn new() -> Self {
		let mut colors = Self {
			map: HashMap::new(),
			fmt: Regex::new(r"^#([a-fA-F0-9]{3}|[xX])(\|([a-fA-F0-9]{3}|[xX]))?$").unwrap(),
		};
		colors.alias("keyword", "#b0b");
		colors.alias("hilight", "#000|ff0");
		colors
	}

	/// Canonicalize a text color string, or resolve a color name into a
	/// text color string if appropriate.
	pub fn resolve(&self, text_color: &str) -> String {
		if !text_color.starts_with('#') {
			if let Some(color) = self.map.get(text_color) {
				return color.clone()
			}
		} else if self.fmt.is_match(text_color) {
			let mut color = text_color.to_lowercase();
			if !color.contains('|') {
				color.push_str("|x");
			}
			return color
		}

		DEFAULT_COLOR.into()
	}

	/// Create a color alias. Aliasing a name to the default color removes
	/// it; names may not begin with `#`.
	pub fn alias(&mut self, name: &str, color: &str) {
		let color = self.resolve(color);

		if color == DEFAULT_COLOR {
			self.map.remove(name);
			return
		}
		if name.starts_with('#') {
			return
		}
		self.map.insert(name.into(), color);
	}
}
