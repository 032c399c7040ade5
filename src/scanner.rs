//! Escape-aware character scanner shared by the pattern and URL tokenizers.
//!
//! [`scan`] walks the input one character at a time, followed by a virtual
//! [`Symbol::End`], and hands every symbol to a step function. The step
//! function says what the symbol means by returning a [`Step`], and steers
//! the scan through the [`Scan`] handle: it can ask for the next character to
//! be taken literally, or skip characters it already consumed by looking
//! ahead. Each call to [`scan`] owns a fresh [`Scan`], so nothing leaks from
//! one tokenizer call into the next.

use std::borrow::Cow;

/// One scanned position: a character, or the end-of-input marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
	Char(char),
	End,
}

impl Symbol {
	/// True if this symbol is the character `c`.
	pub fn is(self, c: char) -> bool {
		self == Symbol::Char(c)
	}
}

/// Outcome of a step function for the current symbol.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<T> {
	/// Drop the symbol.
	Skip,
	/// Append the character to the pending literal.
	Literal,
	/// Emit one token.
	Emit(T),
	/// Emit several tokens, in order.
	EmitMany(Vec<T>),
}

/// Per-call scan handle passed to the step function.
#[derive(Debug)]
pub struct Scan<S> {
	chars: Vec<char>,
	literal: String,
	skip: usize,
	escape_next: bool,

	/// Caller-defined state threaded through the scan.
	pub state: S,
}

impl<S> Scan<S> {
	/// Symbol at `index`, or [`Symbol::End`] past the last character.
	pub fn peek(&self, index: usize) -> Symbol {
		self.chars.get(index).copied().map_or(Symbol::End, Symbol::Char)
	}

	/// Accumulate the next character literally, whatever it is.
	pub fn escape_next(&mut self) {
		self.escape_next = true;
	}

	/// Skip the next `count` characters. The end marker is never skipped.
	pub fn skip(&mut self, count: usize) {
		self.skip += count;
	}

	pub fn has_literal(&self) -> bool {
		!self.literal.is_empty()
	}

	/// Take the accumulated literal, leaving the buffer empty.
	pub fn take_literal(&mut self) -> String {
		std::mem::take(&mut self.literal)
	}
}

/// Scan `input` with `step`, collecting the tokens it emits.
///
/// Errors returned by `step` abort the scan and are passed through unchanged.
pub fn scan<S, T, E, F>(input: &str, state: S, mut step: F) -> Result<Vec<T>, E>
where
	F: FnMut(&mut Scan<S>, usize, Symbol) -> Result<Step<T>, E>,
{
	let mut scan = Scan {
		chars: input.chars().collect(),
		literal: String::new(),
		skip: 0,
		escape_next: false,
		state,
	};
	let mut tokens = Vec::new();

	for index in 0..=scan.chars.len() {
		let symbol = scan.peek(index);

		if scan.skip > 0 && symbol != Symbol::End {
			scan.skip -= 1;
			continue;
		}

		if scan.escape_next {
			scan.escape_next = false;
			if let Symbol::Char(c) = symbol {
				scan.literal.push(c);
				continue;
			}
		}

		match step(&mut scan, index, symbol)? {
			Step::Skip => {}
			Step::Literal => {
				if let Symbol::Char(c) = symbol {
					scan.literal.push(c);
				}
			}
			Step::Emit(token) => tokens.push(token),
			Step::EmitMany(more) => tokens.extend(more),
		}
	}

	Ok(tokens)
}

/// Remove escaping backslashes, keeping the characters they protect.
///
/// A trailing lone backslash protects nothing and is dropped.
pub fn unescape(text: &str) -> Cow<'_, str> {
	if !text.contains('\\') {
		return Cow::Borrowed(text);
	}

	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(c) = chars.next() {
		if c == '\\' {
			if let Some(escaped) = chars.next() {
				out.push(escaped);
			}
		} else {
			out.push(c);
		}
	}
	Cow::Owned(out)
}
