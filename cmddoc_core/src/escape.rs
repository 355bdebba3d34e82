use thiserror::Error;

/// A quoted fragment contained an escape sequence that is not valid in a C
/// string literal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason} (in {fragment:?})")]
pub struct EscapeError {
	/// The raw fragment as it appeared between the quotes.
	pub fragment: String,
	/// Description of the offending sequence.
	pub reason: String,
}

/// Decode the backslash escapes of a fragment captured from between the
/// double quotes of a C string literal.
///
/// Supported: `\a \b \f \n \r \t \v \\ \' \" \?`, hex `\xH` / `\xHH` and
/// octal `\o` to `\ooo`. Hex and octal escapes denote a single byte, which
/// is decoded as the Latin-1 character of the same value. Anything else,
/// such as `\q`, `\$` or `\u{41}`, is rejected instead of being passed
/// through. Quote characters that are not escaped are kept as they are.
pub fn decode_escapes(raw: &str) -> Result<String, EscapeError> {
	if !raw.contains('\\') {
		return Ok(raw.to_string());
	}

	let mut out = String::with_capacity(raw.len());
	let mut chars = raw.char_indices().peekable();

	while let Some((start, ch)) = chars.next() {
		if ch != '\\' {
			out.push(ch);
			continue;
		}

		let Some((_, next)) = chars.next() else {
			return Err(invalid(raw, format!("trailing backslash at byte {start}")));
		};

		let decoded = match next {
			'a' => '\u{07}',
			'b' => '\u{08}',
			'f' => '\u{0c}',
			'n' => '\n',
			'r' => '\r',
			't' => '\t',
			'v' => '\u{0b}',
			'\\' | '\'' | '"' | '?' => next,
			'x' => {
				let mut value = 0;
				let mut digits = 0;
				while digits < 2 {
					let Some(digit) = chars.peek().and_then(|&(_, c)| c.to_digit(16)) else {
						break;
					};
					chars.next();
					value = value * 16 + digit;
					digits += 1;
				}
				if digits == 0 {
					return Err(invalid(
						raw,
						format!("`\\x` without hex digits at byte {start}"),
					));
				}
				byte(raw, value, start)?
			}
			'0'..='7' => {
				let mut value = u32::from(next) - u32::from('0');
				for _ in 0..2 {
					let Some(digit) = chars.peek().and_then(|&(_, c)| c.to_digit(8)) else {
						break;
					};
					chars.next();
					value = value * 8 + digit;
				}
				byte(raw, value, start)?
			}
			other => {
				return Err(invalid(
					raw,
					format!("unknown escape sequence `\\{other}` at byte {start}"),
				));
			}
		};

		out.push(decoded);
	}

	Ok(out)
}

/// The character for a numeric escape, which must fit in one byte.
fn byte(raw: &str, value: u32, start: usize) -> Result<char, EscapeError> {
	u8::try_from(value).map(char::from).map_err(|_| {
		invalid(
			raw,
			format!("escape value {value:#o} at byte {start} does not fit in a byte"),
		)
	})
}

fn invalid(raw: &str, reason: String) -> EscapeError {
	EscapeError {
		fragment: raw.to_string(),
		reason,
	}
}
