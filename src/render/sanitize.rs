// src/render/sanitize.rs — Strip terminal control sequences from untrusted text
//
// Assistant and user content is drawn straight into the terminal, so escape
// sequences (CSI, OSC, DCS...) and bare control characters are removed before
// any rendering. Newlines and tabs survive; CRLF collapses to LF.

use std::borrow::Cow;

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';
const CSI_C1: char = '\u{9b}';
const OSC_C1: char = '\u{9d}';

pub fn sanitize(input: &str) -> Cow<'_, str> {
    if !input.chars().any(needs_work) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    scan(input, &mut out);
    Cow::Owned(out)
}

/// Incremental `sanitize` for text that arrives in pieces.
///
/// Output is held back while an escape sequence is still open, or while a
/// trailing CR may turn out to be half of a CRLF, so the concatenated output
/// always equals `sanitize` of the concatenated input.
#[derive(Debug, Default)]
pub struct StreamSanitizer {
    pending: String,
}

impl StreamSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more text; returns the part of the output that is now final.
    pub fn push(&mut self, text: &str) -> String {
        self.pending.push_str(text);
        let mut out = String::with_capacity(self.pending.len());
        let (settled, out_len) = scan(&self.pending, &mut out);
        out.truncate(out_len);
        self.pending.replace_range(..settled, "");
        out
    }

    /// End of input: whatever is still held is sanitized as-is.
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.pending);
        sanitize(&rest).into_owned()
    }
}

fn needs_work(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Sanitize all of `input` into `out`.
///
/// Returns the byte offset in `input` where a construct that more input could
/// still change begins, paired with the length `out` had at that point. Both
/// are the full lengths when nothing is left open.
fn scan(input: &str, out: &mut String) -> (usize, usize) {
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let mark = (i, out.len());
        let closed = match c {
            ESC => match chars.next() {
                None => false,
                Some((_, '[')) => skip_csi(&mut chars),
                Some((_, ']' | 'P' | 'X' | '^' | '_')) => skip_string(&mut chars),
                // Two-character escape (ESC c, ESC 7...): drop both.
                Some(_) => true,
            },
            CSI_C1 => skip_csi(&mut chars),
            OSC_C1 => skip_string(&mut chars),
            '\r' => match chars.peek() {
                Some((_, '\n')) => true,
                Some(_) => {
                    out.push('\n');
                    true
                }
                None => {
                    out.push('\n');
                    false
                }
            },
            '\n' | '\t' => {
                out.push(c);
                true
            }
            c if c.is_control() => true,
            c => {
                out.push(c);
                true
            }
        };
        if !closed {
            return mark;
        }
    }

    (input.len(), out.len())
}

/// CSI: parameter/intermediate bytes up to a final byte in 0x40..=0x7E.
fn skip_csi(chars: &mut Chars<'_>) -> bool {
    chars.any(|(_, c)| ('\u{40}'..='\u{7e}').contains(&c))
}

/// OSC/DCS-style strings end at BEL or ST (ESC \).
fn skip_string(chars: &mut Chars<'_>) -> bool {
    while let Some((_, c)) = chars.next() {
        match c {
            BEL | '\u{9c}' => return true,
            ESC => {
                return match chars.peek() {
                    None => false,
                    Some((_, '\\')) => {
                        chars.next();
                        true
                    }
                    Some(_) => true,
                };
            }
            _ => {}
        }
    }
    false
}
