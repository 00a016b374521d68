//! External key-syntax decoder: turns a human-authored string like
//! `"<C-x><C-s>"` or `"<Up>"` into a [`KeySequence`].
//!
//! This is the textual front door both `Mapping::create` and the
//! `kui-probe` config file reader use; the matcher core never sees text,
//! only decoded sequences.

use crate::error::{Error, Result};
use crate::keycode::{symbolic, KeyCode, KeySequence};

/// Decode a key-syntax string into a [`KeySequence`].
///
/// Plain bytes pass through as their ASCII value. `<Tag>` runs name a
/// single key: `<Esc>`, `<CR>`/`<Enter>`, `<Tab>`, `<Space>`, `<BS>`,
/// `<Del>`, `<Up>`/`<Down>`/`<Left>`/`<Right>`, `<Home>`/`<End>`,
/// `<PageUp>`/`<PageDown>`, `<Insert>`, `<F1>`..`<F12>`, `<C-x>` for a
/// control-chord over a letter, and a bare hex or decimal literal such
/// as `<0x1b>` or `<27>`. Tag names are case-insensitive.
///
/// Only ASCII input is accepted; anything else is an [`Error::InvalidArgument`].
pub fn decode(text: &str) -> Result<KeySequence> {
    if !text.is_ascii() {
        return Err(Error::invalid("key syntax must be ASCII"));
    }
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            let close = bytes[i + 1..]
                .iter()
                .position(|&b| b == b'>')
                .map(|p| i + 1 + p)
                .ok_or_else(|| Error::invalid(format!("unterminated '<' in {text:?}")))?;
            let tag = std::str::from_utf8(&bytes[i + 1..close]).unwrap();
            out.push(decode_tag(tag)?);
            i = close + 1;
        } else {
            out.push(bytes[i] as KeyCode);
            i += 1;
        }
    }
    if out.is_empty() {
        return Err(Error::invalid("key sequence must not be empty"));
    }
    Ok(KeySequence::new(out))
}

fn decode_tag(tag: &str) -> Result<KeyCode> {
    let lower = tag.to_ascii_lowercase();
    let code = match lower.as_str() {
        "esc" | "escape" => 0x1B,
        "cr" | "enter" | "return" => 0x0D,
        "tab" => 0x09,
        "space" | "spc" => 0x20,
        "bs" | "backspace" => 0x7F,
        "nul" => 0x00,
        "del" | "delete" => symbolic::DELETE,
        "up" => symbolic::UP,
        "down" => symbolic::DOWN,
        "left" => symbolic::LEFT,
        "right" => symbolic::RIGHT,
        "home" => symbolic::HOME,
        "end" => symbolic::END,
        "pageup" | "pgup" => symbolic::PAGE_UP,
        "pagedown" | "pgdn" => symbolic::PAGE_DOWN,
        "insert" | "ins" => symbolic::INSERT,
        "backtab" => symbolic::BACKTAB,
        "f1" => symbolic::F1,
        "f2" => symbolic::F2,
        "f3" => symbolic::F3,
        "f4" => symbolic::F4,
        "f5" => symbolic::F5,
        "f6" => symbolic::F6,
        "f7" => symbolic::F7,
        "f8" => symbolic::F8,
        "f9" => symbolic::F9,
        "f10" => symbolic::F10,
        "f11" => symbolic::F11,
        "f12" => symbolic::F12,
        _ => return decode_ctrl_or_literal(tag),
    };
    Ok(code)
}

fn decode_ctrl_or_literal(tag: &str) -> Result<KeyCode> {
    if let Some(rest) = tag.strip_prefix("C-").or_else(|| tag.strip_prefix("c-")) {
        let mut chars = rest.chars();
        let ch = chars
            .next()
            .ok_or_else(|| Error::invalid("empty control chord"))?;
        if chars.next().is_some() {
            return Err(Error::invalid(format!("malformed control chord <C-{rest}>")));
        }
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            return Ok((lower as u8 - b'a' + 1) as KeyCode);
        }
        return match ch {
            '[' => Ok(0x1B),
            '\\' => Ok(0x1C),
            ']' => Ok(0x1D),
            '^' => Ok(0x1E),
            '_' => Ok(0x1F),
            '@' => Ok(0x00),
            _ => Err(Error::invalid(format!("unsupported control chord <C-{rest}>"))),
        };
    }
    if let Some(hex) = tag.strip_prefix("0x").or_else(|| tag.strip_prefix("0X")) {
        return u16::from_str_radix(hex, 16)
            .map_err(|_| Error::invalid(format!("bad hex literal <{tag}>")));
    }
    if let Ok(n) = tag.parse::<u16>() {
        return Ok(n);
    }
    Err(Error::invalid(format!("unknown key tag <{tag}>")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_literal() {
        let seq = decode("ab").unwrap();
        assert_eq!(seq.as_slice(), &[b'a' as KeyCode, b'b' as KeyCode]);
    }

    #[test]
    fn decodes_control_chord() {
        let seq = decode("<C-a>").unwrap();
        assert_eq!(seq.as_slice(), &[0x01]);
    }

    #[test]
    fn decodes_esc_and_function_keys() {
        assert_eq!(decode("<Esc>").unwrap().as_slice(), &[0x1B]);
        assert_eq!(decode("<F5>").unwrap().as_slice(), &[symbolic::F5]);
    }

    #[test]
    fn decodes_named_and_literal_mixed() {
        let seq = decode("<C-x><C-s>").unwrap();
        assert_eq!(seq.as_slice(), &[0x18, 0x13]);
    }

    #[test]
    fn rejects_empty_sequence() {
        assert!(decode("").is_err());
    }

    #[test]
    fn rejects_unterminated_tag() {
        assert!(decode("<Esc").is_err());
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(decode("é").is_err());
    }

    #[test]
    fn decodes_numeric_literal_tag() {
        assert_eq!(decode("<27>").unwrap().as_slice(), &[27]);
        assert_eq!(decode("<0x1b>").unwrap().as_slice(), &[0x1B]);
    }
}
