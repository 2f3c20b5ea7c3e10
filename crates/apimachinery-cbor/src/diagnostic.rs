//! Diagnostic notation rendering (RFC 8949 section 8).
//!
//! Used only to show a wire item inside an error message. Unlike the
//! decoder, this renders the raw structure faithfully: byte strings as
//! `h'..'`, tags as `n(..)`, indefinite-length groups with a `_` marker.

use crate::constants::{BREAK, INDEFINITE};

/// Renders a wire item in diagnostic notation. Never fails: malformed or
/// truncated input is rendered as far as possible and marked.
pub fn diagnostic(data: &[u8]) -> String {
    let mut r = Renderer {
        data,
        x: 0,
        out: String::new(),
    };
    if r.render_item().is_err() {
        r.out.push_str("...(truncated)");
    } else if r.x != data.len() {
        r.out.push_str(" ...(extraneous data)");
    }
    r.out
}

struct Renderer<'a> {
    data: &'a [u8],
    x: usize,
    out: String,
}

// Internal signal: ran out of bytes or hit a reserved header.
struct Stop;

impl<'a> Renderer<'a> {
    fn u8(&mut self) -> Result<u8, Stop> {
        let v = *self.data.get(self.x).ok_or(Stop)?;
        self.x += 1;
        Ok(v)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Stop> {
        if self.data.len().saturating_sub(self.x) < n {
            return Err(Stop);
        }
        let slice = &self.data[self.x..self.x + n];
        self.x += n;
        Ok(slice)
    }

    fn arg(&mut self, info: u8) -> Result<u64, Stop> {
        Ok(match info {
            0..=23 => u64::from(info),
            24 => u64::from(self.u8()?),
            25 => {
                let b = self.take(2)?;
                u64::from(u16::from_be_bytes([b[0], b[1]]))
            }
            26 => {
                let b = self.take(4)?;
                u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            }
            27 => {
                let b = self.take(8)?;
                let mut buf = [0u8; 8];
                buf.copy_from_slice(b);
                u64::from_be_bytes(buf)
            }
            _ => return Err(Stop),
        })
    }

    fn peek_break(&mut self) -> bool {
        if self.data.get(self.x) == Some(&BREAK) {
            self.x += 1;
            true
        } else {
            false
        }
    }

    fn render_item(&mut self) -> Result<(), Stop> {
        let ib = self.u8()?;
        let major = ib >> 5;
        let info = ib & 0x1f;
        match major {
            0 => {
                let n = self.arg(info)?;
                self.out.push_str(&n.to_string());
            }
            1 => {
                let n = self.arg(info)?;
                self.out.push_str(&(-1i128 - i128::from(n)).to_string());
            }
            2 => self.render_bytes(info)?,
            3 => self.render_text(info)?,
            4 => self.render_seq(info, '[', ']')?,
            5 => self.render_map(info)?,
            6 => {
                let tag = self.arg(info)?;
                self.out.push_str(&tag.to_string());
                self.out.push('(');
                self.render_item()?;
                self.out.push(')');
            }
            _ => self.render_simple(info)?,
        }
        Ok(())
    }

    fn render_bytes(&mut self, info: u8) -> Result<(), Stop> {
        if info == INDEFINITE {
            self.out.push_str("(_ ");
            let mut first = true;
            while !self.peek_break() {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                let ib = self.u8()?;
                if ib >> 5 != 2 {
                    return Err(Stop);
                }
                let len = self.arg(ib & 0x1f)? as usize;
                let chunk = self.take(len)?;
                push_hex_literal(&mut self.out, chunk);
            }
            self.out.push(')');
        } else {
            let len = self.arg(info)? as usize;
            let bytes = self.take(len)?;
            push_hex_literal(&mut self.out, bytes);
        }
        Ok(())
    }

    fn render_text(&mut self, info: u8) -> Result<(), Stop> {
        if info == INDEFINITE {
            self.out.push_str("(_ ");
            let mut first = true;
            while !self.peek_break() {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                let ib = self.u8()?;
                if ib >> 5 != 3 {
                    return Err(Stop);
                }
                let len = self.arg(ib & 0x1f)? as usize;
                let chunk = self.take(len)?;
                push_text_literal(&mut self.out, chunk);
            }
            self.out.push(')');
        } else {
            let len = self.arg(info)? as usize;
            let bytes = self.take(len)?;
            push_text_literal(&mut self.out, bytes);
        }
        Ok(())
    }

    fn render_seq(&mut self, info: u8, open: char, close: char) -> Result<(), Stop> {
        self.out.push(open);
        if info == INDEFINITE {
            self.out.push_str("_ ");
            let mut first = true;
            while !self.peek_break() {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.render_item()?;
            }
        } else {
            let len = self.arg(info)?;
            for i in 0..len {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.render_item()?;
            }
        }
        self.out.push(close);
        Ok(())
    }

    fn render_map(&mut self, info: u8) -> Result<(), Stop> {
        self.out.push('{');
        if info == INDEFINITE {
            self.out.push_str("_ ");
            let mut first = true;
            while !self.peek_break() {
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.render_item()?;
                self.out.push_str(": ");
                self.render_item()?;
            }
        } else {
            let len = self.arg(info)?;
            for i in 0..len {
                if i > 0 {
                    self.out.push_str(", ");
                }
                self.render_item()?;
                self.out.push_str(": ");
                self.render_item()?;
            }
        }
        self.out.push('}');
        Ok(())
    }

    fn render_simple(&mut self, info: u8) -> Result<(), Stop> {
        match info {
            20 => self.out.push_str("false"),
            21 => self.out.push_str("true"),
            22 => self.out.push_str("null"),
            23 => self.out.push_str("undefined"),
            24 => {
                let v = self.u8()?;
                self.out.push_str(&format!("simple({v})"));
            }
            25 => {
                let b = self.take(2)?;
                let v = f64::from(half::f16::from_bits(u16::from_be_bytes([b[0], b[1]])));
                push_float(&mut self.out, v);
            }
            26 => {
                let b = self.take(4)?;
                let v = f64::from(f32::from_bits(u32::from_be_bytes([b[0], b[1], b[2], b[3]])));
                push_float(&mut self.out, v);
            }
            27 => {
                let b = self.take(8)?;
                let mut buf = [0u8; 8];
                buf.copy_from_slice(b);
                push_float(&mut self.out, f64::from_bits(u64::from_be_bytes(buf)));
            }
            _ => {
                if info == 31 {
                    return Err(Stop);
                }
                self.out.push_str(&format!("simple({info})"));
            }
        }
        Ok(())
    }
}

fn push_hex_literal(out: &mut String, bytes: &[u8]) {
    out.push_str("h'");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out.push('\'');
}

fn push_text_literal(out: &mut String, bytes: &[u8]) {
    match std::str::from_utf8(bytes) {
        Ok(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
        // Not renderable as text; fall back to the byte form.
        Err(_) => push_hex_literal(out, bytes),
    }
}

fn push_float(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v == f64::INFINITY {
        out.push_str("Infinity");
    } else if v == f64::NEG_INFINITY {
        out.push_str("-Infinity");
    } else {
        out.push_str(&format!("{v:?}"));
    }
}
