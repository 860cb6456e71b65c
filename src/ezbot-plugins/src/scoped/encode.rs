//! JSON encoding options for saved config documents.

use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

/// How a config document is written.
///
/// The default writes compact JSON with non-ASCII characters and slashes left
/// unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Indent the output
    pub pretty: bool,
    /// Write non-ASCII characters as `\uXXXX`
    pub escape_unicode: bool,
    /// Write `/` as `\/`
    pub escape_slashes: bool,
}

impl EncodeOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }
}

/// Serialize `value` with the given options.
pub fn to_vec<T>(value: &T, options: EncodeOptions) -> serde_json::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::with_capacity(128);
    if options.pretty {
        let formatter = EscapingFormatter::new(PrettyFormatter::new(), options);
        value.serialize(&mut Serializer::with_formatter(&mut out, formatter))?;
    } else {
        let formatter = EscapingFormatter::new(CompactFormatter, options);
        value.serialize(&mut Serializer::with_formatter(&mut out, formatter))?;
    }
    Ok(out)
}

/// Delegates layout to `F` and applies the optional escaping to string
/// fragments.
struct EscapingFormatter<F> {
    inner: F,
    escape_unicode: bool,
    escape_slashes: bool,
}

impl<F> EscapingFormatter<F> {
    fn new(inner: F, options: EncodeOptions) -> Self {
        Self {
            inner,
            escape_unicode: options.escape_unicode,
            escape_slashes: options.escape_slashes,
        }
    }
}

impl<F: Formatter> Formatter for EscapingFormatter<F> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.escape_unicode && !self.escape_slashes {
            return self.inner.write_string_fragment(writer, fragment);
        }

        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escape_slash = self.escape_slashes && ch == '/';
            let escape_char = self.escape_unicode && !ch.is_ascii();
            if !escape_slash && !escape_char {
                continue;
            }
            if start < i {
                writer.write_all(&fragment.as_bytes()[start..i])?;
            }
            if escape_slash {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = i + ch.len_utf8();
        }
        if start < fragment.len() {
            writer.write_all(&fragment.as_bytes()[start..])?;
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}
