/*!
 * JSON output styles for string catalogs.
 *
 * Xcode writes catalogs with two-space indentation, a space on both sides of
 * the key separator (`"key" : value`) and a blank line inside empty
 * containers. Other tools write plain pretty JSON. The style is detected from
 * the parsed text so that untouched catalogs serialize back to the same bytes.
 */

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Serializer, Value};
use std::io;

/// Layout used when writing a catalog back to text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// `"key" : value`, empty containers as `{\n\n}`
    #[default]
    Xcode,
    /// `"key": value`, as produced by `serde_json::to_string_pretty`
    Standard,
}

/// Output style plus whether the source text ended with a newline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFormat {
    pub style: JsonStyle,
    pub trailing_newline: bool,
}

impl OutputFormat {
    /// Infer the output format from raw catalog text
    pub fn detect(text: &str) -> Self {
        let style = if text.contains("\" : ") || !text.contains("\": ") {
            JsonStyle::Xcode
        } else {
            JsonStyle::Standard
        };
        Self {
            style,
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Serialize a JSON value in this format
    pub fn write(&self, value: &Value) -> serde_json::Result<String> {
        let mut buffer = Vec::with_capacity(4096);
        match self.style {
            JsonStyle::Xcode => {
                let mut serializer = Serializer::with_formatter(&mut buffer, XcodeFormatter::new());
                value.serialize(&mut serializer)?;
            }
            JsonStyle::Standard => {
                let mut serializer =
                    Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"  "));
                value.serialize(&mut serializer)?;
            }
        }
        if self.trailing_newline {
            buffer.push(b'\n');
        }
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Pretty printer matching Xcode's catalog layout
#[derive(Debug, Default)]
struct XcodeFormatter {
    current_indent: usize,
    has_value: bool,
}

impl XcodeFormatter {
    fn new() -> Self {
        Self::default()
    }

    fn indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.current_indent {
            writer.write_all(b"  ")?;
        }
        Ok(())
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.current_indent -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
        } else {
            writer.write_all(b"\n\n")?;
        }
        self.indent(writer)?;
        writer.write_all(bracket)
    }
}

impl Formatter for XcodeFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b",\n" })?;
        self.indent(writer)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        writer.write_all(if first { b"\n" } else { b",\n" })?;
        self.indent(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}
