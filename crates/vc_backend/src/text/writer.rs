use std::io::{self, Write as _};

use vc_entry::{Error, ScalarRef, Writer};

// -----------------------------------------------------------------------------
// TextWriterConfig

/// Layout options of a [`TextWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWriterConfig {
    /// Spaces added per nesting level.
    pub indent: usize,
}

impl TextWriterConfig {
    #[inline]
    pub const fn new() -> Self {
        Self { indent: 2 }
    }

    #[inline]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for TextWriterConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// TextWriter

/// A [`Writer`] printing a human-readable dump, one entry per line.
///
/// ```text
/// 'Root' : {
///     -> ATTRS: [ 'ENABLE': true ]
///   'Int' (integral) : 5
///   'Str' (string) : "Test"
///   'Vec' : [
///     1
///     2
///   ]
/// }
/// ```
///
/// # Examples
///
/// ```
/// use vc_backend::text::TextWriter;
/// use vc_entry::{Entry, Serializer};
///
/// let mut writer = TextWriter::new(Vec::new());
/// Serializer::new(&mut writer)
///     .serialize(&[Entry::new("Int", 5_i32), Entry::new("Flag", true)])
///     .unwrap();
///
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "'Int' (integral) : 5\n'Flag' (bool) : true\n");
/// ```
#[derive(Debug)]
pub struct TextWriter<W> {
    out: W,
    config: TextWriterConfig,
    depth: usize,
    first_attribute: bool,
}

impl<W: io::Write> TextWriter<W> {
    #[inline]
    pub fn new(out: W) -> Self {
        Self::with_config(out, TextWriterConfig::new())
    }

    #[inline]
    pub fn with_config(out: W, config: TextWriterConfig) -> Self {
        Self {
            out,
            config,
            depth: 0,
            first_attribute: true,
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&mut self) -> io::Result<()> {
        let width = self.depth * self.config.indent;
        write!(self.out, "{:width$}", "")
    }

    fn open(&mut self, name: &str, bracket: char) -> Result<(), Error> {
        self.indent()?;
        writeln!(self.out, "'{name}' : {bracket}")?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, bracket: char) -> Result<(), Error> {
        if self.depth == 0 {
            return Err(Error::backend(format!("unbalanced `{bracket}`")));
        }
        self.depth -= 1;
        self.indent()?;
        writeln!(self.out, "{bracket}")?;
        Ok(())
    }
}

fn type_label(value: &ScalarRef<'_>) -> &'static str {
    match value {
        ScalarRef::Int(_) | ScalarRef::UInt(_) => "integral",
        ScalarRef::Bool(_) => "bool",
        ScalarRef::Str(_) => "string",
        ScalarRef::Other(_) => "T",
    }
}

impl<W: io::Write> Writer for TextWriter<W> {
    fn write(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        self.indent()?;
        let label = type_label(&value);
        match value {
            ScalarRef::Str(text) => writeln!(self.out, "'{name}' ({label}) : \"{text}\"")?,
            value => writeln!(self.out, "'{name}' ({label}) : {value}")?,
        }
        Ok(())
    }

    fn write_marker(&mut self, name: &str) -> Result<(), Error> {
        self.indent()?;
        writeln!(self.out, "'{name}' (void)")?;
        Ok(())
    }

    fn write_value(&mut self, value: ScalarRef<'_>) -> Result<(), Error> {
        self.indent()?;
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    fn begin_object(&mut self, name: &str) -> Result<(), Error> {
        self.open(name, '{')
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.close('}')
    }

    fn begin_array(&mut self, name: &str) -> Result<(), Error> {
        self.open(name, '[')
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.close(']')
    }

    fn begin_attributes(&mut self) -> Result<(), Error> {
        self.indent()?;
        write!(self.out, "  -> ATTRS: [ ")?;
        self.first_attribute = true;
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        if !self.first_attribute {
            write!(self.out, ", ")?;
        }
        self.first_attribute = false;
        write!(self.out, "'{name}': {value}")?;
        Ok(())
    }

    fn end_attributes(&mut self) -> Result<(), Error> {
        writeln!(self.out, " ]")?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_entry::access::EntryPathAccess;
    use vc_entry::{Attribute, Entry, Error, Serializer, Writer};

    use super::{TextWriter, TextWriterConfig};

    fn dump(entries: &[Entry<'_>], config: TextWriterConfig) -> String {
        let mut writer = TextWriter::with_config(Vec::new(), config);
        Serializer::new(&mut writer).serialize(entries).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn scenario() -> Entry<'static> {
        Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::string("Str", "Test"),
            Entry::tuple("Child", [Entry::new("Bool", true)]),
        ])
    }

    #[test]
    fn console_layout() {
        let mut tree = scenario();
        *tree.resolve_mut::<i32>("Root/Int") = 20;

        assert_eq!(
            dump(&[tree], TextWriterConfig::new()),
            "'Root' : {\n\
             \x20   -> ATTRS: [ 'ENABLE': true ]\n\
             \x20 'Int' (integral) : 20\n\
             \x20 'Str' (string) : \"Test\"\n\
             \x20 'Child' : {\n\
             \x20   'Bool' (bool) : true\n\
             \x20 }\n\
             }\n"
        );
    }

    #[test]
    fn arrays_markers_and_attribute_lists() {
        let tree = Entry::new("Vec", vec![1.5_f32, 2.0]).with_attributes([
            Attribute::new("MIN", 0_u8),
            Attribute::new("UNIT", String::from("m")),
        ]);

        assert_eq!(
            dump(&[tree], TextWriterConfig::new().with_indent(4)),
            "  -> ATTRS: [ 'MIN': 0, 'UNIT': m ]\n\
             'Vec' : [\n\
             \x20   1.5\n\
             \x20   2\n\
             ]\n"
        );

        let mut writer = TextWriter::new(Vec::new());
        Serializer::new(&mut writer).serialize_marker("Sep").unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"'Sep' (void)\n");
    }

    #[test]
    fn unbalanced_close_fails() {
        let mut writer = TextWriter::new(Vec::new());
        assert!(matches!(writer.end_object(), Err(Error::Backend(_))));
    }
}
