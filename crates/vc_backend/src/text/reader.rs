use alloc::collections::VecDeque;
use std::io::{self, Write as _};

use vc_entry::{Error, Reader, Scalar};

/// The token that ends a sequence or leaves a value unchanged.
pub const END_TOKEN: &str = "-";

// -----------------------------------------------------------------------------
// TextReader

/// A [`Reader`] consuming whitespace-separated tokens, as typed on a console.
///
/// Every request takes one token. [`END_TOKEN`] (or the end of the input)
/// answers "nothing": no more entries, no more elements, or no value. Any
/// other token accepted by [`next_array_element`] means "one more element".
///
/// When built with [`with_prompts`], a short prompt is written before each
/// request:
///
/// ```text
/// Entry name: Root
/// Entry name: Int
/// Attr 'ENABLE': true
/// Value: 20
/// Entry name: -
/// Entry name: -
/// ```
///
/// # Examples
///
/// ```
/// use vc_backend::text::TextReader;
/// use vc_entry::{Deserializer, Entry};
///
/// let mut values = Vec::<u8>::new();
/// let mut reader = TextReader::new("Vec + 4 + 2 - -".as_bytes());
/// Deserializer::new(&mut reader)
///     .deserialize(&mut [Entry::borrowed_mut("Vec", &mut values)])
///     .unwrap();
/// assert_eq!(values, [4, 2]);
/// ```
///
/// [`next_array_element`]: Reader::next_array_element
/// [`with_prompts`]: TextReader::with_prompts
#[derive(Debug)]
pub struct TextReader<R, P = io::Sink> {
    input: R,
    prompts: P,
    tokens: VecDeque<String>,
}

impl<R: io::BufRead> TextReader<R> {
    #[inline]
    pub fn new(input: R) -> Self {
        Self::with_prompts(input, io::sink())
    }
}

impl<R: io::BufRead, P: io::Write> TextReader<R, P> {
    #[inline]
    pub fn with_prompts(input: R, prompts: P) -> Self {
        Self {
            input,
            prompts,
            tokens: VecDeque::new(),
        }
    }

    #[inline]
    pub fn into_inner(self) -> (R, P) {
        (self.input, self.prompts)
    }

    fn next_token(&mut self) -> Result<Option<String>, Error> {
        let mut line = String::new();
        while self.tokens.is_empty() {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                log::trace!("end of text input");
                return Ok(None);
            }
            self.tokens
                .extend(line.split_whitespace().map(String::from));
        }
        Ok(self.tokens.pop_front())
    }

    /// Prompts, then returns the next token unless it means "nothing".
    fn next_input(&mut self, prompt: core::fmt::Arguments<'_>) -> Result<Option<String>, Error> {
        self.prompts.write_fmt(prompt)?;
        self.prompts.flush()?;

        Ok(self.next_token()?.filter(|token| token != END_TOKEN))
    }
}

impl<R: io::BufRead, P: io::Write> Reader for TextReader<R, P> {
    fn next_entry_name(&mut self) -> Result<Option<String>, Error> {
        self.next_input(format_args!("Entry name: "))
    }

    fn next_array_element(&mut self) -> Result<bool, Error> {
        Ok(self.next_input(format_args!("Next Entry [+/-]: "))?.is_some())
    }

    fn read_value(&mut self, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.next_input(format_args!("Value: "))? {
            Some(token) => {
                target.set_text(&token)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read_attribute(&mut self, name: &str, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.next_input(format_args!("Attr '{name}': "))? {
            Some(token) => {
                target.set_text(&token)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use vc_entry::access::EntryPathAccess;
    use vc_entry::{Attribute, Deserializer, Entry, Error};

    use super::TextReader;

    fn scenario() -> Entry<'static> {
        Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::string("Str", "Test"),
            Entry::tuple("Child", [Entry::new("Bool", true)]),
        ])
    }

    #[test]
    fn console_session() {
        let input = "Root\n\
                     Int False 20\n\
                     Child Bool - -\n\
                     Extra\n\
                     -\n\
                     -\n";
        let mut reader = TextReader::with_prompts(Cursor::new(input), Vec::new());

        let mut tree = scenario();
        let mut deserializer = Deserializer::new(&mut reader);
        deserializer
            .deserialize(core::slice::from_mut(&mut tree))
            .unwrap();
        let report = deserializer.into_report();

        assert_eq!(*tree.resolve::<i32>("Root/Int"), 20);
        assert!(!*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert!(*tree.resolve::<bool>("Root/Child/Bool"));
        assert_eq!(report.unmatched, ["Root/Extra"]);
        assert_eq!(report.missing, ["Root/Child/Bool"]);

        let (_, prompts) = reader.into_inner();
        assert_eq!(
            String::from_utf8(prompts).unwrap(),
            "Entry name: Entry name: Attr 'ENABLE': Value: \
             Entry name: Entry name: Value: Entry name: \
             Entry name: Entry name: Entry name: "
        );
    }

    #[test]
    fn end_of_input_ends_every_sequence() {
        let mut values = vec![1_u16];
        let mut reader = TextReader::new("Vec + 7 +".as_bytes());
        let mut deserializer = Deserializer::new(&mut reader);
        deserializer
            .deserialize(&mut [Entry::borrowed_mut("Vec", &mut values)])
            .unwrap();

        assert_eq!(deserializer.report().missing, ["Vec/2"]);
        assert_eq!(values, [1, 7, 0]);
    }

    #[test]
    fn bad_tokens_fail() {
        let mut value = 0_i32;
        let mut reader = TextReader::new("Int twelve".as_bytes());
        let err = Deserializer::new(&mut reader)
            .deserialize(&mut [Entry::borrowed_mut("Int", &mut value)])
            .unwrap_err();

        assert!(matches!(err.root_cause(), Error::Scalar(_)));
        assert_eq!(value, 0);
    }
}
