//! Recording writer and scripted reader shared by the unit tests.

use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{Error, Reader, Scalar, ScalarRef, Writer};

// -----------------------------------------------------------------------------
// EventWriter

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(String, String),
    Marker(String),
    Value(String),
    BeginObject(String),
    EndObject,
    BeginArray(String),
    EndArray,
    BeginAttributes,
    Attribute(String, String),
    EndAttributes,
}

impl Event {
    pub fn write(name: &str, value: &str) -> Self {
        Self::Write(name.to_string(), value.to_string())
    }

    pub fn value(value: &str) -> Self {
        Self::Value(value.to_string())
    }

    pub fn object(name: &str) -> Self {
        Self::BeginObject(name.to_string())
    }

    pub fn array(name: &str) -> Self {
        Self::BeginArray(name.to_string())
    }

    pub fn attribute(name: &str, value: &str) -> Self {
        Self::Attribute(name.to_string(), value.to_string())
    }
}

#[derive(Debug, Default)]
pub struct EventWriter {
    pub events: Vec<Event>,
}

impl Writer for EventWriter {
    fn write(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        self.events.push(Event::Write(name.to_string(), value.to_string()));
        Ok(())
    }

    fn write_marker(&mut self, name: &str) -> Result<(), Error> {
        self.events.push(Event::Marker(name.to_string()));
        Ok(())
    }

    fn write_value(&mut self, value: ScalarRef<'_>) -> Result<(), Error> {
        self.events.push(Event::Value(value.to_string()));
        Ok(())
    }

    fn begin_object(&mut self, name: &str) -> Result<(), Error> {
        self.events.push(Event::object(name));
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        self.events.push(Event::EndObject);
        Ok(())
    }

    fn begin_array(&mut self, name: &str) -> Result<(), Error> {
        self.events.push(Event::array(name));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        self.events.push(Event::EndArray);
        Ok(())
    }

    fn begin_attributes(&mut self) -> Result<(), Error> {
        self.events.push(Event::BeginAttributes);
        Ok(())
    }

    fn write_attribute(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        self.events.push(Event::Attribute(name.to_string(), value.to_string()));
        Ok(())
    }

    fn end_attributes(&mut self) -> Result<(), Error> {
        self.events.push(Event::EndAttributes);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ScriptReader

/// One answer of a [`ScriptReader`], in the order the deserializer asks.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Answer to `next_entry_name`.
    Name(&'static str),
    /// `next_entry_name` reaches the end of the current sequence.
    End,
    /// Answer to `next_array_element`.
    Element(bool),
    /// Answer to `read_value`; `None` means no value.
    Value(Option<&'static str>),
    /// Answer to `read_attribute`; `None` means absent.
    Attribute(&'static str, Option<&'static str>),
}

/// Replays a script and panics as soon as the deserializer deviates from it.
#[derive(Debug, Default)]
pub struct ScriptReader {
    steps: VecDeque<Step>,
    pub skipped: usize,
}

impl ScriptReader {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            skipped: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.steps.is_empty()
    }

    fn next_step(&mut self, call: &str) -> Step {
        match self.steps.pop_front() {
            Some(step) => step,
            None => panic!("script exhausted on `{call}`"),
        }
    }
}

impl Reader for ScriptReader {
    fn next_entry_name(&mut self) -> Result<Option<String>, Error> {
        match self.next_step("next_entry_name") {
            Step::Name(name) => Ok(Some(name.to_string())),
            Step::End => Ok(None),
            other => panic!("`next_entry_name` called, script has {other:?}"),
        }
    }

    fn next_array_element(&mut self) -> Result<bool, Error> {
        match self.next_step("next_array_element") {
            Step::Element(more) => Ok(more),
            other => panic!("`next_array_element` called, script has {other:?}"),
        }
    }

    fn read_value(&mut self, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.next_step("read_value") {
            Step::Value(Some(text)) => {
                target.set_text(text)?;
                Ok(true)
            }
            Step::Value(None) => Ok(false),
            other => panic!("`read_value` called, script has {other:?}"),
        }
    }

    fn read_attribute(&mut self, name: &str, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.next_step("read_attribute") {
            Step::Attribute(expected, value) => {
                assert_eq!(name, expected, "attribute read out of order");
                match value {
                    Some(text) => {
                        target.set_text(text)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            other => panic!("`read_attribute` called, script has {other:?}"),
        }
    }

    fn skip_entry(&mut self) -> Result<(), Error> {
        self.skipped += 1;
        Ok(())
    }
}
