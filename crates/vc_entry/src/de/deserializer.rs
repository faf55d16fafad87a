use alloc::format;

use crate::de::{CollectionPolicy, DeserializeReport, DeserializerConfig};
use crate::trail::{Mark, Trail};
use crate::{Attribute, Entry, Error, List, Node, NodeMut, Reader, Scalar, Value};

// -----------------------------------------------------------------------------
// Deserializer

/// Populates entries in place from a [`Reader`], matching input names.
///
/// # Deserialization Rules
///
/// [`deserialize`](Deserializer::deserialize) asks the reader for entry
/// names until it signals the end of the sequence. Each name is looked up
/// among the given siblings, first declared match wins. Then:
///
/// - every attribute of the entry is read by name,
/// - a **tuple** recursively deserializes its children,
/// - a **scalar** reads its value,
/// - a **collection** appends one default element per "next array element"
///   the reader announces and populates it in place,
/// - an **object** deserializes its own entries through this deserializer.
///
/// Input is never fatal by itself: a name that matches no entry is skipped,
/// and a value or attribute absent from the input leaves its target as it
/// was. Both are logged and recorded in the [`DeserializeReport`].
///
/// The tree's structure never changes; only scalar values and collection
/// lengths do.
///
/// # Examples
///
/// ```
/// use vc_entry::{Deserializer, Entry, Error, Reader, Scalar};
///
/// struct OneValue(Option<&'static str>);
///
/// impl Reader for OneValue {
///     fn next_entry_name(&mut self) -> Result<Option<String>, Error> {
///         Ok(self.0.map(|_| "Int".to_owned()))
///     }
///     fn next_array_element(&mut self) -> Result<bool, Error> { Ok(false) }
///     fn read_value(&mut self, target: &mut dyn Scalar) -> Result<bool, Error> {
///         let text = self.0.take().unwrap();
///         target.set_text(text)?;
///         Ok(true)
///     }
///     fn read_attribute(&mut self, _: &str, _: &mut dyn Scalar) -> Result<bool, Error> {
///         Ok(false)
///     }
/// }
///
/// let mut value = 0_i32;
/// let mut reader = OneValue(Some("42"));
/// let mut deserializer = Deserializer::new(&mut reader);
/// deserializer.deserialize(&mut [Entry::borrowed_mut("Int", &mut value)]).unwrap();
///
/// assert!(deserializer.report().is_clean());
/// assert_eq!(value, 42);
/// ```
pub struct Deserializer<'r> {
    reader: &'r mut dyn Reader,
    config: DeserializerConfig,
    report: DeserializeReport,
    trail: Trail,
}

impl<'r> Deserializer<'r> {
    #[inline]
    pub fn new(reader: &'r mut dyn Reader) -> Self {
        Self::with_config(reader, DeserializerConfig::new())
    }

    #[inline]
    pub fn with_config(reader: &'r mut dyn Reader, config: DeserializerConfig) -> Self {
        Self {
            reader,
            config,
            report: DeserializeReport::default(),
            trail: Trail::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &DeserializerConfig {
        &self.config
    }

    /// Returns the underlying reader, for objects that consume raw input.
    #[inline]
    pub fn reader(&mut self) -> &mut dyn Reader {
        &mut *self.reader
    }

    /// Returns what has been skipped or left unchanged so far.
    #[inline]
    pub fn report(&self) -> &DeserializeReport {
        &self.report
    }

    #[inline]
    pub fn into_report(self) -> DeserializeReport {
        self.report
    }

    /// Consumes a named sequence from the reader into sibling entries.
    pub fn deserialize(&mut self, entries: &mut [Entry<'_>]) -> Result<(), Error> {
        loop {
            let name = match self.reader.next_entry_name() {
                Ok(Some(name)) => name,
                Ok(None) => {
                    self.check_stray_value();
                    return Ok(());
                }
                Err(err) => return Err(self.trail.wrap(err)),
            };

            match entries.iter_mut().find(|entry| entry.name().as_str() == name) {
                Some(entry) => self.deserialize_entry(entry)?,
                None => {
                    let path = self.trail.path_to(&name);
                    log::warn!("no entry matches input `{path}`, skipping it");
                    self.report.unmatched.push(path);
                    self.reader.skip_entry().map_err(|err| self.trail.wrap(err))?;
                }
            }
        }
    }

    /// Populates a single entry whose name was just read.
    pub fn deserialize_entry(&mut self, entry: &mut Entry<'_>) -> Result<(), Error> {
        log::trace!("deserialize {} entry `{}`", entry.kind(), entry.name());
        self.scoped(entry.name().clone(), |this| this.read_entry(entry))
    }

    fn scoped(
        &mut self,
        mark: impl Into<Mark>,
        f: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.trail.push(mark);
        let result = f(self).map_err(|err| self.trail.wrap(err));
        self.trail.pop();
        result
    }

    fn read_entry(&mut self, entry: &mut Entry<'_>) -> Result<(), Error> {
        let (name, value, attributes) = entry.parts_mut();
        self.read_attributes(attributes)?;

        match value {
            Value::Tuple(children) => self.deserialize(children),
            Value::Node(slot) => match slot.get_mut() {
                Some(node) => self.read_node(node),
                None => Err(Error::ReadOnly(name.clone())),
            },
        }
    }

    fn read_attributes(&mut self, attributes: &mut [Attribute<'_>]) -> Result<(), Error> {
        for attribute in attributes {
            let (name, value) = attribute.parts_mut();
            let Some(value) = value else {
                return Err(Error::ReadOnly(name.clone()));
            };

            if !self.reader.read_attribute(name, value)? {
                self.missing(format!("@{name}"));
            }
        }
        Ok(())
    }

    fn read_node(&mut self, node: &mut dyn Node) -> Result<(), Error> {
        match node.node_mut() {
            NodeMut::Scalar(scalar) => self.read_scalar(scalar),
            NodeMut::List(list) => self.read_list(list),
            NodeMut::Object(object) => object.deserialize(self),
        }
    }

    fn read_scalar(&mut self, scalar: &mut dyn Scalar) -> Result<(), Error> {
        if !self.reader.read_value(scalar)? {
            self.missing_here();
        }
        Ok(())
    }

    fn read_list(&mut self, list: &mut dyn List) -> Result<(), Error> {
        if self.config.collection_policy == CollectionPolicy::Replace && !list.is_empty() {
            log::debug!(
                "clearing {} elements of `{}` before reading it",
                list.len(),
                self.trail.path()
            );
            list.clear();
        }

        let mut index = list.len();
        while self.reader.next_array_element()? {
            let element = list.push_default();
            self.scoped(index, |this| this.read_node(element))?;
            index += 1;
        }
        self.check_stray_value();
        Ok(())
    }

    fn check_stray_value(&mut self) {
        if self.reader.take_stray_value() {
            let path = self.trail.path();
            log::warn!("input for `{path}` is a bare value, keeping the current contents");
            self.report.missing.push(path);
        }
    }

    #[cold]
    fn missing(&mut self, last: impl AsRef<str>) {
        let path = self.trail.path_to(last.as_ref());
        log::warn!("no input value for `{path}`, keeping the current one");
        self.report.missing.push(path);
    }

    #[cold]
    fn missing_here(&mut self) {
        let path = self.trail.path();
        log::warn!("no input value for `{path}`, keeping the current one");
        self.report.missing.push(path);
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::access::EntryPathAccess;
    use crate::de::{CollectionPolicy, DeserializerConfig};
    use crate::testing::{ScriptReader, Step};
    use crate::{Attribute, Deserializer, Entry, Error, Object, Serializer};

    fn run(tree: &mut Entry<'_>, steps: Vec<Step>) -> crate::de::DeserializeReport {
        run_with(tree, steps, DeserializerConfig::new())
    }

    fn run_with(
        tree: &mut Entry<'_>,
        steps: Vec<Step>,
        config: DeserializerConfig,
    ) -> crate::de::DeserializeReport {
        let mut reader = ScriptReader::new(steps);
        let mut deserializer = Deserializer::with_config(&mut reader, config);
        deserializer
            .deserialize(core::slice::from_mut(tree))
            .unwrap();
        let report = deserializer.into_report();
        assert!(reader.is_done(), "script not fully consumed");
        report
    }

    fn scenario() -> Entry<'static> {
        Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::string("Str", "Test"),
            Entry::tuple("Child", [Entry::new("Bool", true)]),
        ])
    }

    #[test]
    fn collection_growth() {
        let mut tree = Entry::new("Vec", Vec::<i32>::new());
        let report = run(&mut tree, vec![
            Step::Name("Vec"),
            Step::Element(true),
            Step::Value(Some("1")),
            Step::Element(true),
            Step::Value(Some("2")),
            Step::Element(true),
            Step::Value(Some("3")),
            Step::Element(false),
            Step::End,
        ]);

        assert!(report.is_clean());
        assert_eq!(tree.resolve::<Vec<i32>>("Vec"), &[1, 2, 3]);
    }

    #[test]
    fn collection_policy() {
        let script = || {
            vec![
                Step::Name("Vec"),
                Step::Element(true),
                Step::Value(Some("9")),
                Step::Element(false),
                Step::End,
            ]
        };

        let mut tree = Entry::new("Vec", vec![1_u16, 2]);
        run(&mut tree, script());
        assert_eq!(tree.resolve::<Vec<u16>>("Vec"), &[1, 2, 9]);

        let replace = DeserializerConfig::new().with_collection_policy(CollectionPolicy::Replace);
        run_with(&mut tree, script(), replace);
        assert_eq!(tree.resolve::<Vec<u16>>("Vec"), &[9]);
    }

    #[test]
    fn names_arrive_in_any_order() {
        let mut tree = scenario();
        let report = run(&mut tree, vec![
            Step::Name("Root"),
            Step::Name("Child"),
            Step::Name("Bool"),
            Step::Value(Some("false")),
            Step::End,
            Step::Name("Int"),
            Step::Attribute("ENABLE", Some("false")),
            Step::Value(Some("8")),
            Step::End,
            Step::End,
        ]);

        assert!(report.is_clean());
        assert!(!*tree.resolve::<bool>("Root/Child/Bool"));
        assert!(!*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert_eq!(*tree.resolve::<i32>("Root/Int"), 8);
        assert_eq!(tree.resolve::<String>("Root/Str"), "Test");
    }

    #[test]
    fn unmatched_input_is_reported_once() {
        let mut tree = scenario();
        let mut reader = ScriptReader::new([
            Step::Name("Root"),
            Step::Name("Unknown"),
            Step::End,
            Step::End,
        ]);

        let mut deserializer = Deserializer::new(&mut reader);
        deserializer
            .deserialize(core::slice::from_mut(&mut tree))
            .unwrap();
        let report = deserializer.into_report();

        assert_eq!(report.unmatched, ["Root/Unknown"]);
        assert!(report.missing.is_empty());
        assert_eq!(reader.skipped, 1);

        assert_eq!(*tree.resolve::<i32>("Root/Int"), 5);
        assert!(*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert!(*tree.resolve::<bool>("Root/Child/Bool"));
    }

    #[test]
    fn missing_values_keep_targets() {
        let mut tree = scenario();
        let report = run(&mut tree, vec![
            Step::Name("Root"),
            Step::Name("Int"),
            Step::Attribute("ENABLE", None),
            Step::Value(None),
            Step::Name("Str"),
            Step::Value(Some("changed")),
            Step::End,
            Step::End,
        ]);

        assert_eq!(report.missing, ["Root/Int/@ENABLE", "Root/Int"]);
        assert_eq!(*tree.resolve::<i32>("Root/Int"), 5);
        assert!(*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert_eq!(tree.resolve::<String>("Root/Str"), "changed");
    }

    #[test]
    fn first_declared_sibling_receives_input() {
        let mut tree = Entry::tuple("Root", [
            Entry::new("dup", 1_i32),
            Entry::new("dup", 2_i32),
        ]);
        run(&mut tree, vec![
            Step::Name("Root"),
            Step::Name("dup"),
            Step::Value(Some("10")),
            Step::End,
            Step::End,
        ]);

        let children = tree.children().unwrap();
        assert_eq!(children[0].node().unwrap().downcast_ref::<i32>(), Some(&10));
        assert_eq!(children[1].node().unwrap().downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn read_only_targets_fail() {
        let fixed = 3_i32;
        let mut entries = [Entry::borrowed("Fixed", &fixed)];
        let mut reader = ScriptReader::new([Step::Name("Fixed")]);

        let err = Deserializer::new(&mut reader)
            .deserialize(&mut entries)
            .unwrap_err();
        assert!(matches!(err.root_cause(), Error::ReadOnly(name) if name == "Fixed"));
    }

    #[test]
    fn malformed_values_propagate() {
        let mut tree = scenario();
        let mut reader = ScriptReader::new([
            Step::Name("Root"),
            Step::Name("Int"),
            Step::Attribute("ENABLE", Some("maybe")),
        ]);

        let err = Deserializer::new(&mut reader)
            .deserialize(core::slice::from_mut(&mut tree))
            .unwrap_err();
        assert!(matches!(err.root_cause(), Error::Scalar(_)));
    }

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Object for Point {
        fn entry_name(&self) -> &str {
            "Point"
        }

        fn serialize(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
            serializer.serialize(&[Entry::borrowed("x", &self.x), Entry::borrowed("y", &self.y)])
        }

        fn deserialize(&mut self, deserializer: &mut Deserializer<'_>) -> Result<(), Error> {
            deserializer.deserialize(&mut [
                Entry::borrowed_mut("x", &mut self.x),
                Entry::borrowed_mut("y", &mut self.y),
            ])
        }
    }

    #[test]
    fn objects_populate_caller_state() {
        let mut origin = Point::default();
        let mut path = Vec::<Point>::new();
        {
            let mut tree = Entry::tuple("Shape", [
                Entry::borrowed_mut("Origin", &mut origin),
                Entry::borrowed_mut("Path", &mut path),
            ]);
            let report = run(&mut tree, vec![
                Step::Name("Shape"),
                Step::Name("Origin"),
                Step::Name("y"),
                Step::Value(Some("4")),
                Step::End,
                Step::Name("Path"),
                Step::Element(true),
                Step::Name("x"),
                Step::Value(Some("1")),
                Step::Name("y"),
                Step::Value(Some("2")),
                Step::End,
                Step::Element(false),
                Step::End,
                Step::End,
            ]);
            assert!(report.is_clean());
        }

        assert_eq!(origin, Point { x: 0, y: 4 });
        assert_eq!(path, [Point { x: 1, y: 2 }]);
    }
}
