/// Parsed document trees
///
/// The model loader does not parse files itself. It walks any tree that
/// implements [`DocumentNode`], which an external XML parser can provide.
/// [`Element`] is a simple owned tree for building documents in memory.
use crate::attribute;
use crate::transform::Transform;

/// Read access to one element of a parsed document
pub trait DocumentNode {
    /// Tag name of this element
    fn tag(&self) -> &str;

    /// Raw attribute text, if present
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element children in document order
    fn children(&self) -> impl Iterator<Item = &Self>;

    /// Element children carrying the given tag
    fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self>
    where
        Self: 'a,
    {
        self.children().filter(move |child| child.tag() == tag)
    }

    fn attr_str(&self, name: &str) -> Option<String> {
        self.attribute(name).map(str::to_owned)
    }

    fn attr_int(&self, name: &str) -> Option<i64> {
        self.attribute(name).and_then(attribute::parse_int)
    }

    fn attr_float(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(attribute::parse_float)
    }

    /// `N` whitespace-separated floats, zero-padded
    fn attr_floats<const N: usize>(&self, name: &str) -> Option<[f64; N]> {
        self.attribute(name).map(attribute::parse_fixed::<N>)
    }

    /// Integers until the first non-numeric token
    fn attr_ints(&self, name: &str) -> Option<Vec<i64>> {
        self.attribute(name).map(attribute::parse_ints)
    }

    /// Sixteen numbers in row-major reading order
    fn attr_transform(&self, name: &str) -> Option<Transform> {
        self.attribute(name)
            .and_then(attribute::parse_matrix)
            .map(|values| Transform::from_row_major(&values))
    }
}

/// An owned, in-memory document element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter; replaces an existing value
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder-style child append
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }
}

impl DocumentNode for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_by_tag() {
        let doc = Element::new("bones")
            .child(Element::new("bone").attr("name", "a"))
            .child(Element::new("comment"))
            .child(Element::new("bone").attr("name", "b"));

        let names: Vec<_> = doc
            .children_named("bone")
            .filter_map(|b| b.attr_str("name"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_typed_attributes() {
        let e = Element::new("x")
            .attr("i", 4)
            .attr("f", "0.5")
            .attr("c", "1 0.5")
            .attr("list", "3 2 1")
            .attr("m", "1 0 0 2 0 1 0 3 0 0 1 4 0 0 0 1");

        assert_eq!(e.attr_int("i"), Some(4));
        assert_eq!(e.attr_float("f"), Some(0.5));
        assert_eq!(e.attr_floats::<3>("c"), Some([1.0, 0.5, 0.0]));
        assert_eq!(e.attr_ints("list"), Some(vec![3, 2, 1]));
        assert_eq!(
            e.attr_transform("m"),
            Some(Transform::translate(2.0, 3.0, 4.0))
        );
        assert_eq!(e.attr_int("missing"), None);
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut e = Element::new("x").attr("a", 1);
        e.set_attr("a", 2);
        assert_eq!(e.attributes.len(), 1);
        assert_eq!(e.attr_int("a"), Some(2));
    }
}
