/*!
# Element tree

A document is a tree of [`Node`]s. Each node carries a validated tag name,
an ordered attribute map and a text buffer, and is linked to its siblings
and parent.

Nodes are handled through [`Rc`]; downward (`first_child`) and forward
(`next`) links are strong, upward (`parent`) and backward (`previous`) links
are [`Weak`] so a tree never forms a reference cycle. Dropping the root
handle therefore releases the whole tree.

Trees only grow: nodes are appended with [`Node::append_child`] and there is
no detach operation. A node can be appended at most once.
*/
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::strings::{Name, NameStr};

/// A single element of a document tree.
///
/// See the [module documentation](self) for the linking rules.
#[derive(Debug)]
pub struct Node {
	name: Name,
	text: RefCell<String>,
	attributes: RefCell<BTreeMap<Name, String>>,
	parent: RefCell<Weak<Node>>,
	previous: RefCell<Weak<Node>>,
	next: RefCell<Option<Rc<Node>>>,
	first_child: RefCell<Option<Rc<Node>>>,
}

impl Node {
	/// Create a new unlinked node.
	///
	/// Fails with [`Error::InvalidName`] unless `name` conforms to the
	/// `Name` production of XML 1.0.
	pub fn new(name: &str) -> Result<Rc<Node>> {
		let name = Name::try_from(name).map_err(|_| {
			Error::InvalidName(format!(
				"\"{}\" is not a valid token for a tag name.",
				name
			))
		})?;
		Ok(Self::with_name(name))
	}

	/// Create a new unlinked node from an already validated name.
	pub fn with_name(name: Name) -> Rc<Node> {
		Rc::new(Node {
			name,
			text: RefCell::new(String::new()),
			attributes: RefCell::new(BTreeMap::new()),
			parent: RefCell::new(Weak::new()),
			previous: RefCell::new(Weak::new()),
			next: RefCell::new(None),
			first_child: RefCell::new(None),
		})
	}

	/// The tag name of the node.
	pub fn tag_name(&self) -> &NameStr {
		&self.name
	}

	/// The text of the node, trimmed of leading and trailing whitespace.
	pub fn text(&self) -> String {
		self.text.borrow().trim().to_string()
	}

	/// The text of the node, exactly as accumulated.
	pub fn text_raw(&self) -> String {
		self.text.borrow().clone()
	}

	/// Replace the text of the node.
	pub fn set_text<T: Into<String>>(&self, text: T) {
		*self.text.borrow_mut() = text.into();
	}

	/// Append to the text of the node.
	pub fn append_text(&self, text: &str) {
		self.text.borrow_mut().push_str(text);
	}

	/// All attributes of the node, keyed by name in sorted order.
	pub fn all_attributes(&self) -> Ref<'_, BTreeMap<Name, String>> {
		self.attributes.borrow()
	}

	/// The value of the named attribute, if set.
	pub fn attribute(&self, name: &str) -> Option<String> {
		self.attributes.borrow().get(name).cloned()
	}

	/// Set an attribute, replacing any previous value under that name.
	///
	/// Fails with [`Error::InvalidName`] unless `name` conforms to the
	/// `Name` production of XML 1.0.
	pub fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
		let name = Name::try_from(name).map_err(|_| {
			Error::InvalidName(format!(
				"\"{}\" is not a valid token for an attribute name.",
				name
			))
		})?;
		self.attributes
			.borrow_mut()
			.insert(name, value.to_string());
		Ok(())
	}

	/// Whether the named attribute is set.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.borrow().contains_key(name)
	}

	/// Append `child` as the last child of `self`.
	///
	/// `child` must not be linked anywhere yet ([`Error::NodeAlreadyInTree`])
	/// and must not be the root of the tree `self` belongs to
	/// ([`Error::NodeIsRoot`]).
	pub fn append_child(self: &Rc<Self>, child: Rc<Node>) -> Result<()> {
		if child.next.borrow().is_some()
			|| child.previous.borrow().upgrade().is_some()
			|| child.parent.borrow().upgrade().is_some()
		{
			return Err(Error::NodeAlreadyInTree);
		}
		if Rc::ptr_eq(&child, &self.root()) {
			return Err(Error::NodeIsRoot);
		}

		match self.last_child() {
			None => {
				*self.first_child.borrow_mut() = Some(child.clone());
			}
			Some(last) => {
				*child.previous.borrow_mut() = Rc::downgrade(&last);
				*last.next.borrow_mut() = Some(child.clone());
			}
		}
		*child.parent.borrow_mut() = Rc::downgrade(self);
		Ok(())
	}

	/// The root of the tree `self` belongs to.
	///
	/// For an unlinked node this is the node itself.
	pub fn root(self: &Rc<Self>) -> Rc<Node> {
		let mut result = self.clone();
		while let Some(p) = result.parent() {
			result = p;
		}
		result
	}

	pub fn parent(&self) -> Option<Rc<Node>> {
		self.parent.borrow().upgrade()
	}

	pub fn first_child(&self) -> Option<Rc<Node>> {
		self.first_child.borrow().clone()
	}

	pub fn last_child(&self) -> Option<Rc<Node>> {
		let mut l = self.first_child()?;
		loop {
			let next = l.next();
			match next {
				None => return Some(l),
				Some(n) => l = n,
			}
		}
	}

	pub fn next(&self) -> Option<Rc<Node>> {
		self.next.borrow().clone()
	}

	pub fn previous(&self) -> Option<Rc<Node>> {
		self.previous.borrow().upgrade()
	}
}
