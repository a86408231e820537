/*!
# Strongly-typed name strings

This module defines the [`Name`] / [`NameStr`] pair: string types which are
checked to conform to the `Name` production of XML 1.0 and are used for tag
and attribute names throughout the crate.

Carrying the check in the type means the parser validates a name exactly
once, at the boundary, and everything downstream (the node tree, the
serializer, attribute maps) can rely on it.

Owned values are constructed via [`std::convert::TryFrom`] from [`str`],
[`String`] or [`smartstring::alias::String`].
*/
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Deref;

use smartstring::alias::String as SmartString;

use crate::selectors::{validate_name, NameError};

/// String which conforms to the Name production of XML 1.0.
///
/// [`Name`] corresponds to a (restricted) [`String`]. For a [`str`]-like
/// type with the same restrictions, see [`NameStr`].
///
/// Since [`Name`] (indirectly) derefs to [`str`], all (non-mutable) methods
/// from [`str`] are available.
///
/// # Formal definition
///
/// The data inside [`Name`] (and [`NameStr`]) is guaranteed to conform to
/// the `Name` production of the below grammar, quoted from
/// [XML 1.0 § 2.3](https://www.w3.org/TR/REC-xml/#NT-NameStartChar):
///
/// ```text
/// [4]  NameStartChar ::= ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6]
///                        | [#xD8-#xF6] | [#xF8-#x2FF] | [#x370-#x37D]
///                        | [#x37F-#x1FFF] | [#x200C-#x200D]
///                        | [#x2070-#x218F] | [#x2C00-#x2FEF]
///                        | [#x3001-#xD7FF] | [#xF900-#xFDCF]
///                        | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
/// [4a] NameChar      ::= NameStartChar | "-" | "." | [0-9] | #xB7
///                        | [#x0300-#x036F] | [#x203F-#x2040]
/// [5]  Name          ::= NameStartChar (NameChar)*
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(SmartString);

impl Name {
	/// Extract the inner string and return it.
	pub fn into_inner(self) -> SmartString {
		self.0
	}

	/// Obtain a reference to the inner string slice.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// Construct a `Name` without enforcing anything
	///
	/// # Safety
	///
	/// The caller is responsible for ensuring that the passed [`str`] is in
	/// fact a valid `Name`.
	pub unsafe fn from_str_unchecked<T: AsRef<str>>(s: T) -> Self {
		Self(s.as_ref().into())
	}

	/// Construct a `Name` without enforcing anything
	///
	/// # Safety
	///
	/// The caller is responsible for ensuring that the passed [`String`] is
	/// in fact a valid `Name`.
	pub unsafe fn from_string_unchecked<T: Into<SmartString>>(s: T) -> Self {
		Self(s.into())
	}
}

impl Deref for Name {
	type Target = NameStr;

	fn deref(&self) -> &Self::Target {
		// SAFETY: NameStr enforces the same check as Name.
		unsafe { NameStr::from_str_unchecked(&self.0) }
	}
}

impl Borrow<str> for Name {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Borrow<NameStr> for Name {
	fn borrow(&self) -> &NameStr {
		// SAFETY: NameStr enforces the same check as Name.
		unsafe { NameStr::from_str_unchecked(&self.0) }
	}
}

impl AsRef<str> for Name {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for Name {
	fn eq(&self, other: &str) -> bool {
		&self.0 == other
	}
}

impl PartialEq<Name> for str {
	fn eq(&self, other: &Name) -> bool {
		other.0 == self
	}
}

impl PartialEq<&str> for Name {
	fn eq(&self, other: &&str) -> bool {
		&self.0 == *other
	}
}

impl PartialEq<Name> for &str {
	fn eq(&self, other: &Name) -> bool {
		other.0 == *self
	}
}

impl From<Name> for String {
	fn from(other: Name) -> Self {
		other.0.into()
	}
}

impl TryFrom<&str> for Name {
	type Error = NameError;

	fn try_from(other: &str) -> Result<Self, Self::Error> {
		validate_name(other)?;
		Ok(Name(other.into()))
	}
}

impl TryFrom<String> for Name {
	type Error = NameError;

	fn try_from(other: String) -> Result<Self, Self::Error> {
		validate_name(&other)?;
		Ok(Name(other.into()))
	}
}

impl TryFrom<SmartString> for Name {
	type Error = NameError;

	fn try_from(other: SmartString) -> Result<Self, Self::Error> {
		validate_name(&other)?;
		Ok(Name(other))
	}
}

impl fmt::Display for Name {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0 as &str)
	}
}

/// str which conforms to the Name production of XML 1.0.
///
/// [`NameStr`] corresponds to a (restricted) [`str`]. For a [`String`]-like
/// type with the same restrictions as well as the formal definition of
/// those restrictions, see [`Name`].
///
/// Since [`NameStr`] derefs to [`str`], all (non-mutable) methods from
/// [`str`] are available.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NameStr(str);

impl NameStr {
	/// Convert a [`str`] to a `&NameStr`, checking its contents.
	pub fn from_str<'x>(s: &'x str) -> Result<&'x Self, NameError> {
		TryFrom::try_from(s)
	}

	/// Construct a `&NameStr` without enforcing anything
	///
	/// # Safety
	///
	/// The caller is responsible for ensuring that the passed [`str`] is in
	/// fact a valid `Name`.
	pub unsafe fn from_str_unchecked<'x>(s: &'x str) -> &'x Self {
		std::mem::transmute(s)
	}

	/// Create an owned copy of the string as [`Name`].
	pub fn to_name(&self) -> Name {
		// SAFETY: Name enforces the same check as NameStr.
		unsafe { Name::from_str_unchecked(&self.0) }
	}
}

impl Deref for NameStr {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl AsRef<str> for NameStr {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for NameStr {
	fn eq(&self, other: &str) -> bool {
		&self.0 == other
	}
}

impl PartialEq<NameStr> for str {
	fn eq(&self, other: &NameStr) -> bool {
		self == &other.0
	}
}

impl ToOwned for NameStr {
	type Owned = Name;

	fn to_owned(&self) -> Self::Owned {
		self.to_name()
	}
}

impl<'x> TryFrom<&'x str> for &'x NameStr {
	type Error = NameError;

	fn try_from(other: &'x str) -> Result<Self, Self::Error> {
		validate_name(other)?;
		// SAFETY: the content check is executed right above and we're
		// transmuting &str into a repr(transparent) of &str.
		Ok(unsafe { NameStr::from_str_unchecked(other) })
	}
}

impl fmt::Display for NameStr {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl PartialOrd<Name> for NameStr {
	fn partial_cmp(&self, other: &Name) -> Option<Ordering> {
		self.0.partial_cmp(other.as_str())
	}
}

impl PartialEq<Name> for NameStr {
	fn eq(&self, other: &Name) -> bool {
		&self.0 == other.as_str()
	}
}

impl PartialEq<NameStr> for Name {
	fn eq(&self, other: &NameStr) -> bool {
		self.as_str() == &other.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeMap;
	use std::convert::{TryFrom, TryInto};

	#[test]
	fn name_accepts_valid_names() {
		let nm: Name = "foo-bar.baz".try_into().unwrap();
		assert_eq!(nm, "foo-bar.baz");
		let nm: Name = "\u{e9}l\u{e9}ment".try_into().unwrap();
		assert_eq!(nm.as_str(), "\u{e9}l\u{e9}ment");
	}

	#[test]
	fn name_rejects_invalid_names() {
		assert!(matches!(Name::try_from(""), Err(NameError::EmptyName)));
		assert!(matches!(
			Name::try_from("-dash"),
			Err(NameError::InvalidChar('-'))
		));
		assert!(matches!(
			Name::try_from("sp ace"),
			Err(NameError::InvalidChar(' '))
		));
	}

	#[test]
	fn name_derefs_to_str_methods() {
		let nm: Name = "level".try_into().unwrap();
		assert_eq!(nm.len(), 5);
		assert!(nm.starts_with("lev"));
	}

	#[test]
	fn name_works_as_btreemap_key_via_str_borrow() {
		let mut map: BTreeMap<Name, String> = BTreeMap::new();
		map.insert("b".try_into().unwrap(), "two".to_string());
		map.insert("a".try_into().unwrap(), "one".to_string());
		assert_eq!(map.get("a").unwrap(), "one");
		// iteration order is the sorted key order
		let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
		assert_eq!(keys, vec!["a", "b"]);
	}

	#[test]
	fn namestr_roundtrips_to_name() {
		let s = NameStr::from_str("node").unwrap();
		let owned = s.to_name();
		assert_eq!(owned, *s);
	}
}
