use std::fmt::{Display, Error, Formatter};

use z3::ast::Bool;

/// A safety property: a boolean term required to hold in every reachable
/// state of the transition system it is checked against.
pub struct Property<'ctx> {
	name: String,
	prop: Bool<'ctx>,
}

impl<'ctx> Property<'ctx> {
	pub fn new(name: impl Into<String>, prop: Bool<'ctx>) -> Self {
		Self {
			name: name.into(),
			prop,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The untimed property term.
	pub fn prop(&self) -> &Bool<'ctx> {
		&self.prop
	}
}

impl Display for Property<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
		write!(f, "{}: {}", self.name, self.prop)
	}
}
