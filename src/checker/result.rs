use std::fmt;

/// Verdict of a proof engine run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProverResult {
	/// The property holds (for the MUS engine: the bounded query is
	/// unsatisfiable and at least the returned MUSes witness it).
	True,
	/// A counter-example exists within the bound.
	False,
	/// The engine could not conclude either way.
	Unknown,
}

impl ProverResult {
	pub fn is_conclusive(&self) -> bool {
		!matches!(self, ProverResult::Unknown)
	}
}

impl fmt::Display for ProverResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProverResult::True => write!(f, "TRUE"),
			ProverResult::False => write!(f, "FALSE"),
			ProverResult::Unknown => write!(f, "UNKNOWN"),
		}
	}
}
