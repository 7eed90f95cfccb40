use crate::checker::result::ProverResult;

/// A proof engine over a transition system and a safety property.
pub trait Prover {
	/// Checks the property out to `bound` steps. Engines that cannot
	/// proceed (bad configuration, malformed model) report why instead of
	/// guessing a verdict.
	fn check_until(&mut self, bound: u32) -> Result<ProverResult, String>;
}
