use z3::{SatResult, Solver};

use crate::bmc::unroller::Unroller;
use crate::checker::checker::Prover;
use crate::checker::result::ProverResult;
use crate::logging::messages::*;
use crate::model::transition_system::TransitionSystem;
use crate::property::property::Property;

/// Bounded model checking: unroll the system one step at a time and ask at
/// each step whether the property can fail there.
pub struct Bmc<'ctx> {
	solver: Solver<'ctx>,
	ts: TransitionSystem<'ctx>,
	property: Property<'ctx>,
	unroller: Unroller<'ctx>,
}

impl<'ctx> Bmc<'ctx> {
	pub fn new(ts: TransitionSystem<'ctx>, property: Property<'ctx>) -> Self {
		let unroller = Unroller::new(&ts);
		let solver = Solver::new(ts.ctx());
		Self {
			solver,
			ts,
			property,
			unroller,
		}
	}
}

impl Prover for Bmc<'_> {
	fn check_until(&mut self, bound: u32) -> Result<ProverResult, String> {
		debug_message!(
			"bounded check of `{}` out to {} steps",
			self.property.name(),
			bound
		);
		let init = self.unroller.at_time(self.ts.init(), 0);
		self.solver.assert(&init);
		for i in 0..=bound {
			let bad = self.unroller.at_time(self.property.prop(), i).not();
			if self.solver.check_assumptions(&[bad]) == SatResult::Sat {
				debug_message!("counter-example found at step {}", i);
				return Ok(ProverResult::False);
			}
			let step = self.unroller.at_time(self.ts.trans(), i);
			self.solver.assert(&step);
		}
		Ok(ProverResult::Unknown)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::demos::models;

	#[test]
	fn counter_within_bound_is_refuted() {
		let cfg = z3::Config::new();
		let ctx = z3::Context::new(&cfg);
		let (ts, p) = models::build_model(&ctx, "count2").unwrap();
		let mut bmc = Bmc::new(ts, p);
		assert_eq!(bmc.check_until(10).unwrap(), ProverResult::False);
	}

	#[test]
	fn counter_outside_bound_stays_open() {
		let cfg = z3::Config::new();
		let ctx = z3::Context::new(&cfg);
		let (ts, p) = models::build_model(&ctx, "count2").unwrap();
		let mut bmc = Bmc::new(ts, p);
		assert_eq!(bmc.check_until(5).unwrap(), ProverResult::Unknown);
	}
}
