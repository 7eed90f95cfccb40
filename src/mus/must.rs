use z3::ast::{Ast, Bool};
use z3::{SatResult, Solver};

use crate::logging::messages::*;

/// One minimal unsatisfiable subset, as a membership mask over the control
/// variables the query was submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mus {
	pub bool_mus: Vec<bool>,
}

/// A subset of the constraint space, used to ask satisfiability questions
/// about the query without enumerating.
#[derive(Debug, Clone)]
pub struct Formula {
	bits: Vec<bool>,
}

impl Formula {
	pub fn new(dimension: usize, value: bool) -> Self {
		Self {
			bits: vec![value; dimension],
		}
	}

	pub fn bits(&self) -> &[bool] {
		&self.bits
	}

	pub fn set(&mut self, index: usize, value: bool) {
		self.bits[index] = value;
	}
}

/// The MUS enumeration back-end. Borrows a solver whose assertions tie each
/// control variable to the constraint it stands for, and enumerates every
/// minimal unsatisfiable subset of the control-variable space.
///
/// Seeds are drawn from a map solver; a satisfiable seed is grown to a
/// maximal satisfiable subset and blocked downward, an unsatisfiable one is
/// shrunk (unsat-core-guided deletion) to a MUS and blocked upward, until
/// the map solver is exhausted. This enumeration is complete, so `muses`
/// ends up holding exactly the minimal unsatisfiable subsets.
pub struct Master<'s, 'ctx> {
	solver: &'s Solver<'ctx>,
	control_vars: Vec<Bool<'ctx>>,
	pub dimension: usize,
	pub muses: Vec<Mus>,
}

impl<'s, 'ctx> Master<'s, 'ctx> {
	pub fn new(
		solver: &'s Solver<'ctx>,
		control_vars: Vec<Bool<'ctx>>,
		algorithm: &str,
	) -> Result<Self, String> {
		if algorithm != "remus" {
			return Err(format!("unknown enumeration algorithm `{}`", algorithm));
		}
		let dimension = control_vars.len();
		Ok(Self {
			solver,
			control_vars,
			dimension,
			muses: Vec::new(),
		})
	}

	/// Whether the subset named by `formula` is satisfiable together with
	/// the solver's unconditional assertions.
	pub fn is_valid(&self, formula: &Formula) -> bool {
		self.subset_check(formula.bits()) == SatResult::Sat
	}

	/// Runs the enumeration, filling `muses`.
	///
	/// Known limitation of this back-end: a satisfiable query has no MUSes
	/// and terminates the process with exit code 1. Callers that need to
	/// survive satisfiable inputs must run the enumeration in a child
	/// process.
	pub fn enumerate(&mut self) {
		if self.dimension == 0 {
			return;
		}
		if self.is_valid(&Formula::new(self.dimension, true)) {
			error_and_exit!("MUS query is satisfiable; nothing to enumerate");
		}
		let ctx = self.control_vars[0].get_ctx();
		let map = Solver::new(ctx);
		loop {
			if map.check() != SatResult::Sat {
				break;
			}
			let model = match map.get_model() {
				Some(m) => m,
				None => break,
			};
			let mut seed: Vec<bool> = self
				.control_vars
				.iter()
				.map(|cv| {
					model
						.eval(cv, true)
						.and_then(|b| b.as_bool())
						.unwrap_or(false)
				})
				.collect();
			if self.subset_check(&seed) == SatResult::Sat {
				// Grow to a maximal satisfiable subset, then force future
				// seeds to pick something outside it.
				for j in 0..self.dimension {
					if seed[j] {
						continue;
					}
					seed[j] = true;
					if self.subset_check(&seed) != SatResult::Sat {
						seed[j] = false;
					}
				}
				let outside: Vec<&Bool<'ctx>> = self
					.control_vars
					.iter()
					.zip(&seed)
					.filter(|(_, &b)| !b)
					.map(|(cv, _)| cv)
					.collect();
				if outside.is_empty() {
					break;
				}
				map.assert(&Bool::or(ctx, &outside));
			} else {
				let mus = self.shrink(seed);
				let blockers: Vec<Bool<'ctx>> = self
					.control_vars
					.iter()
					.zip(&mus)
					.filter(|(_, &b)| b)
					.map(|(cv, _)| cv.not())
					.collect();
				map.assert(&Bool::or(ctx, &blockers.iter().collect::<Vec<_>>()));
				self.muses.push(Mus { bool_mus: mus });
			}
		}
		debug_message!("enumeration finished with {} MUSes", self.muses.len());
	}

	fn subset_check(&self, bits: &[bool]) -> SatResult {
		let assumed: Vec<Bool<'ctx>> = self
			.control_vars
			.iter()
			.zip(bits)
			.filter(|(_, &b)| b)
			.map(|(cv, _)| cv.clone())
			.collect();
		self.solver.check_assumptions(&assumed)
	}

	/// Deletion-based minimization of an unsatisfiable subset, seeded with
	/// the unsat core of the check that just failed.
	fn shrink(&self, mut bits: Vec<bool>) -> Vec<bool> {
		let core = self.solver.get_unsat_core();
		if !core.is_empty() {
			bits = self
				.control_vars
				.iter()
				.map(|cv| core.contains(cv))
				.collect();
		}
		for j in 0..bits.len() {
			if !bits[j] {
				continue;
			}
			bits[j] = false;
			if self.subset_check(&bits) != SatResult::Unsat {
				bits[j] = true;
			}
		}
		bits
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use z3::{Config, Context};

	#[test]
	fn conflicting_pair_is_the_single_mus() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let solver = Solver::new(&ctx);
		let p = Bool::new_const(&ctx, "p");
		let q = Bool::new_const(&ctx, "q");
		let cvs: Vec<Bool> = (0..3).map(|i| Bool::new_const(&ctx, format!("cv{}", i))).collect();
		solver.assert(&cvs[0]._eq(&p));
		solver.assert(&cvs[1]._eq(&p.not()));
		solver.assert(&cvs[2]._eq(&q));

		let mut master = Master::new(&solver, cvs, "remus").unwrap();
		assert_eq!(master.dimension, 3);
		assert!(!master.is_valid(&Formula::new(3, true)));
		let mut subset = Formula::new(3, false);
		subset.set(0, true);
		subset.set(2, true);
		assert!(master.is_valid(&subset));

		master.enumerate();
		assert_eq!(master.muses.len(), 1);
		assert_eq!(master.muses[0].bool_mus, vec![true, true, false]);
	}

	#[test]
	fn independent_conflicts_yield_independent_muses() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let solver = Solver::new(&ctx);
		let p = Bool::new_const(&ctx, "p");
		let q = Bool::new_const(&ctx, "q");
		let cvs: Vec<Bool> = (0..4).map(|i| Bool::new_const(&ctx, format!("cv{}", i))).collect();
		solver.assert(&cvs[0]._eq(&p));
		solver.assert(&cvs[1]._eq(&p.not()));
		solver.assert(&cvs[2]._eq(&q));
		solver.assert(&cvs[3]._eq(&q.not()));

		let mut master = Master::new(&solver, cvs, "remus").unwrap();
		master.enumerate();
		assert_eq!(master.muses.len(), 2);
		for mus in &master.muses {
			assert_eq!(mus.bool_mus.len(), 4);
			assert_eq!(mus.bool_mus.iter().filter(|&&b| b).count(), 2);
		}
	}

	#[test]
	fn unknown_algorithm_is_rejected() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let solver = Solver::new(&ctx);
		assert!(Master::new(&solver, Vec::new(), "marco").is_err());
	}
}
