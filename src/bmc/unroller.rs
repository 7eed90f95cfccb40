use std::collections::HashMap;

use z3::ast::{Ast, Dynamic};
use z3::Context;

use crate::model::transition_system::TransitionSystem;
use crate::smt::terms;

/// Instantiates untimed terms at a time step by renaming variables: state
/// and input variables become `v@i`, next-state variables `v@(i+1)`.
/// Timed symbols are minted on demand and cached, so the same `(name, tick)`
/// always yields the same symbol.
#[derive(Clone)]
pub struct Unroller<'ctx> {
	ctx: &'ctx Context,
	curr_vars: Vec<(String, Dynamic<'ctx>)>,
	next_vars: Vec<(String, Dynamic<'ctx>)>,
	var_cache: HashMap<(String, u32), Dynamic<'ctx>>,
	time_cache: Vec<Vec<(Dynamic<'ctx>, Dynamic<'ctx>)>>,
}

impl<'ctx> Unroller<'ctx> {
	pub fn new(ts: &TransitionSystem<'ctx>) -> Self {
		let name_of = |v: &Dynamic<'ctx>| {
			terms::symbol_name(v).expect("transition system variables are symbols")
		};
		let curr_vars = ts
			.state_vars()
			.iter()
			.chain(ts.input_vars())
			.map(|v| (name_of(v), v.clone()))
			.collect();
		let next_vars = ts
			.state_vars()
			.iter()
			.map(|v| (name_of(v), ts.next(v).unwrap().clone()))
			.collect();
		Self {
			ctx: ts.ctx(),
			curr_vars,
			next_vars,
			var_cache: HashMap::new(),
			time_cache: Vec::new(),
		}
	}

	pub fn at_time<T>(&mut self, term: &T, k: u32) -> T
	where
		T: Ast<'ctx> + Clone,
	{
		let cache = self.cache_at_time(k);
		term.substitute(&cache.iter().map(|(u, t)| (u, t)).collect::<Vec<_>>())
	}

	fn timed_var(&mut self, name: &str, template: &Dynamic<'ctx>, k: u32) -> Dynamic<'ctx> {
		let key = (name.to_string(), k);
		if let Some(v) = self.var_cache.get(&key) {
			return v.clone();
		}
		let timed = terms::fresh_like(self.ctx, &format!("{}@{}", name, k), template)
			.expect("transition system variables are boolean or bitvector");
		self.var_cache.insert(key, timed.clone());
		timed
	}

	fn cache_at_time(&mut self, k: u32) -> &Vec<(Dynamic<'ctx>, Dynamic<'ctx>)> {
		while self.time_cache.len() <= k as usize {
			let t = self.time_cache.len() as u32;
			let mut cache = Vec::new();
			for (name, v) in self.curr_vars.clone() {
				cache.push((v.clone(), self.timed_var(&name, &v, t)));
			}
			for (name, nv) in self.next_vars.clone() {
				cache.push((nv.clone(), self.timed_var(&name, &nv, t + 1)));
			}
			self.time_cache.push(cache);
		}
		&self.time_cache[k as usize]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use z3::ast::{Bool, BV};

	#[test]
	fn times_state_next_and_input_variables() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut ts = TransitionSystem::new(&ctx);
		let v = ts.make_bv_statevar("v", 8);
		let inp = ts.make_bv_inputvar("inp", 8);
		let vd = Dynamic::from_ast(&v);
		let next_v = ts.next(&vd).unwrap().as_bv().unwrap();
		let update = next_v._eq(&v.bvadd(&inp));

		let mut unroller = Unroller::new(&ts);
		let timed = unroller.at_time(&update, 2);

		let v2 = BV::new_const(&ctx, "v@2", 8);
		let v3 = BV::new_const(&ctx, "v@3", 8);
		let inp2 = BV::new_const(&ctx, "inp@2", 8);
		assert_eq!(timed, v3._eq(&v2.bvadd(&inp2)));
	}

	#[test]
	fn timed_symbols_are_cached() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut ts = TransitionSystem::new(&ctx);
		let b = ts.make_bool_statevar("b");
		let mut unroller = Unroller::new(&ts);
		let once = unroller.at_time(&b, 4);
		let twice = unroller.at_time(&b, 4);
		assert_eq!(once, twice);
		assert_eq!(once, Bool::new_const(&ctx, "b@4"));
	}

	#[test]
	fn unknown_symbols_pass_through() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut ts = TransitionSystem::new(&ctx);
		let b = ts.make_bool_statevar("b");
		let mut unroller = Unroller::new(&ts);
		let stray = Bool::new_const(&ctx, "stray");
		let timed = unroller.at_time(&Bool::and(&ctx, &[&b, &stray]), 1);
		assert_eq!(
			timed,
			Bool::and(&ctx, &[&Bool::new_const(&ctx, "b@1"), &stray])
		);
	}
}
