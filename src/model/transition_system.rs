use std::collections::HashMap;

use z3::ast::{Ast, Bool, Dynamic, BV};
use z3::Context;

/// A finite-state transition system over z3 terms.
///
/// `init` and `trans` grow as binary And chains, one conjunct at a time,
/// which is the shape the format encoders produce. Declared invariant
/// constraints are kept in an ordered list *and* conjoined into both
/// formulae, with the next-state form added to `trans` as well.
pub struct TransitionSystem<'ctx> {
	ctx: &'ctx Context,
	init: Bool<'ctx>,
	trans: Bool<'ctx>,
	constraints: Vec<(Bool<'ctx>, bool)>,
	state_vars: Vec<Dynamic<'ctx>>,
	input_vars: Vec<Dynamic<'ctx>>,
	next_map: HashMap<Dynamic<'ctx>, Dynamic<'ctx>>,
	curr_map: HashMap<Dynamic<'ctx>, Dynamic<'ctx>>,
}

impl<'ctx> TransitionSystem<'ctx> {
	pub fn new(ctx: &'ctx Context) -> Self {
		Self {
			ctx,
			init: Bool::from_bool(ctx, true),
			trans: Bool::from_bool(ctx, true),
			constraints: Vec::new(),
			state_vars: Vec::new(),
			input_vars: Vec::new(),
			next_map: HashMap::new(),
			curr_map: HashMap::new(),
		}
	}

	pub fn ctx(&self) -> &'ctx Context {
		self.ctx
	}

	fn register_statevar(&mut self, curr: Dynamic<'ctx>, next: Dynamic<'ctx>) {
		self.state_vars.push(curr.clone());
		self.next_map.insert(curr.clone(), next.clone());
		self.curr_map.insert(next, curr);
	}

	pub fn make_bool_statevar(&mut self, name: &str) -> Bool<'ctx> {
		let curr = Bool::new_const(self.ctx, name);
		let next = Bool::new_const(self.ctx, format!("{}_next", name));
		self.register_statevar(Dynamic::from_ast(&curr), Dynamic::from_ast(&next));
		curr
	}

	pub fn make_bv_statevar(&mut self, name: &str, width: u32) -> BV<'ctx> {
		let curr = BV::new_const(self.ctx, name, width);
		let next = BV::new_const(self.ctx, format!("{}_next", name), width);
		self.register_statevar(Dynamic::from_ast(&curr), Dynamic::from_ast(&next));
		curr
	}

	pub fn make_bool_inputvar(&mut self, name: &str) -> Bool<'ctx> {
		let v = Bool::new_const(self.ctx, name);
		self.input_vars.push(Dynamic::from_ast(&v));
		v
	}

	pub fn make_bv_inputvar(&mut self, name: &str, width: u32) -> BV<'ctx> {
		let v = BV::new_const(self.ctx, name, width);
		self.input_vars.push(Dynamic::from_ast(&v));
		v
	}

	/// The next-state symbol for a current-state variable.
	pub fn next(&self, v: &Dynamic<'ctx>) -> Option<&Dynamic<'ctx>> {
		self.next_map.get(v)
	}

	/// Partial inverse of `next`.
	pub fn curr(&self, v: &Dynamic<'ctx>) -> Option<&Dynamic<'ctx>> {
		self.curr_map.get(v)
	}

	pub fn is_next_var(&self, v: &Dynamic<'ctx>) -> bool {
		self.curr_map.contains_key(v)
	}

	pub fn constrain_init(&mut self, c: &Bool<'ctx>) {
		self.init = Bool::and(self.ctx, &[&self.init, c]);
	}

	pub fn constrain_trans(&mut self, c: &Bool<'ctx>) {
		self.trans = Bool::and(self.ctx, &[&self.trans, c]);
	}

	/// Functional state update `next(v) = rhs`.
	pub fn assign_next<T: Ast<'ctx>>(&mut self, v: &T, rhs: &T) -> Result<(), String> {
		let vd = Dynamic::from_ast(v);
		let next = self
			.next_map
			.get(&vd)
			.ok_or_else(|| format!("`{}` is not a state variable", vd))?
			.clone();
		let eq = next._eq(&Dynamic::from_ast(rhs));
		self.constrain_trans(&eq);
		Ok(())
	}

	/// `c` with every current-state variable replaced by its next-state one.
	pub fn to_next(&self, c: &Bool<'ctx>) -> Bool<'ctx> {
		let pairs: Vec<(&Dynamic<'ctx>, &Dynamic<'ctx>)> = self
			.state_vars
			.iter()
			.map(|v| (v, &self.next_map[v]))
			.collect();
		c.substitute(&pairs)
	}

	/// Declares an invariant constraint the way the format encoders do:
	/// recorded in the ordered constraint list, conjoined into `init` (when
	/// it must hold on initial states) and into `trans` both as-is and
	/// under the next-state substitution.
	pub fn add_constraint(&mut self, c: &Bool<'ctx>, on_init: bool) {
		self.constraints.push((c.clone(), on_init));
		if on_init {
			self.constrain_init(c);
		}
		let next_c = self.to_next(c);
		self.constrain_trans(c);
		self.constrain_trans(&next_c);
	}

	pub fn init(&self) -> &Bool<'ctx> {
		&self.init
	}

	pub fn trans(&self) -> &Bool<'ctx> {
		&self.trans
	}

	pub fn constraints(&self) -> &[(Bool<'ctx>, bool)] {
		&self.constraints
	}

	pub fn state_vars(&self) -> &[Dynamic<'ctx>] {
		&self.state_vars
	}

	pub fn input_vars(&self) -> &[Dynamic<'ctx>] {
		&self.input_vars
	}
}
