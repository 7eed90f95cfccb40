use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs;

use itertools::Itertools;
use regex::Regex;
use z3::ast::{Ast, Bool, Dynamic};
use z3::{Context, DeclKind, Solver};

use crate::bmc::unroller::Unroller;
use crate::checker::checker::Prover;
use crate::checker::result::ProverResult;
use crate::logging::messages::*;
use crate::model::transition_system::TransitionSystem;
use crate::mus::must::{Master, Mus};
use crate::options::options::MusOptions;
use crate::property::property::Property;
use crate::smt::terms;

const MUS_ALGORITHM: &str = "remus";

/// The flavor of model constraint a control variable stands for. The name
/// of each control variable starts with its kind, so MUS listings read in
/// terms of the original model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
	Init,
	Trans,
	Invar,
	Spec,
	Tseitin,
}

impl ConstraintKind {
	fn as_str(&self) -> &'static str {
		match self {
			ConstraintKind::Init => "INIT",
			ConstraintKind::Trans => "TRANS",
			ConstraintKind::Invar => "INVAR",
			ConstraintKind::Spec => "SPEC",
			ConstraintKind::Tseitin => "TSEITIN",
		}
	}
}

/// Explains an unsatisfiable bounded safety query by enumerating which of
/// the model's constraints jointly force it.
///
/// Each toggleable unit (an init conjunct, a trans conjunct, a declared
/// invariant, the negated property) is hidden behind a fresh boolean
/// control variable asserted as `cv = unit`; asserting the unit directly
/// would let the solver rewrite it away, while the indirection keeps a
/// one-to-one mapping between the bits the enumerator flips and constraints
/// the user recognizes. The solver is consumed by one query: assertions are
/// never popped, so `check_until` runs at most once per instance.
pub struct MusEngine<'ctx> {
	ctx: &'ctx Context,
	solver: Solver<'ctx>,
	ts: TransitionSystem<'ctx>,
	property: Property<'ctx>,
	opts: MusOptions,
	unroller: Unroller<'ctx>,
	control_vars: Vec<Bool<'ctx>>,
	control_var_names: HashSet<String>,
	mus_assertions: Vec<(Bool<'ctx>, Bool<'ctx>)>,
	contextual_assertions: Vec<Bool<'ctx>>,
	tseitin_count: usize,
	tseitin_aux: Vec<(Dynamic<'ctx>, Dynamic<'ctx>)>,
	built: bool,
}

impl<'ctx> MusEngine<'ctx> {
	pub fn new(
		ts: TransitionSystem<'ctx>,
		property: Property<'ctx>,
		opts: MusOptions,
	) -> Result<Self, String> {
		if !opts.logging_smt_solver {
			return Err(
				"the MUS engine needs a structure-preserving (logging) solver; \
				 rewriting would collapse the control-variable equalities"
					.to_string(),
			);
		}
		if opts.mus_apply_tseitin && !opts.mus_combine_suffix.is_empty() {
			return Err(
				"Tseitin decomposition cannot be combined with suffix combining".to_string(),
			);
		}
		let unroller = Unroller::new(&ts);
		let solver = Solver::new(ts.ctx());
		Ok(Self {
			ctx: ts.ctx(),
			solver,
			ts,
			property,
			opts,
			unroller,
			control_vars: Vec::new(),
			control_var_names: HashSet::new(),
			mus_assertions: Vec::new(),
			contextual_assertions: Vec::new(),
			tseitin_count: 0,
			tseitin_aux: Vec::new(),
			built: false,
		})
	}

	pub fn control_vars(&self) -> &[Bool<'ctx>] {
		&self.control_vars
	}

	pub fn mus_assertions(&self) -> &[(Bool<'ctx>, Bool<'ctx>)] {
		&self.mus_assertions
	}

	pub fn contextual_assertions(&self) -> &[Bool<'ctx>] {
		&self.contextual_assertions
	}

	/// Same as `check_until`, but hands the MUSes back instead of logging
	/// them.
	pub fn check_until_yielding_muses(&mut self, bound: u32) -> Result<Vec<Mus>, String> {
		self.build_query(bound)?;
		let mut master = Master::new(&self.solver, self.control_vars.clone(), MUS_ALGORITHM)?;
		master.enumerate();
		Ok(std::mem::take(&mut master.muses))
	}

	/// Builds the query and returns the enumerator primed with it, without
	/// enumerating. Lets callers ask satisfiability questions (`is_valid`)
	/// about the whole constraint set.
	pub fn build_mus_query(&mut self, bound: u32) -> Result<Master<'_, 'ctx>, String> {
		self.build_query(bound)?;
		Master::new(&self.solver, self.control_vars.clone(), MUS_ALGORITHM)
	}

	/// Membership of a MUS, projected back onto the control variables and
	/// sorted by name for stable reporting.
	pub fn mus_as_orig_terms(&self, mus: &Mus) -> Vec<Bool<'ctx>> {
		self.control_vars
			.iter()
			.enumerate()
			.filter(|(i, _)| mus.bool_mus[*i])
			.map(|(_, cv)| cv.clone())
			.sorted_by_key(|cv| cv.to_string())
			.collect()
	}

	fn make_control_var(&mut self, name: String) -> Result<Bool<'ctx>, String> {
		if !self.control_var_names.insert(name.clone()) {
			return Err(format!("control variable name collision: `{}`", name));
		}
		let cv = Bool::new_const(self.ctx, name);
		self.control_vars.push(cv.clone());
		Ok(cv)
	}

	fn make_kind_control_var(&mut self, kind: ConstraintKind) -> Result<Bool<'ctx>, String> {
		self.make_control_var(kind.as_str().to_string())
	}

	fn make_id_control_var(
		&mut self,
		kind: ConstraintKind,
		id: &str,
	) -> Result<Bool<'ctx>, String> {
		self.make_control_var(format!("{}_{}", kind.as_str(), id))
	}

	fn make_term_control_var(
		&mut self,
		kind: ConstraintKind,
		t: &Bool<'ctx>,
	) -> Result<Bool<'ctx>, String> {
		// Invariant bodies do not round-trip through their string form
		// distinctly, so they are named by hash instead.
		let id = if kind == ConstraintKind::Invar {
			terms::term_hash(t).to_string()
		} else {
			t.to_string()
		};
		self.make_id_control_var(kind, &id)
	}

	/// Asserts an atomic constraint the enumerator can toggle.
	fn mus_assert(&mut self, control_var: &Bool<'ctx>, constraint: &Bool<'ctx>) {
		self.solver.assert(&control_var._eq(constraint));
		self.mus_assertions
			.push((control_var.clone(), constraint.clone()));
	}

	/// Asserts a constraint into the context the enumerator reasons under.
	/// These are not toggleable.
	fn contextual_assert(&mut self, constraint: Bool<'ctx>) {
		self.solver.assert(&constraint);
		self.contextual_assertions.push(constraint);
	}

	fn unroll_until_bound(&mut self, t: &Bool<'ctx>, k: u32) -> Bool<'ctx> {
		let mut uts = Vec::with_capacity(k as usize);
		for i in 0..k {
			uts.push(self.unroller.at_time(t, i));
		}
		terms::make_conjunction(self.ctx, &uts)
	}

	fn is_yosys_internal_netname(id: &Dynamic<'ctx>) -> bool {
		terms::symbol_name(id).is_some_and(|n| n.starts_with('$'))
	}

	fn timed_aux_instance(&self, aux: &Dynamic<'ctx>, i: u32) -> Result<Dynamic<'ctx>, String> {
		let name = terms::symbol_name(aux)
			.ok_or_else(|| "decomposition auxiliary is not a symbol".to_string())?;
		terms::fresh_like(self.ctx, &format!("{}@{}", name, i), aux)
	}

	/// Rewrites `t` bottom-up into fresh auxiliaries equated to its
	/// sub-terms, minting one toggleable unit per auxiliary. The generic
	/// unroller knows nothing about the auxiliaries, so their timed
	/// instances are created by name and tied together here.
	fn tseitin_decompose(
		&mut self,
		t: &Dynamic<'ctx>,
		k: u32,
	) -> Result<Dynamic<'ctx>, String> {
		if t.num_children() == 0 {
			return Ok(t.clone());
		}
		let op = terms::app_kind(t)
			.ok_or_else(|| format!("term `{}` has no decomposable operator", t))?;
		let children = t.children();
		let mut decomposed = Vec::with_capacity(children.len());
		for (idx, child) in children.iter().enumerate() {
			// ITE conditions stay intact
			if op == DeclKind::ITE && idx == 0 {
				decomposed.push(child.clone());
			} else {
				decomposed.push(self.tseitin_decompose(child, k)?);
			}
		}
		let rebuilt = terms::rebuild_app(self.ctx, op, &decomposed)?;

		let aux = terms::fresh_like(
			self.ctx,
			&format!("tseitin_{}", self.tseitin_count),
			&rebuilt,
		)?;
		let cv =
			self.make_id_control_var(ConstraintKind::Tseitin, &self.tseitin_count.to_string())?;
		self.tseitin_count += 1;
		self.tseitin_aux.push((aux.clone(), rebuilt.clone()));

		let definition = aux._eq(&rebuilt);
		let mut forms = Vec::with_capacity(k as usize);
		for i in 0..k {
			let mut timed_pairs = Vec::with_capacity(self.tseitin_aux.len());
			for (a, _) in &self.tseitin_aux {
				timed_pairs.push((a.clone(), self.timed_aux_instance(a, i)?));
			}
			let refs: Vec<(&Dynamic<'ctx>, &Dynamic<'ctx>)> =
				timed_pairs.iter().map(|(a, b)| (a, b)).collect();
			let timed_definition = definition.substitute(&refs);
			forms.push(self.unroller.at_time(&timed_definition, i));
		}
		let body = terms::make_conjunction(self.ctx, &forms);
		self.mus_assert(&cv, &body);

		// Tie the untimed auxiliary to its timed instances.
		if let Some(aux_bool) = aux.as_bool() {
			let mut timed = Vec::with_capacity(k as usize);
			for i in 0..k {
				let inst = self.timed_aux_instance(&aux, i)?;
				timed.push(inst.as_bool().ok_or_else(|| {
					"timed auxiliary instance lost its boolean sort".to_string()
				})?);
			}
			let bridge = aux_bool._eq(&terms::make_conjunction(self.ctx, &timed));
			self.contextual_assert(bridge);
		}
		Ok(aux)
	}

	/// Assembles the MUS query: one toggleable unit per init conjunct,
	/// per identified trans conjunct, per declared invariant, and one for
	/// the negated property, each asserted as `cv = unit`.
	fn build_query(&mut self, k: u32) -> Result<(), String> {
		if self.built {
			return Err(
				"check_until may be called at most once per engine instance; \
				 assertions accumulate in the underlying solver"
					.to_string(),
			);
		}
		self.built = true;

		let mut init_conjuncts: Vec<Bool<'ctx>> = if self.opts.mus_atomic_init {
			vec![self.ts.init().clone()]
		} else {
			terms::extract_top_level_conjuncts(self.ctx, self.ts.init())
		};
		let mut trans_conjuncts = terms::extract_top_level_conjuncts(self.ctx, self.ts.trans());

		// Declared invariants are pre-conjoined into both init and trans by
		// the front-end encoders; peel them back out so they can be their
		// own units. Trans holds them in current- and next-state form.
		let declared: Vec<(Bool<'ctx>, bool)> = self.ts.constraints().to_vec();
		for (c, on_init) in &declared {
			if !*on_init {
				return Err(format!(
					"invariant `{}` is not declared over initial states; the MUS \
					 encoding cannot represent it",
					c
				));
			}
			let next_c = self.ts.to_next(c);
			init_conjuncts.retain(|t| t != c);
			trans_conjuncts.retain(|t| t != c && *t != next_c);
		}

		// A trans conjunct encoding a state update `next(v) = ...` is
		// identified by `v`; anything else stands for itself.
		let mut trans_units: Vec<(String, Bool<'ctx>)> = Vec::new();
		for tc in &trans_conjuncts {
			let dt = Dynamic::from_ast(tc);
			let mut id = dt.clone();
			if terms::app_kind(&dt) == Some(DeclKind::EQ) {
				let lhs = dt.children().into_iter().next().unwrap();
				if self.ts.is_next_var(&lhs) {
					if let Some(v) = self.ts.curr(&lhs) {
						id = v.clone();
					}
				}
			}
			if !self.opts.mus_include_yosys_internal_netnames
				&& Self::is_yosys_internal_netname(&id)
			{
				let t = self.unroll_until_bound(tc, k);
				self.contextual_assert(t);
				continue;
			}
			let id_str = terms::symbol_name(&id).unwrap_or_else(|| id.to_string());
			if !trans_units.iter().any(|(existing, _)| *existing == id_str) {
				trans_units.push((id_str, tc.clone()));
			}
		}

		if !self.opts.mus_combine_suffix.is_empty() {
			trans_units = self.combine_trans_units(trans_units)?;
		}

		for ic in &init_conjuncts {
			let cv = if self.opts.mus_atomic_init {
				self.make_kind_control_var(ConstraintKind::Init)?
			} else {
				self.make_term_control_var(ConstraintKind::Init, ic)?
			};
			let timed = self.unroller.at_time(ic, 0);
			self.mus_assert(&cv, &timed);
		}

		for (id, tc) in &trans_units {
			let cv = self.make_id_control_var(ConstraintKind::Trans, id)?;
			let body = if self.opts.mus_apply_tseitin {
				let aux = self.tseitin_decompose(&Dynamic::from_ast(tc), k)?;
				aux.as_bool()
					.ok_or_else(|| "decomposed trans unit is not boolean".to_string())?
			} else {
				self.unroll_until_bound(tc, k)
			};
			self.mus_assert(&cv, &body);
		}

		for (c, _) in &declared {
			let cv = self.make_term_control_var(ConstraintKind::Invar, c)?;
			// invariants hold on all k + 1 reached states
			let body = self.unroll_until_bound(c, k + 1);
			self.mus_assert(&cv, &body);
		}

		let spec = self.property.prop().clone();
		log!(0, "Checking Spec: {}", spec);
		let spec_cv = self.make_term_control_var(ConstraintKind::Spec, &spec)?;
		let neg_spec = self.unroll_until_bound(&spec, k + 1).not();
		self.mus_assert(&spec_cv, &neg_spec);

		if self.opts.mus_dump_smt2 {
			self.dump_smt2("mus_query.smt2")?;
		}
		Ok(())
	}

	/// Conjoins trans units whose identifiers agree up to the configured
	/// suffix, keyed by the captured prefix.
	fn combine_trans_units(
		&self,
		trans_units: Vec<(String, Bool<'ctx>)>,
	) -> Result<Vec<(String, Bool<'ctx>)>, String> {
		let re = Regex::new(&format!("(.*){}", self.opts.mus_combine_suffix))
			.map_err(|e| format!("bad combine suffix: {}", e))?;
		let mut grouped: BTreeMap<String, Vec<Bool<'ctx>>> = BTreeMap::new();
		let mut rest: Vec<(String, Bool<'ctx>)> = Vec::new();
		for (id, tc) in trans_units {
			match re.captures(&id) {
				Some(caps) => grouped
					.entry(caps[1].to_string())
					.or_default()
					.push(tc),
				None => rest.push((id, tc)),
			}
		}
		for (prefix, mut tcs) in grouped {
			if let Some((_, existing)) = rest.iter_mut().find(|(id, _)| *id == prefix) {
				tcs.insert(0, existing.clone());
				*existing = terms::make_conjunction(self.ctx, &tcs);
			} else {
				rest.push((prefix, terms::make_conjunction(self.ctx, &tcs)));
			}
		}
		Ok(rest)
	}

	/// Writes the query as loadable SMT-LIB2: declarations gathered from
	/// the recorded assertions, the control equalities, the contextual
	/// assertions, and every control variable asserted as a fact.
	fn dump_smt2(&self, path: &str) -> Result<(), String> {
		let mut formulas: Vec<Bool<'ctx>> = self
			.mus_assertions
			.iter()
			.map(|(cv, body)| cv._eq(body))
			.collect();
		formulas.extend(self.contextual_assertions.iter().cloned());
		formulas.extend(self.control_vars.iter().cloned());

		let mut out = String::new();
		for (name, sort) in terms::collect_symbols(&formulas) {
			let _ = writeln!(out, "(declare-const {} {})", smt2_symbol(&name), sort);
		}
		for f in &formulas {
			let _ = writeln!(out, "(assert {})", f);
		}
		out.push_str("(check-sat)\n");
		fs::write(path, out).map_err(|e| format!("cannot write {}: {}", path, e))
	}
}

fn smt2_symbol(name: &str) -> String {
	let simple = !name.is_empty()
		&& !name.starts_with(|c: char| c.is_ascii_digit())
		&& name
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || "~!@$%^&*_-+=<>.?/".contains(c));
	if simple {
		name.to_string()
	} else {
		format!("|{}|", name)
	}
}

impl Prover for MusEngine<'_> {
	fn check_until(&mut self, bound: u32) -> Result<ProverResult, String> {
		self.build_query(bound)?;
		let mut master = Master::new(&self.solver, self.control_vars.clone(), MUS_ALGORITHM)?;
		master.enumerate();
		for (i, mus) in master.muses.iter().enumerate() {
			log!(0, "MUS #{}", i + 1);
			for cv in self.mus_as_orig_terms(mus) {
				log!(0, "  {}", cv);
			}
		}
		// The enumerator does not come back on satisfiable queries, so a
		// completed enumeration demonstrates unsatisfiability.
		Ok(ProverResult::True)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bmc::bmc::Bmc;
	use crate::demos::models;
	use crate::mus::must::Formula;

	fn engine<'ctx>(ctx: &'ctx Context, model: &str, opts: MusOptions) -> MusEngine<'ctx> {
		let (ts, p) = models::build_model(ctx, model).unwrap();
		MusEngine::new(ts, p, opts).unwrap()
	}

	fn cv_names(e: &MusEngine) -> Vec<String> {
		e.control_vars().iter().map(|cv| cv.to_string()).collect()
	}

	#[test]
	fn scenario_mus_counts_are_exact() {
		let scenarios: &[(&str, u32, usize)] = &[
			("count2", 5, 1),
			("count2mus", 5, 2),
			("example", 5, 1),
			("altitude-switch", 5, 2),
			("unreachable-states", 100, 1),
		];
		for &(model, bound, expected) in scenarios {
			let cfg = z3::Config::new();
			let ctx = Context::new(&cfg);
			let mut e = engine(&ctx, model, MusOptions::default());
			let muses = e.check_until_yielding_muses(bound).unwrap();
			assert_eq!(muses.len(), expected, "model {} at bound {}", model, bound);
			for mus in &muses {
				assert_eq!(mus.bool_mus.len(), e.control_vars().len());
				assert!(mus.bool_mus.iter().any(|&b| b));
			}
		}
	}

	#[test]
	fn control_vars_register_in_kind_order() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut e = engine(&ctx, "altitude-switch", MusOptions::default());
		e.check_until_yielding_muses(5).unwrap();
		let group = |name: &str| {
			if name.starts_with("INIT") {
				0
			} else if name.starts_with("TRANS") {
				1
			} else if name.starts_with("INVAR") {
				2
			} else {
				assert!(name.starts_with("SPEC"), "unexpected name {}", name);
				3
			}
		};
		let groups: Vec<u32> = cv_names(&e).iter().map(|n| group(n)).collect();
		let mut sorted = groups.clone();
		sorted.sort();
		assert_eq!(groups, sorted);
		assert_eq!(groups, vec![0, 0, 1, 1, 2, 3]);
	}

	#[test]
	fn projection_is_sorted_and_duplicate_free() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut e = engine(&ctx, "count2mus", MusOptions::default());
		let muses = e.check_until_yielding_muses(5).unwrap();
		for mus in &muses {
			let projected = e.mus_as_orig_terms(mus);
			assert_eq!(
				projected.len(),
				mus.bool_mus.iter().filter(|&&b| b).count()
			);
			let names: Vec<String> = projected.iter().map(|cv| cv.to_string()).collect();
			let mut sorted = names.clone();
			sorted.sort();
			sorted.dedup();
			assert_eq!(names, sorted);
		}
	}

	#[test]
	fn declared_invariants_become_their_own_units() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut e = engine(&ctx, "count2mus", MusOptions::default());
		e.check_until_yielding_muses(5).unwrap();
		let names = cv_names(&e);
		// one init conjunct, one state update, one invariant, the property;
		// the invariant must not linger inside the INIT or TRANS units
		assert_eq!(names.len(), 4);
		assert_eq!(names.iter().filter(|n| n.starts_with("INVAR_")).count(), 1);
	}

	#[test]
	fn atomic_init_mints_exactly_one_init_unit() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_atomic_init = true;
		let mut e = engine(&ctx, "count2mus", opts);
		let muses = e.check_until_yielding_muses(5).unwrap();
		let names = cv_names(&e);
		assert_eq!(names.iter().filter(|n| n.starts_with("INIT")).count(), 1);
		assert!(names.contains(&"INIT".to_string()));
		assert_eq!(muses.len(), 2);
	}

	#[test]
	fn internal_netnames_are_filtered_by_default() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut e = engine(&ctx, "netlist", MusOptions::default());
		let muses = e.check_until_yielding_muses(5).unwrap();
		let names = cv_names(&e);
		assert!(names
			.iter()
			.filter(|n| n.starts_with("TRANS_"))
			.all(|n| !n.contains('$')));
		assert_eq!(e.contextual_assertions().len(), 1);
		assert_eq!(muses.len(), 1);
		for mus in &muses {
			for cv in e.mus_as_orig_terms(mus) {
				let name = cv.to_string();
				assert!(!(name.starts_with("TRANS_") && name.contains('$')));
			}
		}
	}

	#[test]
	fn internal_netnames_can_be_included() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_include_yosys_internal_netnames = true;
		let mut e = engine(&ctx, "netlist", opts);
		e.check_until_yielding_muses(5).unwrap();
		assert!(cv_names(&e)
			.iter()
			.any(|n| n.starts_with("TRANS_") && n.contains('$')));
		assert!(e.contextual_assertions().is_empty());
	}

	#[test]
	fn suffix_combining_groups_trans_units() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_combine_suffix = "_[0-9]+".to_string();
		let mut e = engine(&ctx, "regfile", opts);
		let muses = e.check_until_yielding_muses(5).unwrap();
		let trans_names: Vec<String> = cv_names(&e)
			.into_iter()
			.filter(|n| n.starts_with("TRANS_"))
			.collect();
		assert_eq!(trans_names, vec!["TRANS_r".to_string()]);
		assert_eq!(muses.len(), 2);
	}

	#[test]
	fn tseitin_exposes_subterm_units() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_apply_tseitin = true;
		let mut e = engine(&ctx, "gates", opts);
		let muses = e.check_until_yielding_muses(5).unwrap();
		let names = cv_names(&e);
		assert_eq!(names.iter().filter(|n| n.starts_with("TSEITIN_")).count(), 4);
		assert_eq!(muses.len(), 1);
		let projected = e.mus_as_orig_terms(&muses[0]);
		assert!(projected
			.iter()
			.any(|cv| cv.to_string().starts_with("TSEITIN_")));
	}

	#[test]
	fn tseitin_rejects_undecomposable_operators() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_apply_tseitin = true;
		// the counter update uses bitvector addition
		let mut e = engine(&ctx, "count2", opts);
		assert!(e.check_until_yielding_muses(5).is_err());
	}

	#[test]
	fn configuration_errors_reject_the_run_up_front() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let (ts, p) = models::build_model(&ctx, "count2").unwrap();
		let mut opts = MusOptions::default();
		opts.logging_smt_solver = false;
		assert!(MusEngine::new(ts, p, opts).is_err());

		let (ts, p) = models::build_model(&ctx, "count2").unwrap();
		let mut opts = MusOptions::default();
		opts.mus_apply_tseitin = true;
		opts.mus_combine_suffix = "_[0-9]+".to_string();
		assert!(MusEngine::new(ts, p, opts).is_err());
	}

	#[test]
	fn a_second_check_is_a_usage_error() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut e = engine(&ctx, "count2", MusOptions::default());
		assert!(e.check_until_yielding_muses(5).is_ok());
		assert!(e.check_until_yielding_muses(5).is_err());
	}

	#[test]
	fn query_satisfiability_matches_the_bmc_verdict() {
		let parity: &[(&str, u32)] = &[
			("count2", 5),
			("count2", 10),
			("count2mus", 5),
			("example", 5),
			("altitude-switch", 5),
			("gates", 5),
			("netlist", 5),
			("unreachable-states", 20),
		];
		for &(model, bound) in parity {
			let cfg = z3::Config::new();
			let ctx = Context::new(&cfg);
			let mut e = engine(&ctx, model, MusOptions::default());
			let master = e.build_mus_query(bound).unwrap();
			let query_sat = master.is_valid(&Formula::new(master.dimension, true));

			let (ts, p) = models::build_model(&ctx, model).unwrap();
			let mut bmc = Bmc::new(ts, p);
			match bmc.check_until(bound).unwrap() {
				ProverResult::Unknown => {
					assert!(!query_sat, "model {} at bound {}", model, bound)
				}
				ProverResult::False => {
					assert!(query_sat, "model {} at bound {}", model, bound)
				}
				ProverResult::True => unreachable!(),
			}
		}
	}

	#[test]
	fn dump_writes_loadable_smt2() {
		let cfg = z3::Config::new();
		let ctx = Context::new(&cfg);
		let mut opts = MusOptions::default();
		opts.mus_dump_smt2 = true;
		let mut e = engine(&ctx, "count2", opts);
		e.check_until_yielding_muses(3).unwrap();
		let dumped = std::fs::read_to_string("mus_query.smt2").unwrap();
		assert!(dumped.contains("(declare-const"));
		assert!(dumped.trim_end().ends_with("(check-sat)"));
		let _ = std::fs::remove_file("mus_query.smt2");
	}
}
