use z3::ast::{Ast, Bool, BV};
use z3::Context;

use crate::model::transition_system::TransitionSystem;
use crate::property::property::Property;

pub const MODEL_NAMES: &[&str] = &[
	"count2",
	"count2mus",
	"example",
	"altitude-switch",
	"unreachable-states",
	"gates",
	"netlist",
	"regfile",
];

/// Builds one of the built-in demo models by name.
pub fn build_model<'ctx>(
	ctx: &'ctx Context,
	name: &str,
) -> Result<(TransitionSystem<'ctx>, Property<'ctx>), String> {
	match name {
		"count2" => Ok(count2(ctx, false)),
		"count2mus" => Ok(count2(ctx, true)),
		"example" => Ok(example(ctx)),
		"altitude-switch" => Ok(altitude_switch(ctx)),
		"unreachable-states" => Ok(unreachable_states(ctx)),
		"gates" => Ok(gates(ctx)),
		"netlist" => Ok(netlist(ctx)),
		"regfile" => Ok(regfile(ctx)),
		_ => Err(format!(
			"unknown model `{}`; available: {}",
			name,
			MODEL_NAMES.join(", ")
		)),
	}
}

/// An eight-bit counter stepping toward the bad value 8, which is out of
/// reach for small bounds. The `count2mus` variant also declares `c < 4`
/// as an invariant, giving the bounded query a second, independent
/// refutation.
fn count2<'ctx>(
	ctx: &'ctx Context,
	with_invariant: bool,
) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let c = ts.make_bv_statevar("c", 8);
	ts.constrain_init(&c._eq(&BV::from_u64(ctx, 0, 8)));
	ts.assign_next(&c, &c.bvadd(&BV::from_u64(ctx, 1, 8))).unwrap();
	if with_invariant {
		ts.add_constraint(&c.bvult(&BV::from_u64(ctx, 4, 8)), true);
	}
	let prop = c._eq(&BV::from_u64(ctx, 8, 8)).not();
	let name = if with_invariant { "count2mus" } else { "count2" };
	(ts, Property::new(name, prop))
}

/// Two registers where one absorbs the other; the bad region needs a free
/// bit in either register, so every constraint participates in the single
/// refutation.
fn example<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let x = ts.make_bv_statevar("x", 4);
	let y = ts.make_bv_statevar("y", 4);
	ts.constrain_init(&x._eq(&BV::from_u64(ctx, 0, 4)));
	ts.constrain_init(&y._eq(&BV::from_u64(ctx, 0, 4)));
	ts.assign_next(&x, &x.bvor(&y)).unwrap();
	ts.assign_next(&y, &y).unwrap();
	let prop = x.bvult(&BV::from_u64(ctx, 8, 4));
	(ts, Property::new("example", prop))
}

/// A climbing altimeter arms a latch past a threshold. The declared
/// operating-envelope invariant and the climb rate each independently keep
/// the latch down within small bounds.
fn altitude_switch<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let alt = ts.make_bv_statevar("altitude", 16);
	let armed = ts.make_bool_statevar("armed");
	let reset = ts.make_bool_inputvar("reset");
	ts.constrain_init(&alt._eq(&BV::from_u64(ctx, 0, 16)));
	ts.constrain_init(&armed._eq(&Bool::from_bool(ctx, false)));
	let climbed = alt.bvadd(&BV::from_u64(ctx, 100, 16));
	ts.assign_next(&alt, &reset.ite(&BV::from_u64(ctx, 0, 16), &climbed))
		.unwrap();
	let threshold = alt.bvuge(&BV::from_u64(ctx, 1800, 16));
	ts.assign_next(&armed, &Bool::or(ctx, &[&armed, &threshold]))
		.unwrap();
	ts.add_constraint(&alt.bvule(&BV::from_u64(ctx, 1000, 16)), true);
	(ts, Property::new("altitude-switch", armed.not()))
}

/// A single stuck-at-false bit; the bad states are unreachable at every
/// bound, however large.
fn unreachable_states<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let b = ts.make_bool_statevar("b");
	ts.constrain_init(&b._eq(&Bool::from_bool(ctx, false)));
	ts.assign_next(&b, &b).unwrap();
	(ts, Property::new("unreachable-states", b.not()))
}

/// A purely bit-level pair of gates, kept inside the operator alphabet the
/// Tseitin decomposer accepts.
fn gates<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let a = ts.make_bool_statevar("a");
	let b = ts.make_bool_statevar("b");
	ts.constrain_init(&a._eq(&Bool::from_bool(ctx, false)));
	ts.constrain_init(&b._eq(&Bool::from_bool(ctx, false)));
	ts.assign_next(&a, &Bool::or(ctx, &[&a, &b])).unwrap();
	ts.assign_next(&b, &Bool::and(ctx, &[&a, &b])).unwrap();
	(ts, Property::new("gates", b.not()))
}

/// A counter next to a synthesis-internal net whose name carries the `$`
/// prefix netlist tools generate.
fn netlist<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let v = ts.make_bv_statevar("v", 8);
	let flag = ts.make_bool_statevar("$techmap$flop");
	ts.constrain_init(&v._eq(&BV::from_u64(ctx, 0, 8)));
	ts.constrain_init(&flag._eq(&Bool::from_bool(ctx, false)));
	ts.assign_next(&v, &v.bvadd(&BV::from_u64(ctx, 1, 8))).unwrap();
	ts.assign_next(&flag, &flag).unwrap();
	(ts, Property::new("netlist", flag.not()))
}

/// A two-entry register file whose update identifiers differ only in their
/// index suffix, for exercising suffix combining.
fn regfile<'ctx>(ctx: &'ctx Context) -> (TransitionSystem<'ctx>, Property<'ctx>) {
	let mut ts = TransitionSystem::new(ctx);
	let r0 = ts.make_bool_statevar("r_0");
	let r1 = ts.make_bool_statevar("r_1");
	ts.constrain_init(&r0._eq(&Bool::from_bool(ctx, false)));
	ts.constrain_init(&r1._eq(&Bool::from_bool(ctx, false)));
	ts.assign_next(&r0, &r0).unwrap();
	ts.assign_next(&r1, &r1).unwrap();
	let prop = Bool::and(ctx, &[&r0, &r1]).not();
	(ts, Property::new("regfile", prop))
}
