use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use z3::ast::{Ast, Bool, Dynamic, BV};
use z3::{Context, DeclKind, SortKind};

/// Conjunction of `ts`, without wrapping single terms in a unary And.
/// An empty slice conjoins to true.
pub fn make_conjunction<'ctx>(ctx: &'ctx Context, ts: &[Bool<'ctx>]) -> Bool<'ctx> {
	match ts.len() {
		0 => Bool::from_bool(ctx, true),
		1 => ts[0].clone(),
		_ => Bool::and(ctx, &ts.iter().collect::<Vec<_>>()),
	}
}

/// Operator of an application term, if it is one.
pub fn app_kind(t: &Dynamic) -> Option<DeclKind> {
	if t.is_app() {
		Some(t.decl().kind())
	} else {
		None
	}
}

fn is_binary_and(t: &Bool) -> bool {
	t.is_app() && t.decl().kind() == DeclKind::AND && t.num_children() == 2
}

/// Peels the right spine of a right-associated conjunction: while the root
/// is a two-child And, emit the right child and descend into the left. The
/// terminal is kept unless it is the constant true. Duplicates collapse;
/// the returned order is the peel order (newest conjunct first).
pub fn extract_top_level_conjuncts<'ctx>(
	ctx: &'ctx Context,
	conjunction: &Bool<'ctx>,
) -> Vec<Bool<'ctx>> {
	fn push<'ctx>(c: Bool<'ctx>, acc: &mut Vec<Bool<'ctx>>) {
		if !acc.contains(&c) {
			acc.push(c);
		}
	}
	let mut conjuncts: Vec<Bool<'ctx>> = Vec::new();
	let mut t = conjunction.clone();
	while is_binary_and(&t) {
		let children = t.children();
		push(children[1].as_bool().unwrap(), &mut conjuncts);
		t = children[0].as_bool().unwrap();
	}
	if t != Bool::from_bool(ctx, true) {
		push(t, &mut conjuncts);
	}
	conjuncts
}

/// Whether `t` is an uninterpreted nullary symbol.
pub fn is_symbol(t: &Dynamic) -> bool {
	t.is_app() && t.num_children() == 0 && t.decl().kind() == DeclKind::UNINTERPRETED
}

/// The declared name of a symbol term.
pub fn symbol_name(t: &Dynamic) -> Option<String> {
	if is_symbol(t) {
		Some(t.decl().name())
	} else {
		None
	}
}

/// Mints a fresh nullary symbol named `name` with the sort of `template`.
pub fn fresh_like<'ctx>(
	ctx: &'ctx Context,
	name: &str,
	template: &Dynamic<'ctx>,
) -> Result<Dynamic<'ctx>, String> {
	match template.sort_kind() {
		SortKind::Bool => Ok(Dynamic::from_ast(&Bool::new_const(ctx, name))),
		SortKind::BV => {
			let width = template.as_bv().unwrap().get_size();
			Ok(Dynamic::from_ast(&BV::new_const(ctx, name, width)))
		}
		k => Err(format!("cannot mint symbol `{}` of sort {:?}", name, k)),
	}
}

/// Structural hash of a term, used where string forms do not round-trip
/// distinctly.
pub fn term_hash(t: &Bool) -> u64 {
	let mut hasher = DefaultHasher::new();
	t.hash(&mut hasher);
	hasher.finish()
}

/// Rebuilds `op` over `children`. Only the operator alphabet the Tseitin
/// decomposer understands is accepted.
pub fn rebuild_app<'ctx>(
	ctx: &'ctx Context,
	op: DeclKind,
	children: &[Dynamic<'ctx>],
) -> Result<Dynamic<'ctx>, String> {
	let bool_child = |i: usize| -> Result<Bool<'ctx>, String> {
		children[i]
			.as_bool()
			.ok_or_else(|| format!("expected boolean operand in {:?}", op))
	};
	let bv_child = |i: usize| -> Result<BV<'ctx>, String> {
		children[i]
			.as_bv()
			.ok_or_else(|| format!("expected bitvector operand in {:?}", op))
	};
	match op {
		DeclKind::NOT => Ok(Dynamic::from_ast(&bool_child(0)?.not())),
		DeclKind::BNOT => Ok(Dynamic::from_ast(&bv_child(0)?.bvnot())),
		DeclKind::EQ => Ok(Dynamic::from_ast(&children[0]._eq(&children[1]))),
		DeclKind::AND | DeclKind::OR => {
			let mut bs = Vec::with_capacity(children.len());
			for i in 0..children.len() {
				bs.push(bool_child(i)?);
			}
			let refs = bs.iter().collect::<Vec<_>>();
			Ok(Dynamic::from_ast(&if op == DeclKind::AND {
				Bool::and(ctx, &refs)
			} else {
				Bool::or(ctx, &refs)
			}))
		}
		DeclKind::BAND => Ok(Dynamic::from_ast(&bv_child(0)?.bvand(&bv_child(1)?))),
		DeclKind::BOR => Ok(Dynamic::from_ast(&bv_child(0)?.bvor(&bv_child(1)?))),
		DeclKind::ITE => Ok(bool_child(0)?.ite(&children[1], &children[2])),
		k => Err(format!("operator {:?} is not decomposable", k)),
	}
}

fn sort_sexp(t: &Dynamic) -> Option<String> {
	match t.sort_kind() {
		SortKind::Bool => Some("Bool".to_string()),
		SortKind::BV => Some(format!("(_ BitVec {})", t.as_bv().unwrap().get_size())),
		_ => None,
	}
}

/// Collects every nullary uninterpreted symbol reachable from `roots`,
/// mapped to its SMT-LIB sort s-expression. Sorted by name for stable dumps.
pub fn collect_symbols<'ctx>(roots: &[Bool<'ctx>]) -> BTreeMap<String, String> {
	let mut seen: HashSet<Dynamic<'ctx>> = HashSet::new();
	let mut decls = BTreeMap::new();
	let mut stack: Vec<Dynamic<'ctx>> = roots.iter().map(|r| Dynamic::from_ast(r)).collect();
	while let Some(t) = stack.pop() {
		if !seen.insert(t.clone()) {
			continue;
		}
		if is_symbol(&t) {
			if let (Some(name), Some(sort)) = (symbol_name(&t), sort_sexp(&t)) {
				decls.insert(name, sort);
			}
			continue;
		}
		stack.extend(t.children());
	}
	decls
}
