/// Configuration for the MUS engine.
///
/// All members are public and filled in by the command line front-end;
/// library callers construct one with `MusOptions::default()` and flip the
/// fields they care about.
#[derive(Debug, Clone)]
pub struct MusOptions {
	/// Unrolling bound `k` handed to `check_until`.
	pub bound: u32,
	/// Output verbosity; MUS listings are emitted at level 0.
	pub verbosity: u32,
	/// The engine requires a solver that preserves assertion structure.
	/// Rewriting would collapse the control-variable equalities, so a run
	/// with this set to false is rejected up front.
	pub logging_smt_solver: bool,
	/// Treat the entire init formula as a single INIT unit instead of
	/// decomposing it into top-level conjuncts.
	pub mus_atomic_init: bool,
	/// Tseitin-decompose trans units into toggleable sub-term equalities.
	/// Incompatible with `mus_combine_suffix`.
	pub mus_apply_tseitin: bool,
	/// When false, trans units whose identifier starts with '$' (Yosys
	/// internal netnames) are asserted contextually instead of toggleably.
	pub mus_include_yosys_internal_netnames: bool,
	/// Regex suffix; trans units whose identifier matches `(.*)<suffix>`
	/// are conjoined into one unit per captured prefix.
	pub mus_combine_suffix: String,
	/// Dump the full MUS query to `mus_query.smt2`.
	pub mus_dump_smt2: bool,
}

impl Default for MusOptions {
	fn default() -> Self {
		Self {
			bound: 10,
			verbosity: 0,
			logging_smt_solver: true,
			mus_atomic_init: false,
			mus_apply_tseitin: false,
			mus_include_yosys_internal_netnames: false,
			mus_combine_suffix: String::new(),
			mus_dump_smt2: false,
		}
	}
}
