#![allow(dead_code)]

mod bmc;
mod checker;
mod demos;
mod logging;
mod model;
mod mus;
mod options;
mod property;
mod smt;

use clap::{Arg, ArgAction, Command};

use crate::logging::messages::set_verbosity;
use crate::options::options::MusOptions;

fn parsed_u32(value: &str, what: &str) -> u32 {
	match value.parse() {
		Ok(v) => v,
		Err(_) => {
			error!("{} must be a non-negative integer, got `{}`", what, value);
			std::process::exit(1)
		}
	}
}

fn main() {
	let matches = Command::new("musket")
		.version("0.1.0")
		.about("Minimal unsatisfiable subset extraction for finite-state safety models")
		.subcommand(
			Command::new("mus")
				.about("Explain a bounded safety query through its minimal unsatisfiable subsets")
				.arg(
					Arg::new("model")
						.short('m')
						.long("model")
						.value_name("MODEL")
						.help("Name of the built-in demo model (see `models`)")
						.required(true),
				)
				.arg(
					Arg::new("bound")
						.short('k')
						.long("bound")
						.value_name("K")
						.help("Unrolling bound")
						.default_value("10"),
				)
				.arg(
					Arg::new("atomic-init")
						.long("atomic-init")
						.action(ArgAction::SetTrue)
						.help("Treat the whole init formula as one unit"),
				)
				.arg(
					Arg::new("tseitin")
						.long("tseitin")
						.action(ArgAction::SetTrue)
						.help("Decompose trans units into toggleable sub-term equalities"),
				)
				.arg(
					Arg::new("combine-suffix")
						.long("combine-suffix")
						.value_name("REGEX")
						.help("Conjoin trans units whose identifiers agree up to this suffix")
						.default_value(""),
				)
				.arg(
					Arg::new("include-internal-netnames")
						.long("include-internal-netnames")
						.action(ArgAction::SetTrue)
						.help("Keep $-prefixed identifiers as toggleable units"),
				)
				.arg(
					Arg::new("dump-smt2")
						.long("dump-smt2")
						.action(ArgAction::SetTrue)
						.help("Write the query to mus_query.smt2"),
				)
				.arg(
					Arg::new("verbosity")
						.short('v')
						.long("verbosity")
						.value_name("LEVEL")
						.default_value("0"),
				),
		)
		.subcommand(
			Command::new("bmc")
				.about("Run plain bounded model checking on a demo model")
				.arg(
					Arg::new("model")
						.short('m')
						.long("model")
						.value_name("MODEL")
						.help("Name of the built-in demo model (see `models`)")
						.required(true),
				)
				.arg(
					Arg::new("bound")
						.short('k')
						.long("bound")
						.value_name("K")
						.help("Unrolling bound")
						.default_value("10"),
				),
		)
		.subcommand(Command::new("models").about("List the built-in demo models"))
		.get_matches();

	match matches.subcommand() {
		Some(("mus", sub_m)) => {
			let model = sub_m.get_one::<String>("model").unwrap();
			let bound = parsed_u32(sub_m.get_one::<String>("bound").unwrap(), "bound");
			let mut opts = MusOptions::default();
			opts.bound = bound;
			opts.verbosity =
				parsed_u32(sub_m.get_one::<String>("verbosity").unwrap(), "verbosity");
			opts.mus_atomic_init = sub_m.get_flag("atomic-init");
			opts.mus_apply_tseitin = sub_m.get_flag("tseitin");
			opts.mus_include_yosys_internal_netnames =
				sub_m.get_flag("include-internal-netnames");
			opts.mus_combine_suffix = sub_m.get_one::<String>("combine-suffix").unwrap().clone();
			opts.mus_dump_smt2 = sub_m.get_flag("dump-smt2");
			set_verbosity(opts.verbosity);
			demos::mus_demo::mus_demo(model, bound, opts);
		}
		Some(("bmc", sub_m)) => {
			let model = sub_m.get_one::<String>("model").unwrap();
			let bound = parsed_u32(sub_m.get_one::<String>("bound").unwrap(), "bound");
			demos::mus_demo::bmc_demo(model, bound);
		}
		Some(("models", _)) => {
			for name in demos::models::MODEL_NAMES {
				println!("{}", name);
			}
		}
		_ => {
			error!("No valid subcommand was used. Use --help for more information.");
		}
	}
}
