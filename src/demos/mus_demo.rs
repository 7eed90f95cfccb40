use colored::Colorize;
use z3::{Config, Context};

use crate::checker::checker::Prover;
use crate::checker::result::ProverResult;
use crate::demos::models;
use crate::logging::messages::*;
use crate::mus::mus::MusEngine;
use crate::options::options::MusOptions;

fn colored_verdict(result: ProverResult) -> colored::ColoredString {
	match result {
		ProverResult::True => "TRUE".green(),
		ProverResult::False => "FALSE".red(),
		ProverResult::Unknown => "UNKNOWN".yellow(),
	}
}

/// Builds a demo model and explains its bounded safety query through MUSes.
pub fn mus_demo(model: &str, bound: u32, opts: MusOptions) {
	let cfg = Config::new();
	let ctx = Context::new(&cfg);
	message!("Model: {}", model);
	let (ts, property) = match models::build_model(&ctx, model) {
		Ok(built) => built,
		Err(e) => {
			error!("{}", e);
			std::process::exit(1)
		}
	};
	message!("Property {}", property);
	let mut engine = match MusEngine::new(ts, property, opts) {
		Ok(engine) => engine,
		Err(e) => {
			error!("{}", e);
			std::process::exit(1)
		}
	};
	match engine.check_until(bound) {
		Ok(result) => println!("Result: {}", colored_verdict(result)),
		Err(e) => {
			error_and_exit!("{}", e);
		}
	}
}

/// Runs plain bounded model checking on a demo model.
pub fn bmc_demo(model: &str, bound: u32) {
	let cfg = Config::new();
	let ctx = Context::new(&cfg);
	message!("Model: {}", model);
	let (ts, property) = match models::build_model(&ctx, model) {
		Ok(built) => built,
		Err(e) => {
			error!("{}", e);
			std::process::exit(1)
		}
	};
	message!("Property {}", property);
	let mut bmc = crate::bmc::bmc::Bmc::new(ts, property);
	match bmc.check_until(bound) {
		Ok(result) => println!("Result: {}", colored_verdict(result)),
		Err(e) => {
			error_and_exit!("{}", e);
		}
	}
}
