use std::sync::atomic::{AtomicU32, Ordering};

static VERBOSITY: AtomicU32 = AtomicU32::new(0);

pub fn set_verbosity(level: u32) {
	VERBOSITY.store(level, Ordering::Relaxed);
}

pub fn verbosity() -> u32 {
	VERBOSITY.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! message {
    ($($arg:tt)*) => {
        eprintln!("[MESSAGE] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {
        eprintln!("[WARNING] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("[ERROR] {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error_and_exit {
    ($($arg:tt)*) => {
        $crate::error!($($arg)*);
        ::std::process::exit(1);
    };
}

#[macro_export]
macro_rules! debug_message {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            eprintln!("[DEBUG MESSAGE] {}", format!($($arg)*));
        }
    };
}

/// Leveled result output. Level 0 is always printed.
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)*) => {
        if $level <= $crate::logging::messages::verbosity() {
            println!("{}", format!($($arg)*));
        }
    };
}

pub use debug_message;
pub use error;
pub use error_and_exit;
pub use log;
pub use message;
pub use warning;
