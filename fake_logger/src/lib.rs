//! The fake-logger log producer.
//!
//! This library supports the `fake-logger` binary found elsewhere in this
//! project. It appends canned, severity-tagged lines to a file on a fixed
//! interval so that log tailing and processing tools have something to chew
//! on. The produced lines are drawn from a [`catalog::Catalog`] by a
//! [`select::Select`] implementation and written by an [`emitter::Emitter`].

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

pub mod catalog;
pub mod emitter;
pub mod select;
