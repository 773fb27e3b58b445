//! Command implementations

pub mod check;
pub mod list;
pub mod show;

use clap::ValueEnum;

/// Which collection a command works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    #[value(aliases = ["posts", "post"])]
    Blog,
    #[value(alias = "problem")]
    Problems,
}
