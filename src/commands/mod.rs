//! Command implementations for lapd CLI

pub mod deploy;
