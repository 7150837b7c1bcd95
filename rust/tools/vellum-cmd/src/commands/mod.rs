//! Command implementations for vellum-cmd

pub mod inspect;
