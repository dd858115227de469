//! # hbmgen
//!
//! Command line front end for the HBM boilerplate generators. The generators
//! themselves live in [`hbmgen_backend`]; the signal tables and the
//! configuration they read live in [`hbmgen_ir`].
pub mod cmdline;
pub mod driver;
