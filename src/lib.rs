// SPDX-License-Identifier: Apache-2.0

//! Cut enumeration, cut feature export and selection-driven rebuilding of
//! k-LUT networks.
//!
//! The flow is: read a network ([`blif`]), enumerate bounded-size cuts for
//! every node ([`cut_enum`]), export them with cost features for an external
//! selector ([`export`]), then materialize a new network from the selector's
//! per-node choices ([`selection`], [`rebuild`]).

pub mod blif;
pub mod cut_enum;
pub mod cutsel_error;
pub mod export;
pub mod klut;
pub mod klut_sim;
pub mod naming;
pub mod rebuild;
pub mod selection;
pub mod stats;
pub mod test_utils;
pub mod truth_table;

pub use cutsel_error::CutselError;
