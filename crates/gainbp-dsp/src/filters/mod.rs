// SPDX-License-Identifier: LGPL-3.0-or-later

//! Filter coefficient design, the biquad section and the per-channel bank.
//!
//! Coefficients follow the RBJ Audio EQ Cookbook with `a0` normalized
//! out and the usual subtraction form for the feedback terms.

pub mod bank;
pub mod biquad;
pub mod coeffs;
