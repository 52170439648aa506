// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, rotation, encoding, and the low-level filters
// the pipeline is built from.

pub mod filters;
pub mod source;

pub use source::SourceImage;
