/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

#[cfg(test)]
#[macro_use]
mod macros;

mod hash;
mod util;

pub mod key;
pub mod value;

pub use hash::foreach_kv;
pub use util::{load_doc, load_str};
