/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Lowercase a config key and use `_` as the only word separator.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}
