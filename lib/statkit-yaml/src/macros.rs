/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

macro_rules! yaml_doc {
    ($s:expr) => {
        yaml_rust::YamlLoader::load_from_str($s)
            .unwrap()
            .pop()
            .unwrap()
    };
}
