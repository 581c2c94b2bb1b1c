/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

/// Call `f` on every entry of a map whose keys must all be strings.
pub fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        let Yaml::String(key) = k else {
            return Err(anyhow!("map key {k:?} is not a string"));
        };
        f(key, v).context(format!("failed to parse value of key {key}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_in_order() {
        let yaml = yaml_doc!("bias: 1\nbars: 2");
        let hash = yaml.as_hash().unwrap();
        let mut seen = Vec::new();
        foreach_kv(hash, |k, v| {
            seen.push((k.to_string(), v.as_i64().unwrap()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![("bias".to_string(), 1), ("bars".to_string(), 2)]);
    }

    #[test]
    fn reject() {
        let yaml = yaml_doc!("1: 1");
        assert!(foreach_kv(yaml.as_hash().unwrap(), |_, _| Ok(())).is_err());

        let yaml = yaml_doc!("bias: 1");
        let r = foreach_kv(yaml.as_hash().unwrap(), |k, _| Err(anyhow!("bad {k}")));
        assert!(r.is_err());
    }
}
