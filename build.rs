//! Resolves process-wide pool policy from `arenapool.toml` (or the file
//! named by `ARENAPOOL_CONFIG`) and bakes it into `OUT_DIR/config_gen.rs`.
//!
//! Only the two policy knobs the spec calls out as process-wide policy —
//! `min_pool_bytes` and `max_pools` — are build-configurable. Size-class
//! geometry is a fixed part of the chunk layout and lives in
//! `src/size_class.rs` as plain `const`s.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Default)]
struct ConfigSection {
    min_pool_bytes: Option<u64>,
    max_pools: Option<u32>,
}

#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    config: ConfigSection,
}

struct Resolved {
    min_pool_bytes: u64,
    max_pools: u32,
}

fn resolve(cfg: &ConfigSection) -> Resolved {
    let min_pool_bytes = cfg.min_pool_bytes.unwrap_or(1 << 20);
    let max_pools = cfg.max_pools.unwrap_or(10);

    assert!(
        min_pool_bytes >= 4096,
        "min_pool_bytes ({min_pool_bytes}) must be >= 4096"
    );
    assert!(
        min_pool_bytes.is_power_of_two(),
        "min_pool_bytes ({min_pool_bytes}) must be a power of two"
    );
    assert!(max_pools >= 1, "max_pools must be >= 1");
    assert!(
        max_pools <= 1024,
        "max_pools ({max_pools}) is implausibly large"
    );

    Resolved {
        min_pool_bytes,
        max_pools,
    }
}

fn default_config_path() -> String {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    format!("{manifest_dir}/arenapool.toml")
}

fn generate(resolved: &Resolved, out_path: &Path) {
    let code = format!(
        "// Auto-generated by build.rs. Do not edit.\n\n\
         pub const MIN_POOL_BYTES: usize = {};\n\
         pub const MAX_POOLS: usize = {};\n",
        resolved.min_pool_bytes, resolved.max_pools,
    );
    fs::write(out_path, code).expect("failed to write config_gen.rs");
}

fn main() {
    println!("cargo:rerun-if-env-changed=ARENAPOOL_CONFIG");

    let out_dir = env::var("OUT_DIR").unwrap();
    let config_path = env::var("ARENAPOOL_CONFIG").unwrap_or_else(|_| default_config_path());
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("failed to read {config_path}: {e}"));
    let config: Config = toml::from_str(&content).expect("failed to parse TOML config");

    let resolved = resolve(&config.config);
    generate(&resolved, &Path::new(&out_dir).join("config_gen.rs"));
}
