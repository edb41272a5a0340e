use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit and integration tests) link without a memory layout.
    let target = env::var("TARGET").unwrap_or_default();
    if !target.starts_with("thumbv8m") {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // The Arm core of the RP2350 is the only supported firmware target
    let script_name = "rp2350.x";
    fs::copy(script_name, out_dir.join("memory.x")).expect("Failed to copy rp2350.x to memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={}", script_name);

    if PathBuf::from("defmt.x").exists() {
        fs::copy("defmt.x", out_dir.join("defmt.x")).expect("Failed to copy defmt.x");
        println!("cargo:rerun-if-changed=defmt.x");
    }
}
