use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Only apply linker scripts for the RP2040 target (thumbv6m-none-eabi)
    let target = env::var("TARGET").unwrap();
    if target.starts_with("thumbv6m-none-eabi") {
        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed=memory.x");

        // Put memory.x where the linker can find it
        let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
        fs::copy("memory.x", out.join("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out.display());

        // cortex-m-rt, embassy-rp boot2 and defmt linker scripts
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
