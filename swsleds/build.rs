use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // Only bare-metal ARM builds link against the board memory map
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("arm") {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::copy("link.x", out_dir.join("link.x")).unwrap();
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rerun-if-changed=link.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
