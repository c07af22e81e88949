use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Put memory.x where the linker looks for it
fn main() {
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set by cargo"));
    File::create(out.join("memory.x"))
        .and_then(|mut file| file.write_all(include_bytes!("memory.x")))
        .expect("Failed writing memory.x");
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
