use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let out_dir = crate_dir.join("include");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        println!("cargo:warning=could not create {}: {e}", out_dir.display());
        return;
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("OPENFORMS_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("openforms.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen failed: {e}"),
    }
}
