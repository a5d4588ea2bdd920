use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let output_file = PathBuf::from(&crate_dir)
        .join("../../StreamlineFFI.h")
        .display()
        .to_string();

    // Generate C bindings using cbindgen
    cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("STREAMLINE_FFI_H")
        .with_documentation(true)
        .with_pragma_once(false)
        .with_parse_deps(false)
        .generate()
        .expect("Unable to generate C bindings")
        .write_to_file(output_file);

    for source in ["lib.rs", "error.rs", "grid.rs", "trace.rs", "types.rs"] {
        println!("cargo:rerun-if-changed=src/{source}");
    }
}
