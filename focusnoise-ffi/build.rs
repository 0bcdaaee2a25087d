// Build script that tries to generate a C header with `cbindgen`.
// If `cbindgen` is not available, it falls back to copying the
// checked-in `include/focusnoise.h` to $OUT_DIR.
//
// Either way, consumers can include the header from:
//   - <repo>/focusnoise-ffi/include/focusnoise.h   (checked-in)
//   - $OUT_DIR/focusnoise.h

use std::{env, fs, path::PathBuf, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=include/focusnoise.h");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let header_path_repo = crate_dir.join("include").join("focusnoise.h");
    let header_path_out = out_dir.join("focusnoise.h");

    let cbindgen_ok = Command::new("cbindgen")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if cbindgen_ok {
        let status = Command::new("cbindgen")
            .arg("--crate")
            .arg("focusnoise-ffi")
            .arg("--lang")
            .arg("C")
            .arg("--output")
            .arg(&header_path_out)
            .current_dir(&crate_dir)
            .status();

        // The checked-in header stays the source of truth; cbindgen output only lands in OUT_DIR.
        if status.is_ok_and(|s| s.success()) {
            return;
        }
        println!("cargo:warning=focusnoise-ffi: cbindgen failed; falling back to checked-in header");
    }

    fs::copy(&header_path_repo, &header_path_out)
        .expect("failed to copy include/focusnoise.h to OUT_DIR");
}
