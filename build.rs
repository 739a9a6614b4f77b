use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

// Files from /src that the driver reads at runtime, next to the executable.
const RUNTIME_FILES: &[&str] = &["xfd.toml", "log4rs.yml"];

// Copy the default config files to the output directory, next to our resulting executable.
// An existing copy is left alone so local edits survive a rebuild.
pub fn main() {
    let cargo_manifest_dir = env::var_os("CARGO_MANIFEST_DIR").unwrap_or(OsString::from("no_manifest_dir"));
    let output_dir = env::var_os("OUT_DIR").unwrap_or(OsString::from("no_output_dir"));
    let exe_dir = match Path::new(&output_dir).ancestors().nth(3) {
        Some(dir) => dir.to_path_buf(),
        None => {
            println!("cargo:warning=Unexpected OUT_DIR {:?}, not copying config files", output_dir);
            return;
        }
    };

    for file_name in RUNTIME_FILES {
        let mut source = PathBuf::new();
        source.push(&cargo_manifest_dir);
        source.push("src");
        source.push(file_name);
        println!("cargo:rerun-if-changed=src/{}", file_name);

        let dest = exe_dir.join(file_name);
        if dest.exists() {
            continue;
        }
        match fs::copy(&source, &dest) {
            Ok(_) => println!("Copied {} from {:?} to {:?}", file_name, source, dest),
            Err(e) => println!("cargo:warning=Failed to copy {:?} to {:?}: {:?}", source, dest, e),
        }
    }
}
