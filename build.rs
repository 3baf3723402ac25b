use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn target_dir() -> PathBuf {
    // OUT_DIR is target/<profile>/build/<pkg>/out
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .map(Path::to_path_buf)
        .expect("OUT_DIR has a profile directory")
}

fn main() {
    let dest = target_dir();

    // Copy config.toml (and sample content, if any) next to the binary
    for file in ["config.toml", "content.json"] {
        println!("cargo:rerun-if-changed={}", file);
        let source = Path::new(file);
        if source.exists() {
            fs::copy(source, dest.join(file)).expect("copy resource into target directory");
        }
    }
}
