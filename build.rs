// Build script for xbro overlay
// Copies the sample config and bar asset to the output directory after build

use std::env;
use std::fs;
use std::path::Path;

const SHIPPED_FILES: [&str; 2] = ["xbro_overlay.toml", "assets/xp-bar.png"];

fn main() {
    for file in SHIPPED_FILES {
        println!("cargo:rerun-if-changed={}", file);
    }

    let Ok(out_dir) = env::var("OUT_DIR") else {
        return;
    };

    // OUT_DIR = target/<profile>/build/<crate>-<hash>/out
    let Some(target_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        return;
    };

    for file in SHIPPED_FILES {
        let src = Path::new(file);
        if !src.exists() {
            continue;
        }
        // Keep relative layout so asset_dir = "assets" resolves next to the config
        let dst = target_dir.join(src);
        if let Some(parent) = dst.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                println!("cargo:warning=Failed to create {}: {}", parent.display(), e);
                continue;
            }
        }
        if let Err(e) = fs::copy(src, &dst) {
            println!("cargo:warning=Failed to copy {}: {}", file, e);
        }
    }
}
