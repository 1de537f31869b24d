//! Build script for the storefront crate.
//!
//! Computes a content hash for the stylesheet so templates can reference an
//! immutable, cache-forever asset URL. The hash is exposed to the crate via
//! the `CSS_HASH` compile-time environment variable and a hashed copy of the
//! file is written under `static/css/derived/`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css.display());

    match fingerprint(&css) {
        Some(hash) => {
            println!("cargo:rustc-env=CSS_HASH={hash}");
        }
        None => {
            // Stylesheet may be absent on a fresh checkout; templates fall
            // back to an unhashed URL.
            println!("cargo:warning=static/css/main.css not found, skipping CSS fingerprint");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Hash the asset and place a `<stem>.<hash>.<ext>` copy next to it under
/// `derived/`. Returns the short hash, or `None` if the asset is missing.
fn fingerprint(asset: &Path) -> Option<String> {
    let content = fs::read(asset).ok()?;

    let digest = Sha256::digest(&content);
    let hash: String = format!("{digest:x}").chars().take(8).collect();

    let derived: PathBuf = asset
        .parent()
        .expect("asset path has a parent directory")
        .join("derived");
    fs::create_dir_all(&derived).expect("Failed to create derived asset directory");

    let file_name = format!("main.{hash}.css");
    fs::copy(asset, derived.join(file_name)).expect("Failed to copy hashed asset");

    Some(hash)
}
