use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Textures referenced by name (e.g. brick-diffuse.jpg) live in /assets/.
    println!("cargo:rerun-if-changed=assets");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    // The loader falls back to this copy when ./assets is not next to the binary.
    println!(
        "cargo:rustc-env=FLOW_SKETCH_ASSET_DIR={}",
        out_dir.join("assets").display()
    );

    if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], &out_dir, &copy_options)?;
    }

    Ok(())
}
