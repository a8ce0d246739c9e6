fn main() {
    println!("cargo:rerun-if-changed=version_scripts/simba.map");
    let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    // GNU ld / lld only; other linkers export every #[no_mangle] symbol.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("linux") {
        return;
    }
    let version_script = format!("{manifest_dir}/version_scripts/simba.map");
    if std::path::Path::new(&version_script).exists() {
        println!("cargo:rustc-cdylib-link-arg=-Wl,--version-script={version_script}");
    }
}
