fn main() {
    // Tell Cargo to rerun this build script if app.rc or app.manifest changes.
    println!("cargo:rerun-if-changed=app.rc");
    println!("cargo:rerun-if-changed=app.manifest");

    // Build scripts run on the host; the target OS comes from Cargo's environment.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "windows" {
        // The manifest opts into Common Controls v6, which the EDIT cue banner needs.
        let _ = embed_resource::compile("app.rc", embed_resource::NONE);
    }
}
