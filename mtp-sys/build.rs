fn main() {
    // The probe emits the link flags itself, fall back to linking by name
    // when no libmtp.pc is installed.
    if pkg_config::probe_library("libmtp").is_err() {
        println!("cargo:rustc-link-lib=mtp");
    }
}
