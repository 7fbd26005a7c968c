fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF toolchain environment is only needed for the device build.
    // Host builds (tests, simulation) compile without embuild.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
