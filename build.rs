fn main() {
    println!("cargo:rerun-if-changed=config/ambilamp.json");

    // ESP-IDF link arguments are only needed for the firmware binary;
    // host builds (tests, simulation) skip the embuild step entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
