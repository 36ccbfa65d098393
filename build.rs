fn main() {
    println!("cargo:rerun-if-env-changed=VOLTSERVO_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=VOLTSERVO_WIFI_PASS");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
