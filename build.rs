fn main() {
    println!("cargo:rerun-if-env-changed=AS3935_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=AS3935_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=AS3935_MQTT_HOST");
    println!("cargo:rerun-if-env-changed=AS3935_MQTT_PORT");
    println!("cargo:rerun-if-env-changed=AS3935_MQTT_USER");
    println!("cargo:rerun-if-env-changed=AS3935_MQTT_PASS");

    // Host builds (tests, simulation) have no ESP-IDF sysenv to forward.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
