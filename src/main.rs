fn main() {
    if let Err(err) = order_alert_lib::run() {
        eprintln!("order-alert: {err:#}");
        std::process::exit(1);
    }
}
