fn main() {
    if let Err(err) = vehicle_thefts::run() {
        eprintln!("error: {err:#}");
        std::process::exit(vehicle_thefts::error::classify(&err).exit_code());
    }
}
