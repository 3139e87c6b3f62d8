fn main() {
    if let Err(err) = softpomo_lib::run() {
        eprintln!("softpomo: {err:#}");
        std::process::exit(1);
    }
}
