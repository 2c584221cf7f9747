fn main() {
    if let Err(err) = topomap::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
