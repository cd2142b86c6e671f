fn main() {
    if let Err(err) = sitetree::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
