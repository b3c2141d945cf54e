use std::path::Path;

fn main() {
    env_logger::init();

    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    if let Err(error) = desklens_lib::run(Path::new(&data_dir)) {
        eprintln!("desklens: {error}");
        std::process::exit(1);
    }
}
