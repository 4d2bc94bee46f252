use tidyext::cli;

fn main() {
    let args = cli::parse();
    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
    }
}
