fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match palette_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[palette-core] {error}");
            eprintln!("usage: palette-core [--config <path>] [--no-builtins] [--offline]");
            std::process::exit(2);
        }
    };

    if let Err(error) = palette_core::runtime::run_with_options(options) {
        eprintln!("[palette-core] runtime failed: {error}");
        std::process::exit(1);
    }
}
