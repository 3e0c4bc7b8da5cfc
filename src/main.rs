use hooksync::{cli::run, utils::print_error};

fn main() {
    if let Err(error) = run() {
        print_error(
            "Was not able to set up git hooks",
            &error.to_string(),
            "See `hooksync --help` for usage.",
        );
        std::process::exit(1);
    }
}
