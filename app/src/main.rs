mod cli;
mod scenarios;

fn main() {
    miette::set_panic_hook();

    if let Err(report) = cli::exec() {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}
