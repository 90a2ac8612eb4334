use crm::cli::{exit_code, report, run};

fn main() {
    if let Err(e) = run() {
        report(&e);
        std::process::exit(exit_code(&e));
    }
}
