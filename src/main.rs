use std::process::exit;

use bluedir::output::{print_notice, Notice};

fn main() {
    if let Err(e) = bluedir::app::run_cli() {
        print_notice(Notice::Error, &e);
        exit(1);
    }
}
