#[macro_use]
extern crate log;
extern crate cases;
extern crate chrono;
extern crate env_logger;

use chrono::prelude::{DateTime, Local};
use std::env;
use std::io::Write;

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            let time = now.format("%H:%M:%S.%3f");
            writeln!(buf, "{:5}: {} - {}", record.level(), time, record.args())
        })
        .init();
}

/// Runs the three-node election scenario, optionally several times: `smoke [rounds]`.
fn main() {
    init_logger();

    let rounds = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(1);

    info!("Stand-alone smoke test started. Rounds: {}", rounds);

    for round in 1..=rounds {
        cases::smoke::run();
        info!("Round {} completed", round);
    }

    info!("Stand-alone smoke test completed");
}
