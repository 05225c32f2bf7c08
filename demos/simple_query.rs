use metro::{shortest_path, NetworkSummary};

use dev_utils::get_example_scenario;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let (network, start, end) = get_example_scenario();
    print!("{}", NetworkSummary::of(&network));

    match shortest_path(&network, start, end) {
        Ok(path) => println!("{path}"),
        Err(e) => println!("{e}"),
    }

    Ok(())
}
