use std::io::{stdout, Write};

use metro::{shortest_path_with, utils, Network, PathError, QueryOptions, SearchStrategy, StationId, WeightProfile};

use dev_utils::load_example_network;

pub fn get_station_from_user(network: &Network, prompt: &str) -> Result<StationId, std::io::Error> {
    loop {
        print!("Where are you {prompt}? ");
        stdout().flush()?;
        let mut station_name = String::new();
        std::io::stdin().read_line(&mut station_name)?;
        if let Some(station) = network.find_station_by_name(station_name.trim()) {
            return Ok(station);
        }
        println!("Station not found. Please try again.");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let network = load_example_network()?;
    println!("Network loaded with {} stations and {} connections.", network.num_stations(), network.num_connections());
    println!();

    let start = get_station_from_user(&network, "starting")?;
    let profile = loop {
        let mut time_str = String::new();
        print!("What time are you starting? (HH:MM): ");
        stdout().flush()?;
        std::io::stdin().read_line(&mut time_str)?;
        match utils::parse_time(&time_str) {
            Ok(time) => break WeightProfile::for_time(time),
            Err(e) => {
                println!("Invalid time format: {e:?}. Please try again.");
            }
        }
    };
    let end = get_station_from_user(&network, "going")?;

    println!();
    println!("Start: {} ({profile})", utils::station_label(&network, start));
    println!("End: {}", utils::station_label(&network, end));
    println!();

    let num_iterations = 10;
    for strategy in [SearchStrategy::LinearScan, SearchStrategy::BinaryHeap] {
        let options = QueryOptions::default().with_profile(profile).with_strategy(strategy);
        let query_start = std::time::Instant::now();
        let mut result = shortest_path_with(&network, start, end, &options);
        for _ in 1..num_iterations {
            result = shortest_path_with(&network, start, end, &options);
        }
        println!("{strategy:?}:");
        println!("Query took {:?}", query_start.elapsed() / num_iterations);
        match result {
            Ok(path) => println!("{path}"),
            Err(PathError::PathNotFound { .. }) => println!("No path found."),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
