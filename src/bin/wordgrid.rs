extern crate clap;

use std::fs::File;

use clap::{App, Arg};
use wordgrid::fill::FillSolver;
use wordgrid::grid::Grid;
use wordgrid::manager::WordListManager;
use wordgrid::scan;

fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let matches = App::new("wordgrid")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .value_name("FILE")
                .help("Input grid location")
                .required(true),
        )
        .arg(
            Arg::with_name("wordlist")
                .short("l")
                .long("wordlist")
                .value_name("FILE")
                .help("Word list location, one `word` or `word,score` per line")
                .required(true),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .value_name("WIDTH")
                .help("Input grid width. Required if input is not a square"),
        )
        .arg(
            Arg::with_name("height")
                .short("h")
                .long("height")
                .value_name("HEIGHT")
                .help("Input grid height. Required if input is not a square"),
        )
        .arg(
            Arg::with_name("accidentals")
                .short("a")
                .long("accidentals")
                .help("Report accidental dictionary words in the filled grid")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("profile")
                .short("p")
                .long("profile")
                .takes_value(false),
        )
        .get_matches();

    let input = matches.value_of("input").expect("input not included");
    let input = std::fs::read_to_string(input).expect("failed to read input");

    let input = match (matches.value_of("width"), matches.value_of("height")) {
        (Some(width), Some(height)) => {
            let width = width.parse().expect("Failed to parse width");
            let height = height.parse().expect("Failed to parse height");
            Grid::rectangle(input, width, height).expect("Failed to parse grid")
        }
        (None, None) => Grid::square(input).expect("Failed to parse grid"),
        (None, Some(_)) => return Err(String::from("Height specified but not width.")),
        (Some(_), None) => return Err(String::from("Width specified but not height.")),
    };

    if matches.is_present("profile") {
        let guard = pprof::ProfilerGuard::new(100).unwrap();
        std::thread::spawn(move || loop {
            if let Ok(report) = guard.report().build() {
                let file = File::create("flamegraph.svg").unwrap();
                report.flamegraph(file).unwrap();
            }
            std::thread::sleep(std::time::Duration::from_secs(5))
        });
    }

    let mut manager = WordListManager::new();
    let wordlist = matches.value_of("wordlist").expect("wordlist not included");
    manager
        .load(wordlist)
        .map_err(|e| format!("Failed to load word list: {}", e))?;

    let pool: Vec<String> = manager
        .stores()
        .iter()
        .flat_map(|store| store.entries().map(|entry| entry.text.clone()))
        .collect();

    let output = FillSolver::default().fill(&input, &pool);
    if output == input {
        return Err(String::from("Failed to fill grid"));
    }
    println!("{}", output);

    if matches.is_present("accidentals") {
        let stores = manager.stores();
        let matches = scan::scan_grid(&stores, &output);
        let matches: Vec<_> = matches
            .into_iter()
            .filter(|m| m.cells.len() > 1)
            .collect();
        for entry in scan::group_entries(&output, &matches, true, false) {
            println!("{} x{}", entry.text, entry.count);
        }
    }

    Ok(())
}
