use f0_notes::{
    split_header, ArticulationContract, BatchDecoder, DecoderConfig, RecordLayout, MAX_CAPACITY,
};
use log::info;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

const USAGE: &str = "Usage: f0-notes [--layout <plain|stateful>] [--capacity <n>] [--config <file.yaml>] <input.f0 | ->";

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut layout: Option<RecordLayout> = None;
    let mut capacity: Option<usize> = None;
    let mut config_path: Option<&String> = None;
    let mut input_path: Option<&String> = None;

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--layout" => {
                let value = iter.next().unwrap_or_else(|| fail(USAGE));
                layout = Some(
                    RecordLayout::from_name(value)
                        .unwrap_or_else(|| fail(&format!("Unknown layout '{}'", value))),
                );
            }
            "--capacity" => {
                let value = iter.next().unwrap_or_else(|| fail(USAGE));
                match value.parse::<usize>() {
                    Ok(n) if (1..=MAX_CAPACITY).contains(&n) => capacity = Some(n),
                    _ => fail(&format!(
                        "Capacity must be between 1 and {}, got '{}'",
                        MAX_CAPACITY, value
                    )),
                }
            }
            "--config" => {
                config_path = Some(iter.next().unwrap_or_else(|| fail(USAGE)));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ if input_path.is_none() => input_path = Some(arg),
            _ => fail(USAGE),
        }
    }

    let input_path = input_path.unwrap_or_else(|| fail(USAGE));

    // Read input
    let source = if input_path == "-" {
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            fail(&format!("Error reading stdin: {}", e));
        }
        buffer
    } else {
        match fs::read_to_string(input_path) {
            Ok(content) => content,
            Err(e) => fail(&format!("Error reading file '{}': {}", input_path, e)),
        }
    };

    let file_config = config_path.map(|path| {
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(&format!("Error reading config '{}': {}", path, e)));
        DecoderConfig::from_yaml(&content).unwrap_or_else(|e| fail(&e.to_string()))
    });

    let (header_config, body) = match split_header(&source) {
        Ok(split) => split,
        Err(e) => fail(&e.to_string()),
    };

    // Flags override the header, which overrides the config file
    let mut config = header_config.or(file_config).unwrap_or_default();
    if let Some(layout) = layout {
        config.layout = layout;
    }
    if let Some(capacity) = capacity {
        config.capacity = capacity;
    }
    info!("layout {}, capacity {}", config.layout, config.capacity);

    let mut decoder = BatchDecoder::from_config(&config);
    let batch = decoder.decode(body);

    let mut contract = ArticulationContract::new();
    for record in batch.iter() {
        let rendered = record.render(config.layout);
        if config.layout.has_state() {
            let step = contract.apply_record(record);
            println!("{} {:?}", rendered, step.action);
            if let Some(violation) = step.violation {
                eprintln!("warning: {}", violation);
            }
        } else {
            println!("{}", rendered);
        }
    }

    for diagnostic in batch.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }

    eprintln!(
        "Decoded {} record(s){}",
        batch.count(),
        if batch.overflowed { ", buffer overflowed" } else { "" }
    );
}
