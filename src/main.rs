use clap::{Arg, ArgAction, Command as ClapCommand};
use std::process;
use log::error;

// Import from your library
use floodtrace::utils::logger::Logger;
use floodtrace::commands::{CommandFactory, FloodtraceCommandFactory};

fn io_args() -> Vec<Arg> {
    vec![
        Arg::new("input")
            .help("Input directory")
            .required(true)
            .index(1),
        Arg::new("output")
            .short('o')
            .long("output")
            .help("Destination directory for stage output")
            .value_name("DIR")
            .required(true),
    ]
}

fn crop_args() -> Vec<Arg> {
    vec![
        Arg::new("detect-band")
            .long("detect-band")
            .help("One-based band used for content detection")
            .value_name("BAND")
            .default_value("5")
            .required(false),
        Arg::new("threshold")
            .long("threshold")
            .help("Normalized brightness cutoff separating content from collar")
            .value_name("VALUE")
            .default_value("127")
            .required(false),
        Arg::new("margin-left")
            .long("margin-left")
            .help("Padding pixels left of the detected content box")
            .value_name("PIXELS")
            .default_value("300")
            .required(false),
        Arg::new("margin-top")
            .long("margin-top")
            .help("Padding pixels above the detected content box")
            .value_name("PIXELS")
            .default_value("800")
            .required(false),
        Arg::new("extra-width")
            .long("extra-width")
            .help("Extra pixels added to the window width")
            .value_name("PIXELS")
            .default_value("1000")
            .required(false),
        Arg::new("extra-height")
            .long("extra-height")
            .help("Extra pixels added to the window height")
            .value_name("PIXELS")
            .default_value("700")
            .required(false),
    ]
}

fn classify_args() -> Vec<Arg> {
    vec![
        Arg::new("band")
            .long("band")
            .help("One-based band fed to the classifier")
            .value_name("BAND")
            .default_value("1")
            .required(false),
        Arg::new("clusters")
            .long("clusters")
            .help("Number of k-means clusters")
            .value_name("COUNT")
            .default_value("5")
            .required(false),
        Arg::new("iterations")
            .long("iterations")
            .help("Maximum k-means iterations per restart")
            .value_name("COUNT")
            .default_value("5")
            .required(false),
        Arg::new("epsilon")
            .long("epsilon")
            .help("Center movement below which k-means stops early")
            .value_name("VALUE")
            .default_value("0.0001")
            .required(false),
        Arg::new("restarts")
            .long("restarts")
            .help("Independent k-means attempts, best compactness wins")
            .value_name("COUNT")
            .default_value("5")
            .required(false),
        Arg::new("sigma")
            .long("sigma")
            .help("Gaussian blur sigma applied before clustering (0 disables)")
            .value_name("VALUE")
            .default_value("5")
            .required(false),
        Arg::new("accumulate")
            .long("accumulate")
            .help("Fold each mask into the running maximum of earlier frames")
            .action(ArgAction::SetTrue),
    ]
}

fn label_args() -> Vec<Arg> {
    vec![
        Arg::new("connectivity")
            .long("connectivity")
            .help("Voxel adjacency rule (6, 18 or 26)")
            .value_name("CODE")
            .default_value("6")
            .required(false),
        Arg::new("components")
            .long("components")
            .help("Highest component id kept in the output")
            .value_name("COUNT")
            .default_value("100")
            .required(false),
        Arg::new("max-slices")
            .long("max-slices")
            .help("Upper bound on slices stacked into one volume")
            .value_name("COUNT")
            .default_value("200")
            .required(false),
    ]
}

fn vectorize_args() -> Vec<Arg> {
    vec![
        Arg::new("min-contour")
            .long("min-contour")
            .help("Shortest boundary, in pixels, kept as a polygon")
            .value_name("PIXELS")
            .default_value("400")
            .required(false),
        Arg::new("stride")
            .long("stride")
            .help("Keep every Nth boundary point")
            .value_name("COUNT")
            .default_value("15")
            .required(false),
    ]
}

fn main() {
    let matches = ClapCommand::new("Floodtrace")
        .version("1.0")
        .about("Trace flood extents through time series of geo-referenced rasters")
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Path of the command log file")
                .value_name("FILE")
                .default_value("floodtrace.log")
                .required(false),
        )
        .subcommand_required(true)
        .subcommand(
            ClapCommand::new("crop")
                .about("Crop rasters to their padded content window on a common grid")
                .args(io_args())
                .args(crop_args()),
        )
        .subcommand(
            ClapCommand::new("classify")
                .about("Classify pixels into foreground masks with k-means")
                .args(io_args())
                .args(classify_args()),
        )
        .subcommand(
            ClapCommand::new("label")
                .about("Label connected components through the mask stack")
                .args(io_args())
                .args(label_args()),
        )
        .subcommand(
            ClapCommand::new("vectorize")
                .about("Trace labeled regions into GeoJSON polygons")
                .args(io_args())
                .args(vectorize_args()),
        )
        .subcommand(
            ClapCommand::new("run")
                .about("Run the full crop, classify, label and vectorize pipeline")
                .args(io_args())
                .args(crop_args())
                .args(classify_args())
                .args(label_args())
                .args(vectorize_args())
                .arg(
                    Arg::new("keep-intermediates")
                        .long("keep-intermediates")
                        .help("Retain per-stage output directories after the run")
                        .value_name("BOOL")
                        .default_value("true")
                        .required(false),
                ),
        )
        .get_matches();

    let log_file = matches
        .get_one::<String>("log-file")
        .map(String::as_str)
        .unwrap_or("floodtrace.log");
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("floodtrace-global.log") {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = FloodtraceCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
