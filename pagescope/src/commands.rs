use crate::CLAP_STYLING;
use clap::{arg, command};
use pagescope_core::config::DEFAULT_CONFIG_PATH;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagescope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagescope")
        .about("Scrape a web page through a remote scraping API and browse its links")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Print debug logs to stderr")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"api-base" <URL>)
                .required(false)
                .global(true)
                .help("Base address of the scraping API (overrides PAGESCOPE_API_BASE_URL)"),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .global(true)
                .help(format!("Configuration file [default: {}]", DEFAULT_CONFIG_PATH)),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about("Scrape a URL and print a report of what the API found")
                .arg(arg!(<URL>).required(true).help("The page to scrape"))
                .arg(
                    arg!(-p --"pages" <N>)
                        .required(false)
                        .help("Number of additional result pages to load")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0")
                        .conflicts_with("all"),
                )
                .arg(
                    arg!(-a --"all")
                        .help("Load every remaining result page")
                        .required(false),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the report to a file instead of printing it")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("ui")
                .about("Launch the interactive viewer")
                .arg(arg!([URL]).required(false).help("Scrape this URL on start")),
        )
        .subcommand(command!("config").about("Print the resolved configuration"))
}
