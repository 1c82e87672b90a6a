use colored::Colorize;
use commands::command_argument_builder;
use pagescope::handlers::{
    handle_config, handle_scrape, handle_ui, init_logging, print_banner, resolve_config,
};

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let Some((name, sub_matches)) = chosen_command.subcommand() else {
        // No subcommand provided, just show the banner
        return;
    };

    let config = match resolve_config(sub_matches) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let result = match name {
        "ui" => handle_ui(sub_matches, &config).await,
        "scrape" => {
            init_logging(verbose);
            handle_scrape(sub_matches, &config, quiet).await
        }
        "config" => {
            handle_config(&config);
            Ok(())
        }
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        exit_with(e);
    }
}

fn exit_with(error: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), error);
    std::process::exit(1);
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
