use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("friendmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("friendmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Enable debug logging").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default friendmap configuration file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to store the configuration in")
                        .default_value("~/.config/friendmap/"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing configuration without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a profile's friends and their friend lists, then map the mutual \
                friendships between them.",
                )
                .arg(
                    arg!([URL])
                        .required(false)
                        .help("Profile link to start from (prompted for when omitted)"),
                )
                .arg(
                    arg!(--"config" <PATH>)
                        .required(false)
                        .help("Configuration file (default: ~/.config/friendmap/config.json)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM>)
                        .required(false)
                        .help("Maximum concurrent friend fetches (0 = unbounded)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Site that canonical profile links are built on"),
                )
                .arg(
                    arg!(--"absent-container" <POLICY>)
                        .required(false)
                        .help("How to treat a profile with no friend list section")
                        .value_parser(["private", "empty"]),
                )
                .arg(
                    arg!(--"prune")
                        .required(false)
                        .help("Hide friends with no further connections without asking")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("no-prune"),
                )
                .arg(
                    arg!(--"no-prune")
                        .required(false)
                        .help("Keep every friend without asking")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("prune"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json, dot")
                        .value_parser(["text", "json", "dot"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save output to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
