use friendmap::commands::command_argument_builder;
use friendmap::handlers::{handle_crawl, handle_init, init_tracing, show_banner};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    show_banner(quiet);
    init_tracing(verbose);

    match chosen_command.subcommand() {
        None => {
            // No subcommand provided, just show the banner
        }
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
