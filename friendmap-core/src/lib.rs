pub mod config;
pub mod crawl;
pub mod error;
pub mod graph;
pub mod render;
pub mod stats;

pub use config::Config;
pub use error::{CoreError, Result};
pub use graph::{ProfileNode, SocialGraph, assemble, assemble_parts};

pub fn print_banner() {
    let banner = r#"
    ┌─┐┬─┐┬┌─┐┌┐┌┌┬┐┌┬┐┌─┐┌─┐
    ├┤ ├┬┘│├┤ │││ │││││├─┤├─┘
    └  ┴└─┴└─┘┘└┘─┴┘┴ ┴┴ ┴┴
        mutual friends, mapped
    "#;
    println!("{}", banner);
    println!("    v{}\n", env!("CARGO_PKG_VERSION"));
}
