use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("graphwalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("graphwalk")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("ui")
                .about("Open the interactive canvas for building graphs and watching traversals"),
        )
        .subcommand(
            command!("trace")
                .about(
                    "Run a traversal over a graph described on the command line, printing \
                every step as it happens.",
                )
                .arg(
                    arg!(-e --"edge" <SPEC>)
                        .required(false)
                        .help("An edge as SOURCE-TARGET or SOURCE-TARGET:WEIGHT, may be repeated")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-n --"nodes" <COUNT>)
                        .required(false)
                        .help("Minimum number of nodes to lay out, ids start at 0")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(-a --"algo" <ALGORITHM>)
                        .required(true)
                        .help("The traversal to run")
                        .value_parser(["dfs", "bfs", "dijkstra"]),
                )
                .arg(
                    arg!(-s --"start" <NODE_ID>)
                        .required(true)
                        .help("The node id to start from")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-g --"graph-type" <TYPE>)
                        .required(false)
                        .help("How edges are interpreted")
                        .value_parser(["undirected", "directed", "weighted"])
                        .default_value("undirected"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause between published steps in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Trace output format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the JSON trace to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
