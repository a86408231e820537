//! Command-line interface for minixml
//!
//! Usage:
//!   minixml [`<filename>`]                  - reformat the document onto one line
//!   minixml --lint [`<filename>`]           - parse only, report problems
//!   minixml --query `<path>` [`<filename>`] - print the value a slash path points at
//!
//! The document is read from standard input when no filename is given.
use std::io;
use std::process;

use clap::{Arg, ArgAction, Command};

use minixml::Document;

fn main() {
	let matches = Command::new("minixml")
		.version(minixml::VERSION)
		.about("Parse, reformat and query strict minimal XML documents")
		.arg(
			Arg::new("lint")
				.long("lint")
				.action(ArgAction::SetTrue)
				.conflicts_with("query")
				.help("Parse only; the exit status reports success or failure"),
		)
		.arg(
			Arg::new("query")
				.long("query")
				.value_name("PATH")
				.help("Print the value at a slash-separated path (tag/tag or tag/tag@attr)"),
		)
		.arg(
			Arg::new("filename")
				.index(1)
				.help("File to read; standard input when omitted"),
		)
		.get_matches();

	let doc = match matches.get_one::<String>("filename") {
		Some(filename) => Document::open(filename),
		None => Document::parse_reader("stdin", io::stdin().lock()),
	};
	let doc = match doc {
		Ok(doc) => doc,
		Err(e) => {
			eprintln!("minixml:error: {}", e);
			process::exit(1);
		}
	};

	if let Some(path) = matches.get_one::<String>("query") {
		match doc.query(path) {
			Some(value) => println!("{}", value),
			None => {
				eprintln!("minixml:error: nothing found at \"{}\".", path);
				process::exit(1);
			}
		}
	} else if !matches.get_flag("lint") {
		println!("{}", doc);
	}
}
