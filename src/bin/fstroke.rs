// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::error::Error;
use std::fs;
use std::io::Read;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
//
use fstroke::codegen::Generator;
use fstroke::disassembler;
use fstroke::syntax::Parser;

fn main() {
    // Parse command-line arguments
    let matches = Command::new("fstroke")
        .about("F-Stroke Language Compiler")
        .version("0.1.0")
        .arg(arg!(--verbose "Show verbose output"))
        .arg(
            Arg::new("file")
                .required(true)
                .help("File to input with F-Stroke code (\"-\" for standard input)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .takes_value(true)
                .default_value("output.ebc")
                .help("File to output with Ethereum bytecode"),
        )
        .arg(
            Arg::new("hex-size")
                .long("hex-size")
                .takes_value(true)
                .default_value("32")
                .help("Size of hex numbers in bytes (max 32)"),
        )
        .arg(
            Arg::new("asm")
                .long("asm")
                .takes_value(true)
                .help("File to output with a readable disassembly"),
        )
        .get_matches();
    // Extract top-level flags
    let verbose = matches.is_present("verbose");
    // Initialise logging
    if verbose {
        init_logging(LevelFilter::Debug);
    }
    // Determine appropriate exit code
    let exitcode = match compile(&matches) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    };
    // Done
    std::process::exit(exitcode);
}

/// Compile a given file.
fn compile(args: &ArgMatches) -> Result<(), Box<dyn Error>> {
    // Extract the file to be compiled.
    let filename = args.get_one::<String>("file").unwrap();
    // Extract the address width.
    let width: usize = args.get_one::<String>("hex-size").unwrap().parse()?;
    // Read the source file (or standard input)
    let input = if filename == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(filename)?
    };
    // Parse source file
    let tree = Parser::new(&input)?.parse()?;
    // Lower the tree into bytecode
    let bytecode = Generator::new(width)?.generate(&tree)?;
    // Write out the final hex string
    fs::write(args.get_one::<String>("output").unwrap(), bytecode.to_hex_string())?;
    // Optionally write out the readable disassembly
    if let Some(asmfile) = args.get_one::<String>("asm") {
        fs::write(asmfile, disassembler::disassemble(&bytecode))?;
    }
    //
    Ok(())
}

/// Initialise logging using a suitable pattern.
pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    //
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(encoder))
        .build();
    //
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    //
    let _handle = log4rs::init_config(config).unwrap();
}
