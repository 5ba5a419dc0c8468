use clap::{arg,crate_version,value_parser,Command};
use chunkflate::{block,Options,STD_OPTIONS};

const RCH: &str = "unreachable was reached";

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::init();
    let long_help =
"Examples:
---------
Compress:      `chunkflate compress -i my_file -o my_file.cfl`
Expand:        `chunkflate expand -i my_file.cfl -o my_file`

The same window and chunk sizes must be given on both sides.";

    let mut main_cmd = Command::new("chunkflate")
        .about("Compress and expand with a DEFLATE-like chunked format")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("compress")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(-w --window <SIZE> "sliding window size in bytes")
            .value_parser(value_parser!(usize)).default_value("32768"))
        .arg(arg!(-c --chunk <SIZE> "chunk size in bytes")
            .value_parser(value_parser!(usize)).default_value("1024"))
        .about("compress a file"));

    main_cmd = main_cmd.subcommand(Command::new("expand")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(-w --window <SIZE> "sliding window size in bytes")
            .value_parser(value_parser!(usize)).default_value("32768"))
        .arg(arg!(-c --chunk <SIZE> "chunk size in bytes")
            .value_parser(value_parser!(usize)).default_value("1024"))
        .about("expand a file"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opts = Options {
            window_size: *cmd.get_one::<usize>("window").expect(RCH),
            chunk_size: *cmd.get_one::<usize>("chunk").expect(RCH),
            ..STD_OPTIONS
        };
        let dat = std::fs::read(path_in)?;
        let compressed = block::compress(&dat,&opts)?;
        std::fs::write(path_out,compressed)?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opts = Options {
            window_size: *cmd.get_one::<usize>("window").expect(RCH),
            chunk_size: *cmd.get_one::<usize>("chunk").expect(RCH),
            ..STD_OPTIONS
        };
        let dat = std::fs::read(path_in)?;
        let expanded = block::expand(&dat,&opts)?;
        std::fs::write(path_out,expanded)?;
    }

    Ok(())
}
