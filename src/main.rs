mod catalog;
mod cli;
mod codec;
mod config;
mod midi;
mod store;
mod sysex;
mod table;
mod tui;

use clap::Parser;
use cli::{Cli, Command};
use store::Store;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    config::init();

    let table_path = cli.table.unwrap_or_else(config::table_path);
    let store = Store::new(table_path);

    match cli.command {
        None => tui::run(store),
        Some(Command::Ports) => midi::list_outputs(),
        Some(Command::Show) => {
            let table = store.load();
            println!("{}", codec::encode(&table));
            Ok(())
        }
        Some(Command::Send(args)) => {
            let table = store.load();
            let bytes = sysex::pack(&table);
            let port_filter = args.port.as_deref().or(config::midi_port());
            let name = midi::send(&bytes, port_filter)?;
            println!("Sent {} bytes to {name}", bytes.len());
            Ok(())
        }
        Some(Command::Reset) => {
            let table = table::Table::default();
            store.save(&table)?;
            println!("Wrote factory map to {}", store.path().display());
            Ok(())
        }
    }
}
