mod contacts;
mod dock;

use contacts::run_contacts;
use dock::run_dock;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Dock(args) => run_dock(args, ctx),
        Command::Contacts(args) => run_contacts(args, ctx),
    }
}
