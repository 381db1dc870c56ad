mod contacts;
mod docking;

pub use contacts::ContactsConfig;
pub use docking::{DockingConfig, DockingTools, FlexResidues, GridBox, SearchParams};
