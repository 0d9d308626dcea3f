pub mod campaigns;
pub mod cli;
pub mod lists;
pub mod users;
