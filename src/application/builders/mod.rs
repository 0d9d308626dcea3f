pub mod request_builder;
pub mod update_builder;
