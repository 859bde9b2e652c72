// Service module exports

pub mod date_source;
pub mod layout;
pub mod paging;
pub mod settings;
