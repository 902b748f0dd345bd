pub mod json_file;
pub mod listing_cache;
pub mod reference_cache;
pub mod trace_repo;
