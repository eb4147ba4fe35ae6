/// Reading simulation tasks and parameter overrides from JSON files
pub mod load_from_file;
