pub mod timer;
pub mod relay_client;
pub mod debouncer;
pub mod theme;
pub mod console;
