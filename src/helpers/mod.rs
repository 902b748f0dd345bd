pub mod console;
pub mod map;
pub mod trace_view;

#[cfg(test)]
pub mod test_server;
