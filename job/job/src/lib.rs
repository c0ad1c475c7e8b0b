pub mod board_location;
pub mod job;
pub mod placement;
pub mod readiness;

#[cfg(test)]
mod tests;
