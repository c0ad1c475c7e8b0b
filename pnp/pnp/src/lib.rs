pub mod board;
pub mod feeder;
pub mod location;
pub mod machine;
pub mod part;
pub mod placement;
