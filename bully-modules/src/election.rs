pub mod fixed_election_timer;
pub mod randomized_election_timer;
