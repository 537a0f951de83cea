pub mod duplex_channel;
pub mod inproc;
pub mod network;
