//! Port implementations: live (real I/O), recording (live plus cassette
//! capture) and replaying (cassette playback).

pub mod live;
pub mod recording;
pub mod replaying;
