//! Game rules for a small arcade space shooter.
//!
//! The library never touches the terminal: drawing goes through
//! [`sprite::Canvas`], sound through [`audio::SoundSink`], and randomness is
//! passed in by the caller.

pub mod audio;
pub mod collision;
pub mod config;
pub mod entities;
pub mod error;
pub mod player;
pub mod sprite;

pub use player::PlayerEntity;
