//! Compressed float (CFP) stream decoder for The Sims animation data.
//!
//! A CFP stream is a sequence of opcodes. Each opcode emits one value (a raw
//! `f32`, or a small delta from the previous value) or repeats the previous
//! value. Streams carry no header; the caller supplies how many values to
//! decode.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use simsfile_cfp::{read_anim_channels, ChannelCounts};
//!
//! let mut file = BufReader::new(File::open("animations/a2o-walk.cfp")?);
//! let counts = ChannelCounts { px: 40, py: 40, pz: 40, rw: 40, rx: 40, ry: 40, rz: 40 };
//!
//! let channels = read_anim_channels(&mut file, &counts)?;
//! println!("first rotation: {} {} {} {}", channels.rx[0], channels.ry[0], channels.rz[0], channels.rw[0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod channels;
pub mod decode;
mod error;

pub use channels::{read_anim_channels, AnimChannels, ChannelCounts};
pub use decode::read_compressed_floats;
pub use error::{Error, Result};
