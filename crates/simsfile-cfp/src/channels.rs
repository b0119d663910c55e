//! Splitting a decoded stream into animation channels.

use std::io::Read;

use tracing::debug;

use crate::{read_compressed_floats, Error, Result};

/// Number of values in each channel.
///
/// CFP streams are not self-describing; the counts come from the animation
/// record that references the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelCounts {
    pub px: usize,
    pub py: usize,
    pub pz: usize,
    pub rw: usize,
    pub rx: usize,
    pub ry: usize,
    pub rz: usize,
}

impl ChannelCounts {
    /// Total number of values across all channels.
    pub fn total(&self) -> Result<usize> {
        [self.px, self.py, self.pz, self.rw, self.rx, self.ry, self.rz]
            .into_iter()
            .try_fold(0usize, usize::checked_add)
            .ok_or(Error::CountOverflow)
    }
}

/// Decoded translation and rotation channels.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AnimChannels {
    pub px: Vec<f32>,
    pub py: Vec<f32>,
    pub pz: Vec<f32>,
    pub rx: Vec<f32>,
    pub ry: Vec<f32>,
    pub rz: Vec<f32>,
    pub rw: Vec<f32>,
}

impl AnimChannels {
    /// The channels as `(px, py, pz, rx, ry, rz, rw)`.
    #[allow(clippy::type_complexity)]
    pub fn into_tuple(
        self,
    ) -> (
        Vec<f32>,
        Vec<f32>,
        Vec<f32>,
        Vec<f32>,
        Vec<f32>,
        Vec<f32>,
        Vec<f32>,
    ) {
        (self.px, self.py, self.pz, self.rx, self.ry, self.rz, self.rw)
    }
}

/// Decode all channels of one animation.
///
/// The stream holds the channels back to back in the order
/// `px, py, pz, rw, rx, ry, rz`.
pub fn read_anim_channels<R: Read + ?Sized>(reader: &mut R, counts: &ChannelCounts) -> Result<AnimChannels> {
    let values = read_compressed_floats(reader, counts.total()?)?;
    debug!(values = values.len(), "decoded animation channels");

    let mut rest = values.as_slice();
    let mut take = |n: usize| {
        let (head, tail) = rest.split_at(n);
        rest = tail;
        head.to_vec()
    };

    let px = take(counts.px);
    let py = take(counts.py);
    let pz = take(counts.pz);
    let rw = take(counts.rw);
    let rx = take(counts.rx);
    let ry = take(counts.ry);
    let rz = take(counts.rz);

    Ok(AnimChannels {
        px,
        py,
        pz,
        rx,
        ry,
        rz,
        rw,
    })
}
