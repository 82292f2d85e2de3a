#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(
    // Allowed as they are too pedantic for this crate's scale.
    clippy::module_name_repetitions,
    clippy::cast_lossless,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate
)]
//! A real-time jitter buffer for reordering, depth-adapting, and NACKing RTP
//! media streams.
//!
//! This crate receives RTP packets that may arrive out of order, duplicated,
//! delayed, or with gaps, and hands them back in sequence, at a steady
//! cadence, to a caller-supplied decoder. It also tracks missing video
//! sequence numbers for NACK generation and grows or shrinks its depth based
//! on observed loss.
//!
//! Out of scope (left to the caller): RTP parsing/framing -- [`put_packet`]
//! expects an already-demuxed [`RtpHeader`] and payload -- session/channel
//! plumbing beyond the minimal [`MediaSession`] callback trait, and the
//! thread or task that decides when to call [`put_packet`]/[`get_packet`].
//!
//! [`put_packet`]: JitterBuffer::put_packet
//! [`get_packet`]: JitterBuffer::get_packet

mod buffer;
mod config;
mod constants;
mod depth;
mod error;
mod flags;
mod index;
mod nack;
mod node;
mod packet;
mod session;

pub use crate::{
    buffer::{FrameLens, FrameSnapshot, JitterBuffer, PeekLocator},
    config::{Config, JitterKind},
    error::{JitterError, Result},
    flags::JitterFlags,
    packet::{RtpHeader, RtpSequence, RtpTimestamp, StoredPacket},
    session::{MediaSession, NullSession},
};
