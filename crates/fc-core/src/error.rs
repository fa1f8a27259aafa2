use core::fmt;

use crate::color::Channel;

/// Reason a piece of annotation geometry was rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryIssue {
    TooFewVertices { min: usize, actual: usize },
    NonFiniteCoordinate,
    ZeroWidth,
    NotChained { index: usize },
    MixedWidths,
    EmptyMeasurement,
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices { min, actual } => {
                write!(f, "need at least {min} points, got {actual}")
            }
            Self::NonFiniteCoordinate => write!(f, "coordinate is not finite"),
            Self::ZeroWidth => write!(f, "width must be at least 1 pixel"),
            Self::NotChained { index } => {
                write!(
                    f,
                    "segment {index} does not start where segment {} ends",
                    index.saturating_sub(1)
                )
            }
            Self::MixedWidths => write!(f, "segments of one measurement must share a width"),
            Self::EmptyMeasurement => write!(f, "measurement has no segments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    EmptyRegion,
    NoBackgroundDefined,
    InvalidGeometry(GeometryIssue),
    DivisionByZero {
        channel: Channel,
    },
    UnknownMeasurement {
        id: u32,
    },
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "pixel ({x}, {y}) out of bounds for {width}x{height} raster"),
            Self::EmptyRegion => write!(f, "polygon covers no raster pixels"),
            Self::NoBackgroundDefined => write!(f, "no background color defined"),
            Self::InvalidGeometry(issue) => write!(f, "invalid geometry: {issue}"),
            Self::DivisionByZero { channel } => {
                write!(f, "background {channel} channel is zero")
            }
            Self::UnknownMeasurement { id } => write!(f, "unknown measurement id {id}"),
            Self::InvalidTransition { state, action } => {
                write!(f, "cannot {action} while {state}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<GeometryIssue> for Error {
    fn from(issue: GeometryIssue) -> Self {
        Self::InvalidGeometry(issue)
    }
}
