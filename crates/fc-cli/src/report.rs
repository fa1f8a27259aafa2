use std::io::{self, Write};

use fc_contrast::ContrastProfile;
use fc_core::RgbF;
use fc_session::ImageSession;
use serde::Serialize;

/// Multiplier applied to contrast values on output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Fraction,
    Percent,
}

impl Scale {
    pub fn factor(self) -> f64 {
        match self {
            Self::Fraction => 1.0,
            Self::Percent => 100.0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Fraction => "fraction",
            Self::Percent => "percent",
        }
    }
}

/// Writes `position,r,g,b` rows.
pub fn write_profile_csv(mut out: impl Write, profile: &ContrastProfile, scale: Scale) -> io::Result<()> {
    let k = scale.factor();
    writeln!(out, "position,r,g,b")?;
    for s in &profile.samples {
        writeln!(out, "{},{},{},{}", s.position, s.r * k, s.g * k, s.b * k)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct BackgroundDto {
    pub color: RgbF,
    pub vertices: usize,
    pub area: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinecutSummaryDto {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub width: u32,
    pub segments: usize,
    pub samples: usize,
    pub path_length: f64,
    pub csv: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaProfile {
    pub image_width: usize,
    pub image_height: usize,
    pub unit: &'static str,
    pub background: Option<BackgroundDto>,
    pub linecuts: Vec<LinecutSummaryDto>,
}

pub fn background_dto(session: &ImageSession) -> Option<BackgroundDto> {
    session.background().map(|bg| BackgroundDto {
        color: bg.color,
        vertices: bg.polygon.vertices().len(),
        area: bg.polygon.area(),
    })
}

/// CSV file name for the `index`-th line cut.
pub fn csv_name(index: usize) -> String {
    format!("linecut_{}.csv", index + 1)
}

pub fn summarize(session: &ImageSession, scale: Scale) -> MetaProfile {
    let linecuts = session
        .linecuts()
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let profile = l.profile();
            LinecutSummaryDto {
                id: l.id(),
                name: l.name.clone(),
                color: l.color.clone(),
                width: l.measurement.width(),
                segments: l.measurement.segments().len(),
                samples: profile.map_or(0, ContrastProfile::len),
                path_length: profile
                    .and_then(|p| p.samples.last())
                    .map_or(0.0, |s| s.position),
                csv: csv_name(i),
            }
        })
        .collect();

    MetaProfile {
        image_width: session.raster().width(),
        image_height: session.raster().height(),
        unit: scale.unit(),
        background: background_dto(session),
        linecuts,
    }
}
