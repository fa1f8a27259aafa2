use fc_contrast::ContrastConfig;
use fc_core::{Error, Point2f, RgbImage};
use fc_raster::Polygon;
use fc_session::ImageSession;
use serde::{Deserialize, Serialize};

/// Background region as written in an annotation file: either an explicit
/// vertex list or two opposite rectangle corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundSpec {
    Polygon { polygon: Polygon },
    Corners { corners: [Point2f; 2] },
}

impl BackgroundSpec {
    pub fn to_polygon(&self) -> Result<Polygon, Error> {
        match self {
            Self::Polygon { polygon } => Ok(polygon.clone()),
            Self::Corners { corners } => Polygon::from_corners(corners[0], corners[1]),
        }
    }
}

fn default_width() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinecutSpec {
    pub points: Vec<Point2f>,
    #[serde(default = "default_width")]
    pub width: u32,
}

/// Image-space annotations for one captured image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    pub background: Option<BackgroundSpec>,
    #[serde(default)]
    pub linecuts: Vec<LinecutSpec>,
    #[serde(default)]
    pub config: ContrastConfig,
}

impl Annotations {
    /// Builds a session on `raster`: background first, then every line cut in
    /// file order.
    pub fn apply(&self, raster: RgbImage) -> Result<ImageSession, Error> {
        let mut session = ImageSession::new(raster, self.config.clone());
        if let Some(bg) = &self.background {
            session.set_background(bg.to_polygon()?)?;
        }
        for cut in &self.linecuts {
            session.add_linecut(&cut.points, cut.width)?;
        }
        Ok(session)
    }
}
