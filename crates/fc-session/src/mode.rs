use fc_core::{Error, GeometryIssue, Point2f};
use fc_raster::Polygon;

/// Annotation finished by the drawing front end, ready to hand to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Completed {
    Background(Polygon),
    Linecut { points: Vec<Point2f>, width: u32 },
}

/// Drawing-mode state machine of an annotation front end.
///
/// `Idle -> DefiningBackground -> Idle -> DefiningLinecut -> Idle`. A line cut
/// can only be started once the image has a background.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawingMode {
    #[default]
    Idle,
    DefiningBackground {
        vertices: Vec<Point2f>,
    },
    DefiningLinecut {
        points: Vec<Point2f>,
        width: u32,
    },
}

impl DrawingMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DefiningBackground { .. } => "defining background",
            Self::DefiningLinecut { .. } => "defining linecut",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn begin_background(&mut self) -> Result<(), Error> {
        self.require_idle("start a background")?;
        *self = Self::DefiningBackground {
            vertices: Vec::new(),
        };
        Ok(())
    }

    pub fn begin_linecut(&mut self, width: u32, has_background: bool) -> Result<(), Error> {
        self.require_idle("start a linecut")?;
        if !has_background {
            return Err(Error::NoBackgroundDefined);
        }
        if width == 0 {
            return Err(GeometryIssue::ZeroWidth.into());
        }
        *self = Self::DefiningLinecut {
            points: Vec::new(),
            width,
        };
        Ok(())
    }

    pub fn push_point(&mut self, p: Point2f) -> Result<(), Error> {
        match self {
            Self::Idle => Err(Error::InvalidTransition {
                state: self.name(),
                action: "add a point",
            }),
            Self::DefiningBackground { vertices } => {
                vertices.push(p);
                Ok(())
            }
            Self::DefiningLinecut { points, .. } => {
                points.push(p);
                Ok(())
            }
        }
    }

    /// Completes the current annotation and returns to `Idle`, also when the
    /// annotation turns out to be invalid.
    ///
    /// A background with exactly two points is read as opposite rectangle
    /// corners.
    pub fn finish(&mut self) -> Result<Completed, Error> {
        match std::mem::take(self) {
            Self::Idle => Err(Error::InvalidTransition {
                state: "idle",
                action: "finish",
            }),
            Self::DefiningBackground { vertices } => {
                let polygon = if vertices.len() == 2 {
                    Polygon::from_corners(vertices[0], vertices[1])?
                } else {
                    Polygon::new(vertices)?
                };
                Ok(Completed::Background(polygon))
            }
            Self::DefiningLinecut { points, width } => {
                if points.len() < 2 {
                    return Err(GeometryIssue::TooFewVertices {
                        min: 2,
                        actual: points.len(),
                    }
                    .into());
                }
                Ok(Completed::Linecut { points, width })
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    fn require_idle(&self, action: &'static str) -> Result<(), Error> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                state: self.name(),
                action,
            })
        }
    }
}
