//! Caller-facing input specifications for create-or-reuse operations
//!
//! A spec carries the scalar fields of the node to create plus the
//! dependency specs supplied by the caller. Specs are plain data; all
//! validation happens in the builder.

use crate::graph::Point3;

/// Input for [`ModelBuilder::add_point`](super::ModelBuilder::add_point).
#[derive(Debug, Clone)]
pub struct PointSpec {
    pub id: String,
    pub name: String,
    pub at: Point3,
}

impl PointSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, at: Point3) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            at,
        }
    }
}

/// Input for [`ModelBuilder::add_material`](super::ModelBuilder::add_material).
#[derive(Debug, Clone)]
pub struct MaterialSpec {
    pub id: String,
    pub name: String,
    pub native_key: Option<String>,
    pub grade: Option<String>,
}

impl MaterialSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            grade: None,
        }
    }

    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }
}

/// Input for
/// [`ModelBuilder::add_cross_section`](super::ModelBuilder::add_cross_section).
#[derive(Debug, Clone)]
pub struct CrossSectionSpec {
    pub id: String,
    pub name: String,
    pub native_key: Option<String>,
    pub profile: Option<String>,
    /// Optional material dependency
    pub material: Option<MaterialSpec>,
}

impl CrossSectionSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            profile: None,
            material: None,
        }
    }

    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_material(mut self, material: MaterialSpec) -> Self {
        self.material = Some(material);
        self
    }
}

/// Input for [`ModelBuilder::add_storey`](super::ModelBuilder::add_storey).
#[derive(Debug, Clone)]
pub struct StoreySpec {
    pub id: String,
    pub name: String,
    pub native_key: Option<String>,
    pub elevation: Option<f64>,
}

impl StoreySpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            elevation: None,
        }
    }

    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }
}

/// Input for
/// [`ModelBuilder::add_connection_point`](super::ModelBuilder::add_connection_point).
#[derive(Debug, Clone)]
pub struct ConnectionPointSpec {
    pub id: String,
    pub name: String,
    /// Optional geometry dependency
    pub geometry: Option<PointSpec>,
}

impl ConnectionPointSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: PointSpec) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// Input for [`ModelBuilder::add_segment`](super::ModelBuilder::add_segment).
///
/// Begin and end points are required: a segment without endpoints is not
/// representable.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub id: String,
    pub name: String,
    pub native_key: Option<String>,
    pub begin: PointSpec,
    pub end: PointSpec,
}

impl SegmentSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        begin: PointSpec,
        end: PointSpec,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            begin,
            end,
        }
    }

    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }
}

/// Input for [`ModelBuilder::add_member`](super::ModelBuilder::add_member).
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub id: String,
    pub name: String,
    pub native_key: Option<String>,
    /// Member subtype (e.g. "beam", "column")
    pub role: Option<String>,
    pub material: Option<MaterialSpec>,
    pub cross_section: Option<CrossSectionSpec>,
    pub storey: Option<StoreySpec>,
    pub begin: Option<ConnectionPointSpec>,
    pub end: Option<ConnectionPointSpec>,
    /// Ordered curve segments
    pub segments: Vec<SegmentSpec>,
}

impl MemberSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            native_key: None,
            role: None,
            material: None,
            cross_section: None,
            storey: None,
            begin: None,
            end: None,
            segments: Vec::new(),
        }
    }

    pub fn with_native_key(mut self, key: impl Into<String>) -> Self {
        self.native_key = Some(key.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_material(mut self, material: MaterialSpec) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_cross_section(mut self, cross_section: CrossSectionSpec) -> Self {
        self.cross_section = Some(cross_section);
        self
    }

    pub fn with_storey(mut self, storey: StoreySpec) -> Self {
        self.storey = Some(storey);
        self
    }

    pub fn with_begin(mut self, begin: ConnectionPointSpec) -> Self {
        self.begin = Some(begin);
        self
    }

    pub fn with_end(mut self, end: ConnectionPointSpec) -> Self {
        self.end = Some(end);
        self
    }

    /// Append a segment; segments keep caller order.
    pub fn with_segment(mut self, segment: SegmentSpec) -> Self {
        self.segments.push(segment);
        self
    }
}
