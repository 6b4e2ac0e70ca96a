//! Shape schemas: the declared attributes of each record type.
//!
//! A schema lists every attribute a record of that type carries, with its
//! type and default. Schemas extend one another by copying the parent's
//! attributes, so each schema is flat and self-contained.

use scenetable_foundation::{AttrType, Color, Value};

/// Declaration of a single attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSchema {
    /// Attribute name.
    pub name: String,
    /// Type and domain of accepted values.
    pub ty: AttrType,
    /// Value given to new records.
    pub default: Value,
    /// Short human-readable description.
    pub help: String,
}

impl AttributeSchema {
    /// Creates an attribute declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AttrType, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            default: default.into(),
            help: String::new(),
        }
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }
}

/// Schema of one record type.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSchema {
    /// Canonical, fully qualified type tag (e.g. `scenetable.shapes.Sphere`).
    pub type_tag: String,
    /// Short name, also accepted as a tag alias (e.g. `Sphere`).
    pub name: String,
    /// Type tag of the schema this one extends.
    pub parent: Option<String>,
    /// Ancestor type tags, nearest first.
    ancestors: Vec<String>,
    /// Declared attributes in order.
    attributes: Vec<AttributeSchema>,
}

impl ShapeSchema {
    /// Creates a root schema with no attributes.
    #[must_use]
    pub fn new(type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            name: name.into(),
            parent: None,
            ancestors: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Creates a schema inheriting every attribute of `base`.
    #[must_use]
    pub fn extend(base: &ShapeSchema, type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        let mut ancestors = Vec::with_capacity(base.ancestors.len() + 1);
        ancestors.push(base.type_tag.clone());
        ancestors.extend(base.ancestors.iter().cloned());
        Self {
            type_tag: type_tag.into(),
            name: name.into(),
            parent: Some(base.type_tag.clone()),
            ancestors,
            attributes: base.attributes.clone(),
        }
    }

    /// Adds an attribute; redeclaring an existing name replaces it in place.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSchema) -> Self {
        match self.index_of(&attribute.name) {
            Some(index) => self.attributes[index] = attribute,
            None => self.attributes.push(attribute),
        }
        self
    }

    /// Returns the attribute declaration by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Returns the position of an attribute.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Declared attributes in order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    /// Returns true if this schema is `tag` or extends it.
    ///
    /// Accepts canonical tags, and the short name of this schema itself.
    #[must_use]
    pub fn is_a(&self, tag: &str) -> bool {
        self.type_tag == tag || self.name == tag || self.ancestors.iter().any(|a| a == tag)
    }

    /// Default attribute values in declaration order.
    pub fn defaults(&self) -> impl Iterator<Item = &Value> {
        self.attributes.iter().map(|a| &a.default)
    }
}

/// The built-in shape types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Base type: position, visibility, color, transparency, and label.
    Geometric,
    /// Sphere centred on the position.
    Sphere,
    /// Wireframe parallelepiped spanned by three vectors.
    WireBox,
    /// Straight line segment.
    Line,
}

impl ShapeKind {
    /// Every built-in kind, base first.
    pub const ALL: [ShapeKind; 4] = [Self::Geometric, Self::Sphere, Self::WireBox, Self::Line];

    /// Canonical type tag.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::Geometric => "scenetable.shapes.GeometricObject",
            Self::Sphere => "scenetable.shapes.Sphere",
            Self::WireBox => "scenetable.shapes.WireBox",
            Self::Line => "scenetable.shapes.Line",
        }
    }

    /// Short name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Geometric => "GeometricObject",
            Self::Sphere => "Sphere",
            Self::WireBox => "WireBox",
            Self::Line => "Line",
        }
    }

    /// Builds the schema for this kind.
    #[must_use]
    pub fn schema(self) -> ShapeSchema {
        match self {
            Self::Geometric => geometric(),
            Self::Sphere => ShapeSchema::extend(&geometric(), self.type_tag(), self.name())
                .with_attribute(
                    AttributeSchema::new("radius", AttrType::non_negative(), 1.0)
                        .with_help("sphere radius"),
                ),
            Self::WireBox => ShapeSchema::extend(&geometric(), self.type_tag(), self.name())
                .with_attribute(
                    AttributeSchema::new("a", AttrType::Vec3, [1.0, 0.0, 0.0])
                        .with_help("box vector a"),
                )
                .with_attribute(
                    AttributeSchema::new("b", AttrType::Vec3, [0.0, 1.0, 0.0])
                        .with_help("box vector b"),
                )
                .with_attribute(
                    AttributeSchema::new("c", AttrType::Vec3, [0.0, 0.0, 1.0])
                        .with_help("box vector c"),
                )
                .with_attribute(AttributeSchema::new("linewidth", AttrType::float(), 1.0)),
            Self::Line => ShapeSchema::extend(&geometric(), self.type_tag(), self.name())
                .with_attribute(
                    AttributeSchema::new("start", AttrType::Vec3, [0.0, 0.0, 0.0])
                        .with_help("line start"),
                )
                .with_attribute(
                    AttributeSchema::new("end", AttrType::Vec3, [1.0, 1.0, 1.0])
                        .with_help("line end"),
                )
                .with_attribute(AttributeSchema::new("linewidth", AttrType::float(), 1.0)),
        }
    }
}

fn geometric() -> ShapeSchema {
    let kind = ShapeKind::Geometric;
    ShapeSchema::new(kind.type_tag(), kind.name())
        .with_attribute(AttributeSchema::new("x", AttrType::float(), 0.0).with_help("x position"))
        .with_attribute(AttributeSchema::new("y", AttrType::float(), 0.0).with_help("y position"))
        .with_attribute(AttributeSchema::new("z", AttrType::float(), 0.0).with_help("z position"))
        .with_attribute(AttributeSchema::new("visible", AttrType::Bool, true))
        .with_attribute(AttributeSchema::new("color", AttrType::Color, Color::red()))
        .with_attribute(
            AttributeSchema::new("transparency", AttrType::bounded(0.0, 1.0), 1.0)
                .with_help("1 is opaque, 0 is invisible"),
        )
        .with_attribute(AttributeSchema::new("label", AttrType::String, "-"))
        .with_attribute(AttributeSchema::new("label_visible", AttrType::Bool, false))
        .with_attribute(AttributeSchema::new("label_color", AttrType::Color, Color::red()))
        .with_attribute(AttributeSchema::new(
            "label_transparency",
            AttrType::bounded(0.0, 1.0),
            1.0,
        ))
}
