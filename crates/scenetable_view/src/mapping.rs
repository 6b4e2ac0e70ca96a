//! Render mappings: how record attributes become scene-node properties.
//!
//! A mapping names the geometry, material and mesh kinds used for a record
//! type and lists property bindings. A binding either copies an attribute
//! or derives a value from several attributes (position from `x, y, z`,
//! hex colors, wireframe vertices).

use std::collections::HashMap;

use scenetable_foundation::{Color, Value};
use scenetable_storage::{Record, ShapeKind};

/// Opacity above which a material is treated as opaque.
const OPAQUE_THRESHOLD: f64 = 0.999;

/// The scene object a property belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    /// Geometry (shape and vertices).
    Geometry,
    /// Material (color, opacity, line width).
    Material,
    /// Mesh (placement).
    Mesh,
}

/// A value computed from one or more attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum Derivation {
    /// `[x, y, z]` from the position attributes.
    Position,
    /// `#rrggbb` of a color attribute.
    Hex(String),
    /// True when a transparency attribute is below full opacity.
    Transparent(String),
    /// The 24 edge endpoints of the box spanned by `a`, `b`, `c` at the position.
    BoxVertices,
    /// The endpoints `start` and `end`.
    LineVertices,
    /// A color attribute's hex string, repeated once per vertex.
    VertexColors {
        /// Color attribute.
        attribute: String,
        /// Number of vertices.
        count: usize,
    },
}

impl Derivation {
    /// Attributes this derivation reads.
    #[must_use]
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Position => vec!["x", "y", "z"],
            Self::Hex(attribute)
            | Self::Transparent(attribute)
            | Self::VertexColors { attribute, .. } => vec![attribute.as_str()],
            Self::BoxVertices => vec!["x", "y", "z", "a", "b", "c"],
            Self::LineVertices => vec!["start", "end"],
        }
    }

    /// Computes the value, or `None` if an input is absent or malformed.
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> Option<Value> {
        match self {
            Self::Position => position(record).map(Value::Vec3),
            Self::Hex(attribute) => hex(record, attribute).map(Value::from),
            Self::Transparent(attribute) => {
                let opacity = record.get(attribute).ok()?.as_number()?;
                Some(Value::Bool(opacity <= OPAQUE_THRESHOLD))
            }
            Self::BoxVertices => {
                let o = position(record)?;
                let a = vector(record, "a")?;
                let b = vector(record, "b")?;
                let c = vector(record, "c")?;
                Some(box_vertices(o, a, b, c))
            }
            Self::LineVertices => {
                let start = vector(record, "start")?;
                let end = vector(record, "end")?;
                Some(Value::List([Value::Vec3(start), Value::Vec3(end)].into_iter().collect()))
            }
            Self::VertexColors { attribute, count } => {
                let hex = hex(record, attribute)?;
                Some(Value::List(
                    std::iter::repeat_n(Value::from(hex), *count).collect(),
                ))
            }
        }
    }
}

fn position(record: &Record) -> Option<[f64; 3]> {
    let coordinate = |name: &str| record.get(name).ok().and_then(Value::as_number);
    Some([coordinate("x")?, coordinate("y")?, coordinate("z")?])
}

fn vector(record: &Record, name: &str) -> Option<[f64; 3]> {
    record.get(name).ok()?.as_vec3()
}

fn hex(record: &Record, name: &str) -> Option<String> {
    Color::parse_value(record.get(name).ok()?).map(|c| c.to_hex())
}

fn add(u: [f64; 3], v: [f64; 3]) -> [f64; 3] {
    [u[0] + v[0], u[1] + v[1], u[2] + v[2]]
}

fn box_vertices(o: [f64; 3], a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Value {
    let oa = add(o, a);
    let ob = add(o, b);
    let oc = add(o, c);
    let oab = add(oa, b);
    let oac = add(oa, c);
    let obc = add(ob, c);
    let oabc = add(oab, c);
    let edges = [
        (o, oa),
        (o, ob),
        (o, oc),
        (ob, oab),
        (ob, obc),
        (oa, oab),
        (oa, oac),
        (oc, oac),
        (oc, obc),
        (oabc, obc),
        (oabc, oab),
        (oabc, oac),
    ];
    Value::List(
        edges
            .into_iter()
            .flat_map(|(from, to)| [Value::Vec3(from), Value::Vec3(to)])
            .collect(),
    )
}

/// Where a property's value comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Copied from an attribute.
    Attribute(String),
    /// Computed from attributes.
    Derived(Derivation),
}

/// One property binding.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyMap {
    /// Object holding the property.
    pub part: Part,
    /// Property name.
    pub property: String,
    /// Value source.
    pub source: Source,
}

impl PropertyMap {
    /// Returns true if the property must be recomputed when `attribute` changes.
    #[must_use]
    pub fn depends_on(&self, attribute: &str) -> bool {
        match &self.source {
            Source::Attribute(name) => name == attribute,
            Source::Derived(derivation) => derivation.inputs().contains(&attribute),
        }
    }

    /// Computes the property value for `record`.
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> Option<Value> {
        match &self.source {
            Source::Attribute(name) => record.get(name).ok().cloned(),
            Source::Derived(derivation) => derivation.evaluate(record),
        }
    }
}

/// Height of a record's label sprite.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelHeight {
    /// Taken from an attribute (e.g. a sphere's radius).
    Attribute(String),
    /// Constant.
    Fixed(f64),
}

/// How records of one type are rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMapping {
    /// Geometry kind (e.g. `SphereGeometry`).
    pub geometry: String,
    /// Material kind (e.g. `LambertMaterial`).
    pub material: String,
    /// Mesh kind (e.g. `Mesh`, `Line`).
    pub mesh: String,
    /// Constant properties.
    pub constants: Vec<(Part, String, Value)>,
    /// Attribute-bound properties.
    pub properties: Vec<PropertyMap>,
    /// Whether records of this type get a label node.
    pub show_label: bool,
    /// Label height.
    pub label_height: LabelHeight,
}

impl RenderMapping {
    /// Creates a mapping with no bindings and no label.
    #[must_use]
    pub fn new(
        geometry: impl Into<String>,
        material: impl Into<String>,
        mesh: impl Into<String>,
    ) -> Self {
        Self {
            geometry: geometry.into(),
            material: material.into(),
            mesh: mesh.into(),
            constants: Vec::new(),
            properties: Vec::new(),
            show_label: false,
            label_height: LabelHeight::Fixed(1.0),
        }
    }

    /// Adds a constant property.
    #[must_use]
    pub fn constant(mut self, part: Part, property: &str, value: impl Into<Value>) -> Self {
        self.constants.push((part, property.to_string(), value.into()));
        self
    }

    /// Binds a property to an attribute.
    #[must_use]
    pub fn direct(mut self, part: Part, property: &str, attribute: &str) -> Self {
        self.properties.push(PropertyMap {
            part,
            property: property.to_string(),
            source: Source::Attribute(attribute.to_string()),
        });
        self
    }

    /// Binds a property to a derivation.
    #[must_use]
    pub fn derived(mut self, part: Part, property: &str, derivation: Derivation) -> Self {
        self.properties.push(PropertyMap {
            part,
            property: property.to_string(),
            source: Source::Derived(derivation),
        });
        self
    }

    /// Enables labels with the given height.
    #[must_use]
    pub fn with_label(mut self, height: LabelHeight) -> Self {
        self.show_label = true;
        self.label_height = height;
        self
    }

    fn line_material(self) -> Self {
        self.constant(Part::Material, "vertexColors", "VertexColors")
            .constant(Part::Mesh, "type", "LinePieces")
            .direct(Part::Material, "visible", "visible")
            .direct(Part::Material, "opacity", "transparency")
            .direct(Part::Material, "linewidth", "linewidth")
            .derived(
                Part::Material,
                "transparent",
                Derivation::Transparent("transparency".into()),
            )
    }
}

/// Render mappings keyed by type tag.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingTable {
    mappings: HashMap<String, RenderMapping>,
}

impl MappingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Adds or replaces the mapping for `type_tag`.
    #[must_use]
    pub fn with(mut self, type_tag: impl Into<String>, mapping: RenderMapping) -> Self {
        self.mappings.insert(type_tag.into(), mapping);
        self
    }

    /// Looks up the mapping of a canonical type tag.
    #[must_use]
    pub fn get(&self, type_tag: &str) -> Option<&RenderMapping> {
        self.mappings.get(type_tag)
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        let sphere = RenderMapping::new("SphereGeometry", "LambertMaterial", "Mesh")
            .direct(Part::Geometry, "radius", "radius")
            .direct(Part::Material, "visible", "visible")
            .direct(Part::Material, "opacity", "transparency")
            .derived(
                Part::Material,
                "transparent",
                Derivation::Transparent("transparency".into()),
            )
            .derived(Part::Material, "color", Derivation::Hex("color".into()))
            .derived(Part::Mesh, "position", Derivation::Position)
            .with_label(LabelHeight::Attribute("radius".into()));

        let wirebox = RenderMapping::new("PlainGeometry", "LineBasicMaterial", "Line")
            .derived(Part::Geometry, "vertices", Derivation::BoxVertices)
            .derived(
                Part::Geometry,
                "colors",
                Derivation::VertexColors {
                    attribute: "color".into(),
                    count: 24,
                },
            )
            .line_material();

        let line = RenderMapping::new("PlainGeometry", "LineBasicMaterial", "Line")
            .derived(Part::Geometry, "vertices", Derivation::LineVertices)
            .derived(
                Part::Geometry,
                "colors",
                Derivation::VertexColors {
                    attribute: "color".into(),
                    count: 2,
                },
            )
            .line_material();

        Self::empty()
            .with(ShapeKind::Sphere.type_tag(), sphere)
            .with(ShapeKind::WireBox.type_tag(), wirebox)
            .with(ShapeKind::Line.type_tag(), line)
    }
}
