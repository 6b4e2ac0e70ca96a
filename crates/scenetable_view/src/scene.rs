//! A scene-graph mirror kept in sync with a collection.
//!
//! [`SceneMirror::attach`] subscribes to a collection's structural and
//! attribute events. Added records get a node (and, optionally, a label)
//! built from their type's [`RenderMapping`]; removed records lose theirs;
//! attribute changes recompute only the properties that read the changed
//! attribute. Records of unmapped types are listed in [`Scene::unmapped`].

use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use scenetable_foundation::{Color, RecordId, Value};
use scenetable_storage::{
    AttributeChange, AttributeFilter, Collection, Record, StructuralChange, SubscriptionId,
};
use tracing::{debug, warn};

use crate::mapping::{LabelHeight, MappingTable, Part, RenderMapping};

const OPAQUE_THRESHOLD: f64 = 0.999;

/// A typed bag of properties (a geometry, material or mesh).
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Component kind, e.g. `SphereGeometry`.
    pub kind: String,
    /// Property values by name.
    pub properties: BTreeMap<String, Value>,
}

impl Component {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Looks up a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// The renderable counterpart of one record.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Id of the mirrored record.
    pub id: RecordId,
    /// Type tag of the mirrored record.
    pub type_tag: String,
    /// Geometry.
    pub geometry: Component,
    /// Material.
    pub material: Component,
    /// Mesh (placement) properties.
    pub mesh: Component,
}

impl SceneNode {
    fn build(record: &Record, mapping: &RenderMapping) -> Self {
        let mut node = Self {
            id: record.id().clone(),
            type_tag: record.type_tag().to_string(),
            geometry: Component::new(&mapping.geometry),
            material: Component::new(&mapping.material),
            mesh: Component::new(&mapping.mesh),
        };
        for (part, property, value) in &mapping.constants {
            node.part_mut(*part)
                .properties
                .insert(property.clone(), value.clone());
        }
        for binding in &mapping.properties {
            if let Some(value) = binding.evaluate(record) {
                node.part_mut(binding.part)
                    .properties
                    .insert(binding.property.clone(), value);
            }
        }
        node
    }

    fn refresh(&mut self, record: &Record, mapping: &RenderMapping, attribute: &str) {
        for binding in mapping.properties.iter().filter(|b| b.depends_on(attribute)) {
            let properties = &mut self.part_mut(binding.part).properties;
            match binding.evaluate(record) {
                Some(value) => properties.insert(binding.property.clone(), value),
                None => properties.remove(&binding.property),
            };
        }
    }

    /// The component holding properties of `part`.
    #[must_use]
    pub fn part(&self, part: Part) -> &Component {
        match part {
            Part::Geometry => &self.geometry,
            Part::Material => &self.material,
            Part::Mesh => &self.mesh,
        }
    }

    fn part_mut(&mut self, part: Part) -> &mut Component {
        match part {
            Part::Geometry => &mut self.geometry,
            Part::Material => &mut self.material,
            Part::Mesh => &mut self.mesh,
        }
    }
}

/// A text sprite placed at a record's position.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelNode {
    /// Id of the labelled record.
    pub id: RecordId,
    /// Text.
    pub text: String,
    /// `#rrggbb` text color.
    pub color: String,
    /// Opacity.
    pub opacity: f64,
    /// True below full opacity.
    pub transparent: bool,
    /// Visibility.
    pub visible: bool,
    /// Sprite position.
    pub position: [f64; 3],
    /// Sprite scale; the height is the middle component.
    pub scale: [f64; 3],
}

impl LabelNode {
    fn build(record: &Record, height: &LabelHeight) -> Self {
        let number = |name: &str| record.get(name).ok().and_then(Value::as_number);
        let opacity = number("label_transparency").unwrap_or(1.0);
        let height = match height {
            LabelHeight::Attribute(name) => number(name).unwrap_or(1.0),
            LabelHeight::Fixed(h) => *h,
        };
        Self {
            id: record.id().clone(),
            text: record
                .get("label")
                .ok()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            color: record
                .get("label_color")
                .ok()
                .and_then(Color::parse_value)
                .unwrap_or_else(Color::red)
                .to_hex(),
            opacity,
            transparent: opacity <= OPAQUE_THRESHOLD,
            visible: record
                .get("label_visible")
                .ok()
                .and_then(Value::as_bool)
                .unwrap_or(false),
            position: [
                number("x").unwrap_or(0.0),
                number("y").unwrap_or(0.0),
                number("z").unwrap_or(0.0),
            ],
            scale: [1.0, height, 1.0],
        }
    }
}

/// What a mirror creates for each record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneOptions {
    /// Create object nodes.
    pub objects: bool,
    /// Create label nodes for types whose mapping shows labels.
    pub labels: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            objects: true,
            labels: false,
        }
    }
}

impl SceneOptions {
    /// Objects only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables object nodes.
    #[must_use]
    pub const fn with_objects(mut self, objects: bool) -> Self {
        self.objects = objects;
        self
    }

    /// Enables or disables label nodes.
    #[must_use]
    pub const fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }
}

/// The mirrored scene.
///
/// Nodes are ordered newest first: each commit places its added records'
/// nodes ahead of the existing ones.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    labels: Vec<LabelNode>,
    records: HashMap<RecordId, Record>,
    unmapped: Vec<RecordId>,
}

impl Scene {
    /// Object nodes, newest first.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Label nodes, newest first.
    #[must_use]
    pub fn labels(&self) -> &[LabelNode] {
        &self.labels
    }

    /// The node of one record.
    #[must_use]
    pub fn node(&self, id: &RecordId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// The label of one record.
    #[must_use]
    pub fn label(&self, id: &RecordId) -> Option<&LabelNode> {
        self.labels.iter().find(|l| l.id == *id)
    }

    /// Ids of records whose type has no mapping.
    #[must_use]
    pub fn unmapped(&self) -> &[RecordId] {
        &self.unmapped
    }

    /// Number of object nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no object nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn on_structure(&mut self, change: &StructuralChange, mappings: &MappingTable, options: SceneOptions) {
        for record in &change.removed {
            self.records.remove(record.id());
            self.unmapped.retain(|id| id != record.id());
        }
        let removed = |id: &RecordId| change.removed.iter().any(|r| r.id() == id);
        self.nodes.retain(|n| !removed(&n.id));
        self.labels.retain(|l| !removed(&l.id));

        let mut nodes = Vec::new();
        let mut labels = Vec::new();
        for record in &change.added {
            let Some(mapping) = mappings.get(record.type_tag()) else {
                warn!(id = %record.id(), type_tag = record.type_tag(), "no render mapping");
                self.unmapped.push(record.id().clone());
                continue;
            };
            if options.objects {
                nodes.push(SceneNode::build(record, mapping));
            }
            if options.labels && mapping.show_label {
                labels.push(LabelNode::build(record, &mapping.label_height));
            }
            self.records.insert(record.id().clone(), record.clone());
        }
        nodes.append(&mut self.nodes);
        labels.append(&mut self.labels);
        self.nodes = nodes;
        self.labels = labels;
        debug!(
            added = change.added.len(),
            removed = change.removed.len(),
            nodes = self.nodes.len(),
            "scene updated"
        );
    }

    fn on_attribute(&mut self, change: &AttributeChange, mappings: &MappingTable) {
        let Some(record) = self.records.get_mut(&change.id) else {
            return;
        };
        if let Err(e) = record.set(&change.attribute, change.new.clone()) {
            warn!(id = %change.id, attribute = %change.attribute, error = %e, "scene copy rejected change");
            return;
        }
        let Some(mapping) = mappings.get(record.type_tag()) else {
            return;
        };
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == change.id) {
            node.refresh(record, mapping, &change.attribute);
        }
        if let Some(label) = self.labels.iter_mut().find(|l| l.id == change.id) {
            *label = LabelNode::build(record, &mapping.label_height);
        }
    }
}

/// Keeps a [`Scene`] in sync with a collection.
#[derive(Debug)]
pub struct SceneMirror {
    scene: Rc<RefCell<Scene>>,
    subscriptions: [SubscriptionId; 2],
}

impl SceneMirror {
    /// Subscribes a new scene to `collection` and builds nodes for the
    /// records it already holds.
    pub fn attach(collection: &mut Collection, mappings: MappingTable, options: SceneOptions) -> Self {
        let scene = Rc::new(RefCell::new(Scene::default()));
        let mappings = Rc::new(mappings);

        let existing = StructuralChange {
            added: collection.iter().cloned().collect(),
            removed: Vec::new(),
        };
        scene.borrow_mut().on_structure(&existing, &mappings, options);

        let structure = {
            let scene = Rc::clone(&scene);
            let mappings = Rc::clone(&mappings);
            collection.observe_structure(move |change| {
                scene.borrow_mut().on_structure(change, &mappings, options);
            })
        };
        let attributes = {
            let scene = Rc::clone(&scene);
            collection.observe_attributes(AttributeFilter::any(), move |change| {
                scene.borrow_mut().on_attribute(change, &mappings);
            })
        };

        Self {
            scene,
            subscriptions: [structure, attributes],
        }
    }

    /// Borrows the current scene.
    ///
    /// # Panics
    ///
    /// Panics if called from inside one of the mirror's own callbacks.
    #[must_use]
    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    /// Unsubscribes from `collection`, returning the last scene state.
    #[must_use]
    pub fn detach(self, collection: &mut Collection) -> Rc<RefCell<Scene>> {
        for id in self.subscriptions {
            collection.unobserve(id);
        }
        self.scene
    }
}
