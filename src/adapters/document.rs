use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::adapters::render_target::{DashboardTargets, RenderTarget, TargetHandle};
use crate::domain::panels::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ElementId {
    #[serde(rename = "apiBadge")]
    ApiBadge,
    #[serde(rename = "wsBadge")]
    WsBadge,
    #[serde(rename = "deviceId")]
    DeviceInput,
    #[serde(rename = "statusText")]
    Status,
    #[serde(rename = "lastMove")]
    LastMovement,
    #[serde(rename = "lastObs")]
    LastObstacle,
    #[serde(rename = "movesList")]
    Movements,
    #[serde(rename = "obsList")]
    Obstacles,
}

impl ElementId {
    pub const ALL: [ElementId; 8] = [
        Self::ApiBadge,
        Self::WsBadge,
        Self::DeviceInput,
        Self::Status,
        Self::LastMovement,
        Self::LastObstacle,
        Self::Movements,
        Self::Obstacles,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            Self::ApiBadge => "apiBadge",
            Self::WsBadge => "wsBadge",
            Self::DeviceInput => "deviceId",
            Self::Status => "statusText",
            Self::LastMovement => "lastMove",
            Self::LastObstacle => "lastObs",
            Self::Movements => "movesList",
            Self::Obstacles => "obsList",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Content {
    Text(String),
    Html(String),
}

impl Content {
    /// The markup this content produces when placed inside an element.
    pub fn inner_html(&self) -> String {
        match self {
            Self::Text(text) => escape_html(text),
            Self::Html(html) => html.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub content: Content,
}

impl ElementState {
    fn new(classes: &[&str], text: &str) -> Self {
        Self {
            classes: classes.iter().map(ToString::to_string).collect(),
            content: Content::Text(text.to_string()),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn class_attr(&self) -> String {
        self.classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// In-memory rendering surface: one state per dashboard element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    elements: BTreeMap<ElementId, ElementState>,
}

impl Default for Document {
    fn default() -> Self {
        let elements = ElementId::ALL
            .into_iter()
            .map(|id| {
                let state = match id {
                    ElementId::ApiBadge => ElementState::new(&["chip"], "API: …"),
                    ElementId::WsBadge => ElementState::new(&["chip"], "WS: …"),
                    ElementId::DeviceInput => ElementState::new(&[], "1"),
                    ElementId::Status => ElementState::new(&[], ""),
                    ElementId::LastMovement | ElementId::LastObstacle => {
                        ElementState::new(&["card", "empty"], "—")
                    }
                    ElementId::Movements | ElementId::Obstacles => {
                        ElementState::new(&["list"], "")
                    }
                };
                (id, state)
            })
            .collect();

        Self { elements }
    }
}

impl Document {
    pub fn element(&self, id: ElementId) -> &ElementState {
        // every id is inserted by `Default`
        &self.elements[&id]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut ElementState {
        self.elements
            .entry(id)
            .or_insert_with(|| ElementState::new(&[], ""))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    pub fn handle(&self, id: ElementId) -> TargetHandle {
        Arc::new(DocumentElement {
            document: self.clone(),
            id,
        })
    }

    pub fn targets(&self) -> DashboardTargets {
        DashboardTargets {
            api_badge: self.handle(ElementId::ApiBadge),
            ws_badge: self.handle(ElementId::WsBadge),
            device_input: self.handle(ElementId::DeviceInput),
            status: self.handle(ElementId::Status),
            last_movement: self.handle(ElementId::LastMovement),
            last_obstacle: self.handle(ElementId::LastObstacle),
            movements: self.handle(ElementId::Movements),
            obstacles: self.handle(ElementId::Obstacles),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, id: ElementId, op: impl FnOnce(&mut ElementState)) {
        let mut document = self.lock();
        op(document.element_mut(id));
    }
}

struct DocumentElement {
    document: SharedDocument,
    id: ElementId,
}

impl RenderTarget for DocumentElement {
    fn set_text(&self, text: &str) {
        self.document.update(self.id, |element| {
            element.content = Content::Text(text.to_string());
        });
    }

    fn set_html(&self, html: &str) {
        self.document.update(self.id, |element| {
            element.content = Content::Html(html.to_string());
        });
    }

    fn add_class(&self, class: &str) {
        self.document.update(self.id, |element| {
            element.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, class: &str) {
        self.document.update(self.id, |element| {
            element.classes.remove(class);
        });
    }
}
