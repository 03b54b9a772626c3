//! Top-level editor engine: owns the scene, viewport, tool state, and
//! placement state, and turns host input into scene edits.
//!
//! Every handler returns the `Action`s the host needs to react to. Mutating
//! actions (`Action::is_mutation`) mean the scene snapshot changed and must
//! be re-published; `RenderNeeded` covers purely visual changes such as a
//! gesture preview.
//!
//! Pointer positions arrive in display space relative to the stage and are
//! converted to logical space on entry. Nothing display-scaled is ever stored.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::color::{is_paint, normalize_hex_color, normalize_hex_input};
use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT, DEFAULT_TEXT_FILL,
    MIN_FREEHAND_POINTS, MIN_SHAPE_DRAG,
};
use crate::doc::{Element, ElementId, ElementKind, PartialElement, Scene, SceneSnapshot};
use crate::geom::{Point, Rect};
use crate::hit::hit_test;
use crate::input::{Button, GestureState, Interaction, InteractionKind, Key, ShapeKind, Tool, UiState};
use crate::placement::{Placement, PlacementEngine, PlacementHint};
use crate::selection::{self, PropertyField};
use crate::viewport::Viewport;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, fields: PartialElement },
    ElementDeleted { id: ElementId },
    ElementsReordered { id: ElementId, index: usize },
    BackgroundChanged,
    SelectionChanged(Option<ElementId>),
    ToolChanged(Tool),
    RenderNeeded,
}

impl Action {
    /// Whether the action changed the scene snapshot.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::ElementCreated(_)
                | Self::ElementUpdated { .. }
                | Self::ElementDeleted { .. }
                | Self::ElementsReordered { .. }
                | Self::BackgroundChanged
        )
    }
}

/// Core engine state. Pure and synchronous; the host drives it.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub scene: Scene,
    pub viewport: Viewport,
    pub ui: UiState,
    pub gesture: GestureState,
    pub placement: PlacementEngine,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-supplied placement engine (e.g. a seeded one).
    #[must_use]
    pub fn with_placement(placement: PlacementEngine) -> Self {
        Self { placement, ..Self::default() }
    }

    // =============================================================
    // Container and background
    // =============================================================

    /// Refit the canvas into a resized container.
    pub fn set_container(&mut self, width: f64, height: f64) -> Vec<Action> {
        let viewport = Viewport::fit(width, height);
        if viewport == self.viewport {
            return Vec::new();
        }
        debug!(width, height, scale = viewport.scale(), "engine: container resized");
        self.viewport = viewport;
        vec![Action::RenderNeeded]
    }

    /// Switch to a new background. Clears every element, the selection, any
    /// gesture, and the placement session.
    pub fn load_background(&mut self, reference: Option<String>) -> Vec<Action> {
        info!(reference = ?reference, dropped = self.scene.len(), "engine: background loaded");
        self.scene.reset(reference);
        self.gesture = GestureState::Idle;
        self.placement.reset();
        let mut actions = vec![Action::BackgroundChanged];
        actions.extend(self.select(None));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Set the canvas fill from hex input (`#rgb`, `#rrggbb`, or six bare digits).
    pub fn set_background_color(&mut self, raw: &str) -> Vec<Action> {
        let current = self.scene.background_color().to_owned();
        let color = normalize_hex_input(raw).unwrap_or_else(|| normalize_hex_color(raw, &current));
        if color == current {
            return Vec::new();
        }
        self.scene.set_background_color(color);
        vec![Action::BackgroundChanged, Action::RenderNeeded]
    }

    // =============================================================
    // Tools
    // =============================================================

    /// Arm a tool. Any gesture in flight is discarded; arming anything other
    /// than `Select` also clears the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.discard_gesture("tool switch");
        let mut actions = Vec::new();
        if tool.is_drawing() {
            actions.extend(self.select(None));
        }
        if self.ui.tool != tool {
            self.ui.tool = tool;
            actions.push(Action::ToolChanged(tool));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn discard_gesture(&mut self, reason: &str) {
        if !self.gesture.is_idle() {
            debug!(reason, gesture = ?self.gesture, "engine: gesture discarded");
            self.gesture = GestureState::Idle;
        }
    }

    fn return_to_select(&mut self) -> Option<Action> {
        if self.ui.tool == Tool::Select {
            return None;
        }
        self.ui.tool = Tool::Select;
        Some(Action::ToolChanged(Tool::Select))
    }

    fn select(&mut self, id: Option<ElementId>) -> Option<Action> {
        if self.ui.selected_id == id {
            return None;
        }
        self.ui.selected_id = id;
        Some(Action::SelectionChanged(id))
    }

    // =============================================================
    // Pointer input
    // =============================================================

    pub fn on_pointer_down(&mut self, display_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.gesture.is_idle() {
            return Vec::new();
        }
        let pt = self.viewport.point_to_logical(display_pt);

        match self.ui.tool {
            Tool::Select => {
                let hit = hit_test(pt, &self.scene);
                let mut actions: Vec<Action> = self.select(hit).into_iter().collect();
                if let Some(id) = hit {
                    self.gesture = GestureState::DraggingElement { id, last: pt };
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Tool::Draw => {
                self.gesture = GestureState::PlacingFreehand { points: vec![pt] };
                vec![Action::RenderNeeded]
            }
            Tool::Text => {
                let kind = ElementKind::Text {
                    text: DEFAULT_TEXT.to_owned(),
                    font_size: DEFAULT_FONT_SIZE,
                    font_family: DEFAULT_FONT_FAMILY.to_owned(),
                    fill: DEFAULT_TEXT_FILL.to_owned(),
                };
                self.commit(Element::new(kind, pt.x, pt.y))
            }
            Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Arrow => {
                let Some(kind) = self.ui.tool.shape_kind() else {
                    return Vec::new();
                };
                self.gesture = GestureState::PlacingShape { kind, start: pt, current: pt };
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_move(&mut self, display_pt: Point) -> Vec<Action> {
        let pt = self.viewport.point_to_logical(display_pt);
        match &mut self.gesture {
            GestureState::Idle => Vec::new(),
            GestureState::PlacingFreehand { points } => {
                points.push(pt);
                vec![Action::RenderNeeded]
            }
            GestureState::PlacingShape { current, .. } => {
                *current = pt;
                vec![Action::RenderNeeded]
            }
            GestureState::DraggingElement { id, last } => {
                let (id, delta) = (*id, Point::new(pt.x - last.x, pt.y - last.y));
                *last = pt;
                self.move_by(id, delta)
            }
        }
    }

    pub fn on_pointer_up(&mut self, display_pt: Point) -> Vec<Action> {
        let pt = self.viewport.point_to_logical(display_pt);
        match std::mem::take(&mut self.gesture) {
            GestureState::Idle => Vec::new(),
            GestureState::PlacingFreehand { points } => self.commit_freehand(&points),
            GestureState::PlacingShape { kind, start, .. } => self.commit_shape(kind, start, pt),
            GestureState::DraggingElement { id, last } => {
                let mut actions = self.move_by(id, Point::new(pt.x - last.x, pt.y - last.y));
                if actions.is_empty() {
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
        }
    }

    fn move_by(&mut self, id: ElementId, delta: Point) -> Vec<Action> {
        if delta == Point::default() {
            return Vec::new();
        }
        let Some(element) = self.scene.find(&id) else {
            return Vec::new();
        };
        let fields = PartialElement { x: Some(element.x + delta.x), y: Some(element.y + delta.y), ..Default::default() };
        self.apply(id, fields)
    }

    // =============================================================
    // Keyboard input
    // =============================================================

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is("Escape") {
            if self.gesture.is_idle() {
                return Vec::new();
            }
            self.discard_gesture("escape");
            return vec![Action::RenderNeeded];
        }

        if key.is("Enter") {
            return match &self.gesture {
                GestureState::PlacingFreehand { points } if points.len() >= MIN_FREEHAND_POINTS => {
                    let points = points.clone();
                    self.gesture = GestureState::Idle;
                    self.commit_freehand(&points)
                }
                GestureState::Idle if self.ui.tool == Tool::Select => {
                    self.select(None).into_iter().chain([Action::RenderNeeded]).collect()
                }
                _ => Vec::new(),
            };
        }

        if (key.is("Delete") || key.is("Backspace")) && self.gesture.is_idle() {
            return self.delete_selected();
        }
        Vec::new()
    }

    // =============================================================
    // Gesture commits
    // =============================================================

    fn commit_freehand(&mut self, points: &[Point]) -> Vec<Action> {
        if points.len() < MIN_FREEHAND_POINTS {
            debug!(points = points.len(), "engine: freehand stroke too short, discarded");
            return vec![Action::RenderNeeded];
        }
        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let origin = Rect::bounding_points(&flat).unwrap_or_default();
        let relative = points.iter().flat_map(|p| [p.x - origin.x, p.y - origin.y]).collect();
        self.commit(Element::new(ElementKind::drawing(relative), origin.x, origin.y))
    }

    fn commit_shape(&mut self, kind: ShapeKind, start: Point, end: Point) -> Vec<Action> {
        let bounds = Rect::from_corners(start, end);
        if bounds.width <= MIN_SHAPE_DRAG && bounds.height <= MIN_SHAPE_DRAG {
            debug!(?kind, ?bounds, "engine: shape drag too small, discarded");
            return vec![Action::RenderNeeded];
        }
        let element = match kind {
            ShapeKind::Rectangle => Element::new(ElementKind::rectangle(bounds.width, bounds.height), bounds.x, bounds.y),
            ShapeKind::Circle => {
                let radius = bounds.width.max(bounds.height) / 2.0;
                let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
                Element::new(ElementKind::circle(radius), center.x, center.y)
            }
            ShapeKind::Line | ShapeKind::Arrow => {
                let points = vec![start.x - bounds.x, start.y - bounds.y, end.x - bounds.x, end.y - bounds.y];
                let kind = if kind == ShapeKind::Line { ElementKind::line(points) } else { ElementKind::arrow(points) };
                Element::new(kind, bounds.x, bounds.y)
            }
        };
        self.commit(element)
    }

    /// Add a freshly drawn element, select it, and return to the select tool.
    fn commit(&mut self, element: Element) -> Vec<Action> {
        let id = element.id;
        debug!(%id, kind = element.element_type().as_str(), "engine: element committed");
        self.scene.add(element.clone());
        let mut actions = vec![Action::ElementCreated(element)];
        actions.extend(self.select(Some(id)));
        actions.extend(self.return_to_select());
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Element interactions
    // =============================================================

    /// Single reducer for every element-level message from the host.
    pub fn dispatch(&mut self, interaction: Interaction) -> Vec<Action> {
        let Interaction { id, kind } = interaction;
        let Some(element) = self.scene.find(&id) else {
            debug!(%id, "engine: interaction for unknown element ignored");
            return Vec::new();
        };

        match kind {
            InteractionKind::Select => {
                if !self.gesture.is_idle() {
                    return Vec::new();
                }
                let mut actions: Vec<Action> = self.return_to_select().into_iter().collect();
                actions.extend(self.select(Some(id)));
                actions.push(Action::RenderNeeded);
                actions
            }
            InteractionKind::Drag { position } => {
                let pt = self.viewport.point_to_logical(position);
                self.apply(id, PartialElement { x: Some(pt.x), y: Some(pt.y), ..Default::default() })
            }
            InteractionKind::Transform(payload) => {
                let fields = selection::bake_transform(element, &payload, &self.viewport);
                self.apply(id, fields)
            }
        }
    }

    /// Merge `fields` into an element and report it. Empty partials and
    /// unknown ids produce no actions.
    pub fn apply(&mut self, id: ElementId, fields: PartialElement) -> Vec<Action> {
        if fields.is_empty() || !self.scene.update(&id, &fields) {
            return Vec::new();
        }
        vec![Action::ElementUpdated { id, fields }, Action::RenderNeeded]
    }

    // =============================================================
    // Direct actions
    // =============================================================

    /// Insert a text element at the canvas centre and select it.
    pub fn add_text(&mut self, text: &str, color: &str) -> Vec<Action> {
        let fill = if is_paint(color) { color.to_owned() } else { DEFAULT_TEXT_FILL.to_owned() };
        let kind = ElementKind::Text {
            text: text.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            fill,
        };
        let element = Element::new(kind, CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
        let id = element.id;
        self.scene.add(element.clone());
        let mut actions = vec![Action::ElementCreated(element)];
        actions.extend(self.select(Some(id)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Place and add an image element, then select it and return to the
    /// `Select` tool. Any gesture in flight is discarded. Returns the new id,
    /// the placement decision, and the actions.
    pub fn insert_image(
        &mut self,
        src: String,
        aspect: f64,
        hint: Option<&PlacementHint>,
    ) -> (ElementId, Placement, Vec<Action>) {
        let placement = self.placement.place(&self.scene.bounds(), hint, aspect);
        let b = placement.bounds;
        let element = Element::new(ElementKind::Image { width: b.width, height: b.height, src }, b.x, b.y);
        let id = element.id;
        info!(%id, strategy = ?placement.strategy, bounds = ?b, "engine: image inserted");
        self.scene.add(element.clone());
        self.discard_gesture("image inserted");
        let mut actions = vec![Action::ElementCreated(element)];
        actions.extend(self.select(Some(id)));
        actions.extend(self.return_to_select());
        actions.push(Action::RenderNeeded);
        (id, placement, actions)
    }

    fn with_selected(&mut self, edit: impl FnOnce(&Element) -> PartialElement) -> Vec<Action> {
        let Some(element) = self.selected_element() else {
            return Vec::new();
        };
        let (id, fields) = (element.id, edit(element));
        self.apply(id, fields)
    }

    pub fn rotate_selected(&mut self) -> Vec<Action> {
        self.with_selected(selection::rotate_step)
    }

    pub fn flip_selected_horizontal(&mut self) -> Vec<Action> {
        self.with_selected(selection::flip_horizontal)
    }

    pub fn flip_selected_vertical(&mut self) -> Vec<Action> {
        self.with_selected(selection::flip_vertical)
    }

    /// Recolour the selection. Values that are not a hex colour or
    /// `transparent` are ignored.
    pub fn recolor_selected(&mut self, color: &str) -> Vec<Action> {
        if !is_paint(color) {
            debug!(color, "engine: recolor ignored, not a colour");
            return Vec::new();
        }
        self.with_selected(|el| selection::recolor(el, color))
    }

    /// Merge an arbitrary partial into the selection.
    pub fn update_selected(&mut self, fields: PartialElement) -> Vec<Action> {
        self.with_selected(|_| fields)
    }

    /// Property-panel edit of the selection by field name.
    pub fn edit_property(&mut self, field: &str, raw: &str) -> Vec<Action> {
        let Some(field) = PropertyField::from_name(field) else {
            debug!(field, "engine: unknown property ignored");
            return Vec::new();
        };
        self.with_selected(|el| selection::edit_property(el, field, raw).unwrap_or_default())
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        self.delete(&id)
    }

    /// Remove an element, clearing the selection if it pointed there.
    pub fn delete(&mut self, id: &ElementId) -> Vec<Action> {
        if self.scene.remove(id).is_none() {
            return Vec::new();
        }
        if let GestureState::DraggingElement { id: dragged, .. } = self.gesture {
            if dragged == *id {
                self.gesture = GestureState::Idle;
            }
        }
        let mut actions = vec![Action::ElementDeleted { id: *id }];
        if self.ui.selected_id == Some(*id) {
            actions.extend(self.select(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn bring_selected_to_front(&mut self) -> Vec<Action> {
        self.reorder_selected(Scene::bring_to_front)
    }

    pub fn send_selected_to_back(&mut self) -> Vec<Action> {
        self.reorder_selected(Scene::send_to_back)
    }

    fn reorder_selected(&mut self, reorder: fn(&mut Scene, &ElementId) -> bool) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        if !reorder(&mut self.scene, &id) {
            return Vec::new();
        }
        let index = self.scene.index_of(&id).unwrap_or_default();
        vec![Action::ElementsReordered { id, index }, Action::RenderNeeded]
    }

    // =============================================================
    // Queries
    // =============================================================

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.ui.selected_id.and_then(|id| self.scene.find(&id))
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.scene.find(id)
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Every element converted to display space, back-most first.
    #[must_use]
    pub fn display_elements(&self) -> Vec<Element> {
        self.scene.elements().iter().map(|el| self.viewport.element_to_display(el)).collect()
    }
}
