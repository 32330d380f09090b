//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag, and resolves the
//! drop target by nearest droppable center.

use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: f64 = 5.0;

/// How far outside a droppable's box the pointer may be and still hit it
pub const DROP_MARGIN_PX: f64 = 24.0;

/// Viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn from_event(ev: &web_sys::MouseEvent) -> Self {
        Self::new(ev.client_x() as f64, ev.client_y() as f64)
    }

    fn distance_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Axis-aligned box in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    fn from_dom(rect: &web_sys::DomRect) -> Self {
        Self::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.left + self.width && p.y >= self.top && p.y <= self.top + self.height
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

/// Pick the droppable whose center is nearest to the pointer.
///
/// Only droppables whose box (grown by `margin`) contains the pointer are
/// candidates, so releasing far away from every column resolves to nothing.
pub fn closest_center(pointer: Point, droppables: &[(String, Rect)], margin: f64) -> Option<String> {
    droppables
        .iter()
        .filter(|(_, rect)| rect.expanded(margin).contains(pointer))
        .min_by(|(_, a), (_, b)| {
            pointer
                .distance_sq(a.center())
                .total_cmp(&pointer.distance_sq(b.center()))
        })
        .map(|(id, _)| id.clone())
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    pub drop_target_read: ReadSignal<Option<String>>,
    pub drop_target_write: WriteSignal<Option<String>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending draggable id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<String>>,
    pub pending_id_write: WriteSignal<Option<String>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<Point>,
    pub start_write: WriteSignal<Point>,
    /// Pointer offset from the start position while dragging
    pub offset_read: ReadSignal<Point>,
    pub offset_write: WriteSignal<Point>,
    droppables: StoredValue<Vec<(String, NodeRef<html::Div>)>>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (drop_target_read, drop_target_write) = signal(None::<String>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<String>);
    let (start_read, start_write) = signal(Point::default());
    let (offset_read, offset_write) = signal(Point::default());
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
        offset_read,
        offset_write,
        droppables: StoredValue::new(Vec::new()),
    }
}

impl DndSignals {
    /// Is this draggable the one being dragged right now
    pub fn is_dragging(&self, id: &str) -> bool {
        self.dragging_id_read.with(|d| d.as_deref() == Some(id))
    }

    /// Is this droppable the current drop target
    pub fn is_target(&self, id: &str) -> bool {
        self.drop_target_read.with(|t| t.as_deref() == Some(id))
    }
}

/// Register a droppable element under `id`. Unregistered on owner cleanup.
pub fn register_droppable(dnd: DndSignals, id: String, node: NodeRef<html::Div>) {
    dnd.droppables.update_value(|list| {
        list.retain(|(existing, _)| existing != &id);
        list.push((id.clone(), node));
    });
    on_cleanup(move || {
        dnd.droppables.try_update_value(|list| list.retain(|(existing, _)| existing != &id));
    });
}

/// Resolve the drop target under the pointer from the registered droppables
fn resolve_target(dnd: &DndSignals, pointer: Point) -> Option<String> {
    let rects: Vec<(String, Rect)> = dnd.droppables.with_value(|list| {
        list.iter()
            .filter_map(|(id, node)| {
                node.get_untracked()
                    .map(|el| (id.clone(), Rect::from_dom(&el.get_bounding_client_rect())))
            })
            .collect()
    });
    closest_center(pointer, &rects, DROP_MARGIN_PX)
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.offset_write.set(Point::default());
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, item_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Controls inside the card keep their own click behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlSelectElement>().is_some() { return; }
        }
        dnd.pending_id_write.set(Some(item_id.clone()));
        dnd.start_write.set(Point::from_event(&ev));
    }
}

/// Document-level listeners for one drag context.
/// Removed from the document when dropped.
pub struct DndListeners {
    on_mousemove: Closure<dyn FnMut(web_sys::MouseEvent)>,
    on_mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for DndListeners {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.remove_event_listener_with_callback("mousemove", self.on_mousemove.as_ref().unchecked_ref());
            let _ = doc.remove_event_listener_with_callback("mouseup", self.on_mouseup.as_ref().unchecked_ref());
        }
    }
}

/// Bind document mousemove/mouseup handlers.
///
/// `on_drop(dragged_id, droppable_id)` fires only for a real drag released
/// over a droppable. Keep the returned guard alive for as long as the
/// drag context exists.
pub fn bind_global_listeners<F>(dnd: DndSignals, on_drop: F) -> DndListeners
where
    F: Fn(String, String) + 'static,
{
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pointer = Point::from_event(&ev);
        let start = dnd.start_read.get_untracked();

        if dnd.dragging_id_read.get_untracked().is_none() {
            let pending = dnd.pending_id_read.get_untracked();
            if pending.is_none() {
                return;
            }
            let dx = (pointer.x - start.x).abs();
            let dy = (pointer.y - start.y).abs();
            if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
                return;
            }
            dnd.dragging_id_write.set(pending);
        }

        dnd.offset_write.set(Point::new(pointer.x - start.x, pointer.y - start.y));
        let target = resolve_target(&dnd, pointer);
        if dnd.drop_target_read.get_untracked() != target {
            dnd.drop_target_write.set(target);
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        dnd.pending_id_write.set(None);

        let Some(dragged) = dragging_id else {
            // Not dragging: the click event fires naturally on the element
            return;
        };
        let target = resolve_target(&dnd, Point::from_event(&ev));
        end_drag(&dnd);
        if let Some(target) = target {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }

    DndListeners { on_mousemove, on_mouseup }
}
